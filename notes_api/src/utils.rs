use axum::{http::StatusCode, response::Json};
use diesel_async::{AsyncPgConnection, pooled_connection::AsyncDieselConnectionManager};

use crate::models::envelope::ErrorBody;

pub type Pool = bb8::Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;

/// Status code plus JSON error envelope returned by every failing handler.
pub type ErrorResponse = (StatusCode, Json<ErrorBody>);

diesel::define_sql_function! {
    /// Lowercase a text expression. Matches the unique index on note titles.
    fn lower(x: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

pub fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

pub fn default_allowed_origin() -> String {
    "http://localhost:5000".to_string()
}

/// Build an error response with the given status and message.
pub fn error(status: StatusCode, message: impl Into<String>) -> ErrorResponse {
    (status, Json(ErrorBody::new(message)))
}

/// Map a malformed or incomplete request body into a `400 Bad Request`
/// response carrying a machine-readable detail.
pub fn validation_error(detail: impl Into<String>) -> ErrorResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody::new("Invalid request payload").with_detail(detail)),
    )
}

/// Map Diesel errors into a specific response.
pub fn diesel_error(err: diesel::result::Error) -> ErrorResponse {
    match err {
        diesel::result::Error::NotFound => error(StatusCode::NOT_FOUND, "Note not found"),
        diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        ) => error(StatusCode::CONFLICT, "Note with this title already exists"),
        _ => internal_error(err),
    }
}

/// Map any error into a `500 Internal Server Error` response.
pub fn internal_error<E>(err: E) -> ErrorResponse
where
    E: std::error::Error,
{
    error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}
