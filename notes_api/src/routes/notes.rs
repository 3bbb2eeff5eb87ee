use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use diesel::{
    ExpressionMethods,
    prelude::{OptionalExtension, QueryDsl, SelectableHelper},
    result::DatabaseErrorKind,
};
use diesel_async::RunQueryDsl;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    models::{
        envelope::{Data, ErrorBody},
        notes::{NewNote, NewNoteRequest, Note, NoteUpdates},
    },
    schema, utils,
};

pub fn router(state: utils::Pool) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_notes, add_note))
        .routes(routes!(update_note))
        .with_state(state)
}

/// Trim a required field, rejecting values that trim down to nothing.
fn required_field(value: &str, field: &'static str) -> Result<String, utils::ErrorResponse> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(utils::validation_error(format!(
            "{field} must be a non-empty string"
        )));
    }
    Ok(trimmed.to_string())
}

/// List all notes.
#[utoipa::path(
    get,
    path = "",
    responses(
        (status = 200, description = "Successfully listed notes", body = Data<Vec<Note>>)
    )
)]
#[axum::debug_handler]
pub async fn list_notes(
    State(pool): State<utils::Pool>,
) -> Result<Json<Data<Vec<Note>>>, utils::ErrorResponse> {
    let mut conn = pool.get().await.map_err(utils::internal_error)?;
    let notes = schema::notes::table
        .select(Note::as_select())
        .load(&mut conn)
        .await
        .map_err(utils::internal_error)?;
    Ok(Json(Data { data: notes }))
}

/// Add and return a note.
///
/// Titles are unique ignoring case, so adding a note whose title is already
/// taken is rejected.
#[utoipa::path(
    post,
    path = "",
    request_body = NewNoteRequest,
    responses(
        (status = 201, description = "Successfully added a note", body = Data<Note>),
        (status = 400, description = "Missing, empty, or whitespace-only title or content", body = ErrorBody),
        (status = 409, description = "A note with the same title already exists", body = ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn add_note(
    State(pool): State<utils::Pool>,
    body: Result<Json<NewNoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Data<Note>>), utils::ErrorResponse> {
    let Json(new_note_request) = body.map_err(|err| utils::validation_error(err.body_text()))?;
    let title = required_field(&new_note_request.title, "title")?;
    let content = required_field(&new_note_request.content, "content")?;

    let mut conn = pool.get().await.map_err(utils::internal_error)?;

    // Advisory pre-check for the common non-racing case. The unique index
    // on the lowercased title is the backstop for concurrent inserts.
    let existing = schema::notes::table
        .select(Note::as_select())
        .filter(utils::lower(schema::notes::title).eq(title.to_lowercase()))
        .first(&mut conn)
        .await
        .optional()
        .map_err(|_| {
            utils::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to verify note uniqueness",
            )
        })?;
    if existing.is_some() {
        return Err(utils::error(
            StatusCode::CONFLICT,
            "Note with this title already exists",
        ));
    }

    let new_note = NewNote {
        title,
        content,
        updated_at: None,
    };
    let res = diesel::insert_into(schema::notes::table)
        .values(new_note)
        .returning(Note::as_returning())
        .get_result(&mut conn)
        .await
        .map_err(|err| match err {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                utils::error(
                    StatusCode::CONFLICT,
                    "Note with this title was created concurrently",
                )
            }
            _ => utils::error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create note"),
        })?;
    Ok((StatusCode::CREATED, Json(Data { data: res })))
}

/// Update and return a note.
///
/// Fields that are empty or omitted keep their stored values.
#[utoipa::path(
    put,
    path = "/{id}",
    params(
        ("id" = i32, Path, description = "Database ID of note to update"),
    ),
    request_body = NoteUpdates,
    responses(
        (status = 200, description = "Successfully updated note", body = Data<Note>),
        (status = 400, description = "Request body is not valid JSON", body = ErrorBody),
        (status = 404, description = "Note not found", body = ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn update_note(
    State(pool): State<utils::Pool>,
    Path(id): Path<i32>,
    body: Result<Json<NoteUpdates>, JsonRejection>,
) -> Result<Json<Data<Note>>, utils::ErrorResponse> {
    let mut conn = pool.get().await.map_err(utils::internal_error)?;

    // The lookup runs before the body is parsed so an unknown ID is a 404
    // even when the body is malformed.
    let mut note: Note = schema::notes::table
        .select(Note::as_select())
        .filter(schema::notes::id.eq(id))
        .first(&mut conn)
        .await
        .map_err(utils::diesel_error)?;

    let Json(updates) = body.map_err(|err| utils::validation_error(err.body_text()))?;
    note.update(updates);

    let Note { title, content, .. } = note;
    let changeset = NewNote {
        title,
        content,
        updated_at: Some(Utc::now()),
    };
    let res = diesel::update(schema::notes::table.filter(schema::notes::id.eq(id)))
        .set(&changeset)
        .returning(Note::as_returning())
        .get_result(&mut conn)
        .await
        .map_err(utils::diesel_error)?;
    Ok(Json(Data { data: res }))
}
