use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Wrapper for every successful response payload.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Data<T> {
    pub data: T,
}

/// Body returned by every failing request.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable description of the failure.
    pub error: String,
    /// Machine-readable validation detail, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
