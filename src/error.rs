use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// All possible errors in the study tracker
#[derive(Error, Debug)]
pub enum StrideError {
    #[error("Task #{0} not found")]
    TaskNotFound(i64),

    #[error("Store not initialized. Run `stride init` first.")]
    NotInitialized,

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Background task failed: {0}")]
    Join(String),
}

impl From<tokio::task::JoinError> for StrideError {
    fn from(e: tokio::task::JoinError) -> Self {
        StrideError::Join(e.to_string())
    }
}

/// Every failure surfaces to HTTP clients as a generic internal error.
impl IntoResponse for StrideError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        let body = serde_json::json!({
            "success": false,
            "error": self.to_string(),
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, StrideError>;
