//! Error types for the UniLife API.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use unilife_core::error::DomainError;

/// Reasons the server fails to start.
#[derive(Debug, Error)]
pub enum AppError {
    /// `HOST`, `PORT` or `STORY_PATH` is unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// The story file does not compile.
    #[error("story content error: {0}")]
    Content(#[from] DomainError),

    /// Reading the story file or binding the listener failed.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// `{error, message}` body sent with every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable code a client can branch on, e.g. `session_not_found`.
    pub error: &'static str,
    /// The underlying error's message.
    pub message: String,
}

/// A `DomainError` leaving a route handler.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl ApiError {
    /// HTTP status and error code for the wrapped error.
    #[must_use]
    pub fn classify(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            DomainError::AggregateNotFound(_) => (StatusCode::NOT_FOUND, "session_not_found"),
            DomainError::ConcurrencyConflict { .. } => {
                (StatusCode::CONFLICT, "concurrency_conflict")
            }
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            DomainError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.classify();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = ErrorBody {
            error,
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
