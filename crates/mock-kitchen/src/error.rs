//! Error responses of the mock backend.
//!
//! [`MockError`] renders as `{"detail": "..."}`, the shape the real backend
//! uses, so clients exercise the same message extraction.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Failures a mock handler can answer with.
#[derive(Debug, thiserror::Error)]
pub enum MockError {
    /// Missing, unknown or expired bearer token.
    #[error("{0}")]
    Unauthorized(String),

    /// The request body failed validation.
    #[error("{0}")]
    BadRequest(String),

    /// No such resource.
    #[error("Not found.")]
    NotFound,
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
        };

        tracing::debug!(%status, error = %self, "mock request rejected");
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
