//! Error types for dockhand-server

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dockhand_core::CoreError;
use dockhand_core::ProviderError;
use thiserror::Error;

/// Error returned by a handler, rendered as `{"message": ...}`
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub CoreError);

impl ApiError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            e if e.is_not_found() => StatusCode::NOT_FOUND,
            CoreError::Decode(_)
            | CoreError::InvalidSettings(_)
            | CoreError::InvalidTransition { .. } => StatusCode::BAD_REQUEST,
            CoreError::Provider(ProviderError::Conflict(_)) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self.0);
        }

        let body = serde_json::json!({
            "message": self.0.to_string()
        });
        (status, axum::Json(body)).into_response()
    }
}

/// Errors starting or running the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}
