//! Error types for the gateway crate.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use workbench_sandbox::SandboxError;

/// Errors that can occur during gateway request handling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// An error propagated from the sandbox layer.
    #[error(transparent)]
    Sandbox(#[from] SandboxError),

    /// The request body is malformed beyond what field validation covers
    /// (e.g. undecodable base64 content).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            GatewayError::Sandbox(err) => match err {
                SandboxError::Validation(_)
                | SandboxError::Binary { .. }
                | SandboxError::NotText { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
                SandboxError::WorkspaceNotFound(_) | SandboxError::FileNotFound { .. } => {
                    (StatusCode::NOT_FOUND, err.to_string())
                }
                SandboxError::Escape { .. } => (StatusCode::FORBIDDEN, err.to_string()),
                SandboxError::TimedOut { .. } => (StatusCode::REQUEST_TIMEOUT, err.to_string()),
                // Never echo I/O detail (paths, errno text) to the caller.
                other => {
                    tracing::error!(error = %other, "internal failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal storage failure".to_owned(),
                    )
                }
            },
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
