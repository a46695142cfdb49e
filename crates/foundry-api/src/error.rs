//! API error handling.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use foundry_core::CommandFailure;
use serde_json::json;
use tracing::error;

/// API error type.
///
/// Request errors carry a short message and are raised before anything
/// touches the workspace. Execution errors carry the external tool's output.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Execution {
        summary: &'static str,
        details: CommandFailure,
    },
}

impl ApiError {
    /// Map a gateway error, labelling execution failures with `summary`.
    pub fn from_gateway(summary: &'static str, err: foundry_core::Error) -> Self {
        match err {
            foundry_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            foundry_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            foundry_core::Error::Execution(details) => ApiError::Execution { summary, details },
            err @ foundry_core::Error::Filesystem { .. } => ApiError::Execution {
                summary,
                details: CommandFailure::message(err.to_string()),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::Execution { summary, details } => {
                error!(
                    summary,
                    error = %details.error,
                    stderr = %details.stderr,
                    "Request failed"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": summary,
                        "details": details,
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
