//! API error responses.
//!
//! Validation problems become 400s; anything that went wrong upstream becomes
//! a 500 carrying the error text and its kind name.

use std::any::Any;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use tracing::{error, warn};

use crate::generation::GenerationError;
use crate::llm::LlmError;

/// Errors returned by route handlers.
#[derive(Debug)]
pub enum ApiError {
    /// No body, or a body that is not a non-empty JSON object.
    MissingBody,
    /// Generate request without a usable prompt; carries the payload as received.
    MissingPrompt {
        /// Parsed request body, `null` when absent.
        received: Value,
    },
    /// Refine request without a `message`.
    MissingMessage,
    /// Model generation failed.
    Generation(GenerationError),
    /// Chat model call failed outside the conversational path.
    Llm(LlmError),
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        Self::Generation(err)
    }
}

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        Self::Llm(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::MissingBody => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "No data provided",
                    "type": "MissingBody",
                    "details": "Request body must be a non-empty JSON object"
                }),
            ),
            Self::MissingPrompt { received } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "No prompt provided",
                    "received_data": received
                }),
            ),
            Self::MissingMessage => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "No message provided",
                    "type": "MissingMessage",
                    "details": "Field `message` must be a non-empty string"
                }),
            ),
            Self::Generation(err) => {
                if err.is_timeout() {
                    warn!(error = %err, "Generation gave up waiting");
                } else {
                    error!(error = %err, kind = err.kind(), "Generation failed");
                }
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": err.to_string(),
                        "type": err.kind(),
                        "details": "Check server logs"
                    }),
                )
            }
            Self::Llm(err) => {
                error!(error = %err, kind = err.kind(), "Prompt refinement failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": format!("Failed to refine prompt: {err}"),
                        "type": err.kind(),
                        "details": "Check server logs for more information"
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Response for a handler that panicked.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());

    error!(panic = %message, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": format!("Internal server error: {message}"),
            "type": "Panic",
            "details": "Check server logs for more information"
        })),
    )
        .into_response()
}
