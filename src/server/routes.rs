//! HTTP route handlers for the food design API.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::conversation::{ChatOutcome, ConversationState};
use crate::generation::TextTo3dRequest;
use crate::refiner::RefinedPrompt;

use super::error::ApiError;
use super::state::AppState;

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/start-chat", post(start_chat))
        .route("/generate-model", post(generate_model))
        .route("/refine-prompt", post(refine_prompt))
        .with_state(state)
}

/// Health check endpoint. Static: the vendor APIs are not probed.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "services": {
            "gemini": "enabled",
            "meshy": "enabled"
        }
    }))
}

/// Parse a request body as JSON; empty or malformed bodies yield `None`.
fn parse_body(body: &Bytes) -> Option<Value> {
    if body.is_empty() {
        return None;
    }
    serde_json::from_slice(body).ok()
}

/// A body that is a JSON object with at least one key.
fn non_empty_object(body: &Bytes) -> Option<Value> {
    parse_body(body).filter(|v| v.as_object().is_some_and(|o| !o.is_empty()))
}

/// Non-blank string field.
fn string_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Handle one turn of the guided conversation.
async fn start_chat(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ChatOutcome>, ApiError> {
    let data = non_empty_object(&body).ok_or(ApiError::MissingBody)?;
    debug!(payload = %data, "Incoming chat request");

    let message = data.get("message").and_then(Value::as_str).unwrap_or_default();
    let conversation_state = ConversationState::coerce(data.get("conversation_state"));

    let outcome = state.driver.step(message, &conversation_state).await;
    debug!(reply = %outcome.reply, is_complete = outcome.is_complete, "Chat reply");

    Ok(Json(outcome))
}

/// Generate model response.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// Download URL of the generated model.
    pub model_url: String,
    /// Thumbnail URL; not provided by the preview stage.
    pub thumbnail_url: String,
}

/// Build the text-to-3D request from a generate payload.
///
/// The prompt comes from `prompt`, or else from
/// `conversation_state.final_prompt`.
fn generation_request(data: &Value) -> Option<TextTo3dRequest> {
    let prompt = string_field(data, "prompt").or_else(|| {
        data.get("conversation_state")
            .and_then(|s| string_field(s, "final_prompt"))
    })?;

    let art_style = data
        .get("art_style")
        .and_then(Value::as_str)
        .unwrap_or(TextTo3dRequest::DEFAULT_ART_STYLE);
    let should_remesh = data
        .get("should_remesh")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    Some(
        TextTo3dRequest::new(prompt)
            .with_art_style(art_style)
            .with_remesh(should_remesh),
    )
}

/// Handle model generation requests. Blocks until the job is terminal.
async fn generate_model(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, ApiError> {
    let data = parse_body(&body);
    debug!(payload = ?data, "Received generate request");

    let Some(request) = data.as_ref().and_then(generation_request) else {
        return Err(ApiError::MissingPrompt {
            received: data.unwrap_or(Value::Null),
        });
    };

    info!("Generating model for: {}", request.prompt);
    let model_url = state.generator.generate(&request).await?;

    Ok(Json(GenerateResponse {
        model_url,
        thumbnail_url: String::new(),
    }))
}

/// Handle prompt refinement requests.
async fn refine_prompt(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<RefinedPrompt>, ApiError> {
    let data = non_empty_object(&body).ok_or(ApiError::MissingBody)?;
    let message = string_field(&data, "message").ok_or(ApiError::MissingMessage)?;

    let refined = state.refiner.refine(message).await?;
    Ok(Json(refined))
}
