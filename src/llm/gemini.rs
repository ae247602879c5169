//! Gemini `generateContent` client.
//!
//! One stateless call per request: the whole history is sent every time, the
//! service keeps nothing between calls.

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conversation::turn::{Part, Turn};

use super::error::{LlmError, LlmResult};
use super::{ChatModel, ChatRequest, LlmFuture};

/// Default Gemini REST base URL.
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default chat model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// HTTP connect timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the Gemini client.
#[derive(Debug)]
pub struct GeminiConfig {
    api_key: Secret<String>,
    /// Model name, e.g. `gemini-2.0-flash`.
    pub model: String,
    /// REST base URL without trailing slash.
    pub base_url: String,
    /// Whole-request timeout.
    pub request_timeout: Duration,
}

impl GeminiConfig {
    /// Create a config with the default model and endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_URL.to_string(),
            request_timeout: REQUEST_TIMEOUT,
        }
    }

    /// Set the model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the REST base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Full `generateContent` endpoint for the configured model.
    ///
    /// # Errors
    /// Returns an error if the base URL does not parse.
    pub fn endpoint(&self) -> LlmResult<url::Url> {
        let raw = format!("{}/models/{}:generateContent", self.base_url, self.model);
        Ok(url::Url::parse(&raw)?)
    }
}

/// Async Gemini client.
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
    endpoint: url::Url,
}

impl GeminiClient {
    /// Build a client from config.
    ///
    /// # Errors
    /// Returns an error if the endpoint is invalid or the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> LlmResult<Self> {
        let endpoint = config.endpoint()?;
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| LlmError::HttpClient(e.to_string()))?;
        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    /// Model name this client targets.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate_content(&self, request: ChatRequest) -> LlmResult<String> {
        let body = GenerateContentRequest::from(request);
        debug!(
            model = %self.config.model,
            turns = body.contents.len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &text));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        extract_reply(parsed)
    }
}

impl ChatModel for GeminiClient {
    fn complete(&self, request: ChatRequest) -> LlmFuture<'_, LlmResult<String>> {
        Box::pin(self.generate_content(request))
    }
}

/// Turn an error body into `LlmError::Api`, preferring the structured message.
fn api_error(status: u16, body: &str) -> LlmError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error.message)
        .unwrap_or_else(|| body.trim().to_string());
    LlmError::Api { status, message }
}

/// Text of the first candidate, or the reason there is none.
fn extract_reply(response: GenerateContentResponse) -> LlmResult<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if !text.is_empty() {
        return Ok(text);
    }

    match response.prompt_feedback.and_then(|f| f.block_reason) {
        Some(reason) => Err(LlmError::Blocked(reason)),
        None => Err(LlmError::EmptyResponse),
    }
}

// Gemini wire structures

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    contents: Vec<Turn>,
}

impl From<ChatRequest> for GenerateContentRequest {
    fn from(request: ChatRequest) -> Self {
        Self {
            system_instruction: request.system_instruction.map(|text| SystemInstruction {
                parts: vec![Part::text(text)],
            }),
            contents: request.contents,
        }
    }
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> GenerateContentResponse {
        match serde_json::from_value(value) {
            Ok(parsed) => parsed,
            Err(e) => panic!("fixture should parse: {e}"),
        }
    }

    #[test]
    fn test_endpoint() {
        let config = GeminiConfig::new("k")
            .with_model("gemini-2.0-flash")
            .with_base_url("http://localhost:8080/v1beta/");
        let url = config.endpoint().map(|u| u.to_string()).ok();
        assert_eq!(
            url.as_deref(),
            Some("http://localhost:8080/v1beta/models/gemini-2.0-flash:generateContent")
        );
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = GeminiConfig::new("super-secret-key");
        assert!(!format!("{config:?}").contains("super-secret-key"));
    }

    #[test]
    fn test_request_body_shape() {
        let request = ChatRequest {
            system_instruction: Some("Be brief".to_string()),
            contents: vec![Turn::user("pizza"), Turn::model("Toppings?"), Turn::user("olives")],
        };
        let body = serde_json::to_value(GenerateContentRequest::from(request)).ok();
        assert_eq!(
            body,
            Some(json!({
                "systemInstruction": {"parts": [{"text": "Be brief"}]},
                "contents": [
                    {"role": "user", "parts": [{"text": "pizza"}]},
                    {"role": "model", "parts": [{"text": "Toppings?"}]},
                    {"role": "user", "parts": [{"text": "olives"}]}
                ]
            }))
        );

        let bare = serde_json::to_value(GenerateContentRequest::from(ChatRequest::single("hi"))).ok();
        assert_eq!(
            bare,
            Some(json!({"contents": [{"role": "user", "parts": [{"text": "hi"}]}]}))
        );
    }

    #[test]
    fn test_extract_reply_joins_parts() {
        let response = parse(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Pick "}, {"text": "a base"}]},
                "finishReason": "STOP"
            }]
        }));
        assert_eq!(extract_reply(response).ok().as_deref(), Some("Pick a base"));
    }

    #[test]
    fn test_extract_reply_reports_block_reason() {
        let response = parse(json!({"promptFeedback": {"blockReason": "SAFETY"}}));
        assert!(matches!(extract_reply(response), Err(LlmError::Blocked(r)) if r == "SAFETY"));

        let empty = parse(json!({"candidates": []}));
        assert!(matches!(extract_reply(empty), Err(LlmError::EmptyResponse)));
    }

    #[test]
    fn test_api_error_prefers_structured_message() {
        let err = api_error(
            429,
            r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#,
        );
        assert!(err.is_quota());
        assert_eq!(err.to_string(), "Gemini API returned 429: Quota exceeded");

        let raw = api_error(502, "Bad Gateway");
        assert_eq!(raw.to_string(), "Gemini API returned 502: Bad Gateway");
    }
}
