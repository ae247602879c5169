//! Error types for chat model calls.

use thiserror::Error;

/// Errors that can occur while talking to the hosted chat model.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failed before a response was read.
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Gemini API returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or the raw body.
        message: String,
    },

    /// The prompt was refused by the model's safety filters.
    #[error("Prompt blocked: {0}")]
    Blocked(String),

    /// The response carried no candidate text.
    #[error("Model returned an empty response")]
    EmptyResponse,

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP client configuration error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl LlmError {
    /// Stable name of the error variant, used as the `type` field in API errors.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::HttpRequest(_) => "HttpRequest",
            Self::Api { .. } => "ApiError",
            Self::Blocked(_) => "Blocked",
            Self::EmptyResponse => "EmptyResponse",
            Self::InvalidUrl(_) => "InvalidUrl",
            Self::HttpClient(_) => "HttpClient",
        }
    }

    /// Whether the provider rejected the call for quota reasons.
    #[must_use]
    pub const fn is_quota(&self) -> bool {
        matches!(self, Self::Api { status: 429, .. })
    }
}

/// Convenience result alias for chat model operations.
pub type LlmResult<T> = Result<T, LlmError>;
