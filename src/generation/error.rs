//! Error types for text-to-3D generation.

use std::time::Duration;

use thiserror::Error;

use super::types::JobId;

/// Errors that can occur while generating a model.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// HTTP request failed before a response was read.
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Meshy API returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Submit response carried no job identifier.
    #[error("No task ID received. Full response: {0}")]
    MissingJobId(String),

    /// Job succeeded but no model URL was present.
    #[error("GLB URL not found in successful response for task {0}")]
    MissingModelUrl(JobId),

    /// The remote service reported the job as failed.
    #[error("Meshy generation failed: {0}")]
    Failed(String),

    /// The polling ceiling elapsed before a terminal status.
    #[error("Generation timeout exceeded after {secs}s (task {job_id})", secs = .ceiling.as_secs())]
    Timeout {
        /// Job that was being polled.
        job_id: JobId,
        /// Ceiling that elapsed.
        ceiling: Duration,
    },

    /// Poll settings cannot be turned into a deadline.
    #[error("Invalid poll settings: {0}")]
    InvalidSettings(String),

    /// The caller abandoned the poll.
    #[error("Generation cancelled (task {0})")]
    Cancelled(JobId),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP client configuration error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl GenerationError {
    /// Stable name of the error variant, used as the `type` field in API errors.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::HttpRequest(_) => "HttpRequest",
            Self::Status { .. } => "HttpStatus",
            Self::MissingJobId(_) => "MissingJobId",
            Self::MissingModelUrl(_) => "MissingModelUrl",
            Self::Failed(_) => "GenerationFailed",
            Self::Timeout { .. } => "GenerationTimeout",
            Self::InvalidSettings(_) => "InvalidSettings",
            Self::Cancelled(_) => "Cancelled",
            Self::InvalidUrl(_) => "InvalidUrl",
            Self::HttpClient(_) => "HttpClient",
        }
    }

    /// Whether this error came from the local polling ceiling.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Convenience result alias for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;
