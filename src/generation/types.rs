//! Text-to-3D request and job status types.
//!
//! Meshy responses are decoded in one place, [`JobSnapshot::decode`], with the
//! field fallback orders spelled out as constants.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{GenerationError, GenerationResult};

/// Where the model URL may live in a succeeded job, in lookup order.
pub const MODEL_URL_FIELDS: [&[&str]; 2] = [&["model_url"], &["model_urls", "glb"]];

/// Where the failure text may live in a failed job, in lookup order.
pub const ERROR_FIELDS: [&[&str]; 3] = [&["error"], &["error", "message"], &["task_error", "message"]];

/// Failure text used when a failed job carries none.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Output mesh format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Binary glTF.
    #[default]
    Glb,
    /// Autodesk FBX.
    Fbx,
    /// Wavefront OBJ.
    Obj,
    /// Apple USDZ.
    Usdz,
    /// Stereolithography.
    Stl,
}

impl OutputFormat {
    /// Wire name of the format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Glb => "glb",
            Self::Fbx => "fbx",
            Self::Obj => "obj",
            Self::Usdz => "usdz",
            Self::Stl => "stl",
        }
    }
}

/// Generation mode. Only the preview stage is used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Untextured preview mesh.
    #[default]
    Preview,
}

/// Body of the text-to-3D submit call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TextTo3dRequest {
    /// Generation mode.
    pub mode: GenerationMode,
    /// Text description of the object.
    pub prompt: String,
    /// Requested mesh format.
    pub output_format: OutputFormat,
    /// Art style, e.g. `realistic`.
    pub art_style: String,
    /// Whether the service should remesh the result.
    pub should_remesh: bool,
}

impl TextTo3dRequest {
    /// Default art style.
    pub const DEFAULT_ART_STYLE: &'static str = "realistic";

    /// Preview request for `prompt` with default settings.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            mode: GenerationMode::Preview,
            prompt: prompt.into(),
            output_format: OutputFormat::Glb,
            art_style: Self::DEFAULT_ART_STYLE.to_string(),
            should_remesh: true,
        }
    }

    /// Set the art style.
    #[must_use]
    pub fn with_art_style(mut self, art_style: impl Into<String>) -> Self {
        self.art_style = art_style.into();
        self
    }

    /// Set remeshing.
    #[must_use]
    pub const fn with_remesh(mut self, should_remesh: bool) -> Self {
        self.should_remesh = should_remesh;
        self
    }
}

/// Opaque job token issued by the generation service.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Wrap a raw identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read the job token from a submit response (`result` field).
    ///
    /// # Errors
    /// Returns `MissingJobId` when the field is absent, empty or not a string.
    pub fn from_submit_response(body: &Value) -> GenerationResult<Self> {
        body.get("result")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(Self::new)
            .ok_or_else(|| GenerationError::MissingJobId(body.to_string()))
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of a job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobStatus {
    /// Not finished; carries the raw remote label (`PENDING`, `IN_PROGRESS`, ...).
    Pending(String),
    /// Finished with a model.
    Succeeded,
    /// Finished without a model.
    Failed,
}

impl JobStatus {
    /// Classify a remote status label, ignoring case.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let upper = label.trim().to_ascii_uppercase();
        match upper.as_str() {
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" | "CANCELED" | "CANCELLED" | "EXPIRED" => Self::Failed,
            _ => Self::Pending(upper),
        }
    }
}

/// Interpreted view of one status response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobSnapshot {
    /// Job status.
    pub status: JobStatus,
    /// Model URL resolved through [`MODEL_URL_FIELDS`].
    pub model_url: Option<String>,
    /// Failure text resolved through [`ERROR_FIELDS`].
    pub error: Option<String>,
    /// Progress percentage, when reported.
    pub progress: Option<u64>,
}

impl JobSnapshot {
    /// Decode a raw status response.
    #[must_use]
    pub fn decode(body: &Value) -> Self {
        let status = JobStatus::from_label(body.get("status").and_then(Value::as_str).unwrap_or_default());
        Self {
            status,
            model_url: first_string(body, &MODEL_URL_FIELDS),
            error: first_string(body, &ERROR_FIELDS),
            progress: body.get("progress").and_then(Value::as_u64),
        }
    }

    /// Failure text, falling back to [`UNKNOWN_ERROR`].
    #[must_use]
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or(UNKNOWN_ERROR)
    }
}

/// First non-empty string found along `paths`.
fn first_string(body: &Value, paths: &[&[&str]]) -> Option<String> {
    paths.iter().find_map(|path| {
        path.iter()
            .try_fold(body, |node, key| node.get(key))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    })
}
