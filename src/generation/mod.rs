//! Text-to-3D model generation.
//!
//! - `types`: request body, job token and status decoding
//! - `client`: Meshy HTTP client behind `GenerationBackend`
//! - `poller`: submit-then-poll with interval, ceiling and cancellation
//! - `error`: error taxonomy

pub mod client;
pub mod error;
pub mod poller;
pub mod types;

pub use client::{GenerationBackend, GenerationFuture, MeshyClient, MeshyConfig};
pub use error::{GenerationError, GenerationResult};
pub use poller::{ModelGenerator, PollSettings};
pub use types::{JobId, JobSnapshot, JobStatus, OutputFormat, TextTo3dRequest};
