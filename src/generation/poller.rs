//! Submit-then-poll model generation.
//!
//! Polling runs at a fixed interval until the job is terminal or the ceiling
//! elapses. There is no backoff and nothing is retried; the first error ends
//! the call.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::client::GenerationBackend;
use super::error::{GenerationError, GenerationResult};
use super::types::{JobId, JobSnapshot, JobStatus, TextTo3dRequest};

/// Polling cadence and ceiling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay between status requests.
    pub interval: Duration,
    /// Maximum wall-clock time spent polling.
    pub ceiling: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            ceiling: Duration::from_secs(600),
        }
    }
}

impl PollSettings {
    /// Settings with explicit interval and ceiling.
    #[must_use]
    pub const fn new(interval: Duration, ceiling: Duration) -> Self {
        Self { interval, ceiling }
    }
}

/// Generates models through a [`GenerationBackend`].
pub struct ModelGenerator {
    backend: Arc<dyn GenerationBackend>,
    settings: PollSettings,
}

impl ModelGenerator {
    /// Create a generator.
    #[must_use]
    pub fn new(backend: Arc<dyn GenerationBackend>, settings: PollSettings) -> Self {
        Self { backend, settings }
    }

    /// Submit `request` and wait for the model URL.
    ///
    /// # Errors
    /// Returns an error if submission or polling fails, the job fails, or the
    /// ceiling elapses.
    pub async fn generate(&self, request: &TextTo3dRequest) -> GenerationResult<String> {
        self.generate_until(request, std::future::pending()).await
    }

    /// Like [`generate`](Self::generate), but gives up with `Cancelled` as soon
    /// as `cancel` completes.
    ///
    /// # Errors
    /// Same as `generate`, plus `Cancelled`. A ceiling too large to form a
    /// deadline fails with `InvalidSettings` before anything is submitted.
    pub async fn generate_until<F>(
        &self,
        request: &TextTo3dRequest,
        cancel: F,
    ) -> GenerationResult<String>
    where
        F: Future<Output = ()> + Send,
    {
        let deadline = Instant::now()
            .checked_add(self.settings.ceiling)
            .ok_or_else(|| {
                GenerationError::InvalidSettings(format!(
                    "ceiling of {}s overflows the clock",
                    self.settings.ceiling.as_secs()
                ))
            })?;

        let job_id = self.backend.submit(request).await?;
        info!(job_id = %job_id, "Text-to-3D task created");

        tokio::select! {
            result = self.poll_until_terminal(&job_id, deadline) => result,
            () = cancel => {
                warn!(job_id = %job_id, "Generation polling cancelled");
                Err(GenerationError::Cancelled(job_id.clone()))
            }
        }
    }

    async fn poll_until_terminal(&self, job_id: &JobId, deadline: Instant) -> GenerationResult<String> {
        let timeout = || GenerationError::Timeout {
            job_id: job_id.clone(),
            ceiling: self.settings.ceiling,
        };

        loop {
            if Instant::now() >= deadline {
                warn!(job_id = %job_id, "Generation timeout exceeded");
                return Err(timeout());
            }

            info!(job_id = %job_id, "Checking status");
            let body = tokio::time::timeout_at(deadline, self.backend.fetch_status(job_id))
                .await
                .map_err(|_| timeout())??;
            debug!(job_id = %job_id, response = %body, "Polling response");

            let snapshot = JobSnapshot::decode(&body);
            match snapshot.status {
                JobStatus::Succeeded => {
                    let url = snapshot
                        .model_url
                        .ok_or_else(|| GenerationError::MissingModelUrl(job_id.clone()))?;
                    info!(job_id = %job_id, url = %url, "Model generation succeeded");
                    return Ok(url);
                }
                JobStatus::Failed => {
                    return Err(GenerationError::Failed(snapshot.error_message().to_string()));
                }
                JobStatus::Pending(ref label) => {
                    info!(
                        job_id = %job_id,
                        status = %label,
                        progress = snapshot.progress,
                        wait_secs = self.settings.interval.as_secs(),
                        "Generation still running"
                    );
                }
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            tokio::time::sleep(self.settings.interval.min(remaining)).await;
        }
    }
}
