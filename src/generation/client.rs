//! Meshy text-to-3D HTTP client.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use tracing::{debug, error};

use super::error::{GenerationError, GenerationResult};
use super::types::{JobId, TextTo3dRequest};

/// Default Meshy API base URL.
pub const DEFAULT_MESHY_URL: &str = "https://api.meshy.ai";

/// Path of the text-to-3D task collection.
const TEXT_TO_3D_PATH: &str = "openapi/v2/text-to-3d";

/// HTTP connect timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Timeout for each submit or status request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Boxed future type for generation backend operations.
pub type GenerationFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait abstraction over a text-to-3D service.
pub trait GenerationBackend: Send + Sync {
    /// Create a job and return its token.
    ///
    /// # Errors
    /// Returns an error on HTTP failure or when no token is returned.
    fn submit<'a>(&'a self, request: &'a TextTo3dRequest) -> GenerationFuture<'a, GenerationResult<JobId>>;

    /// Fetch the raw status document of a job.
    ///
    /// # Errors
    /// Returns an error on HTTP failure.
    fn fetch_status<'a>(&'a self, job_id: &'a JobId) -> GenerationFuture<'a, GenerationResult<Value>>;
}

/// Configuration for the Meshy client.
#[derive(Debug)]
pub struct MeshyConfig {
    api_key: Secret<String>,
    /// API base URL without trailing slash.
    pub base_url: String,
    /// Timeout for each HTTP request.
    pub request_timeout: Duration,
}

impl MeshyConfig {
    /// Create a config with the default endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: DEFAULT_MESHY_URL.to_string(),
            request_timeout: REQUEST_TIMEOUT,
        }
    }

    /// Set the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// URL of the task collection.
    ///
    /// # Errors
    /// Returns an error if the base URL does not parse.
    pub fn tasks_url(&self) -> GenerationResult<url::Url> {
        Ok(url::Url::parse(&format!("{}/{TEXT_TO_3D_PATH}", self.base_url))?)
    }

    /// URL of one task.
    ///
    /// # Errors
    /// Returns an error if the base URL does not parse.
    pub fn task_url(&self, job_id: &JobId) -> GenerationResult<url::Url> {
        let mut url = self.tasks_url()?;
        url.path_segments_mut()
            .map_err(|()| GenerationError::HttpClient("base URL cannot hold a path".to_string()))?
            .push(job_id.as_str());
        Ok(url)
    }
}

/// Async Meshy client.
pub struct MeshyClient {
    client: Client,
    config: MeshyConfig,
}

impl MeshyClient {
    /// Build a client from config.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: MeshyConfig) -> GenerationResult<Self> {
        config.tasks_url()?;
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GenerationError::HttpClient(e.to_string()))?;
        Ok(Self { client, config })
    }

    async fn post_task(&self, request: &TextTo3dRequest) -> GenerationResult<JobId> {
        debug!(
            prompt = %request.prompt,
            format = request.output_format.as_str(),
            art_style = %request.art_style,
            should_remesh = request.should_remesh,
            "Sending text-to-3D task"
        );

        let response = self
            .client
            .post(self.config.tasks_url()?)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(request)
            .send()
            .await?;

        let body = read_json(response).await?;
        debug!(response = %body, "Initial Meshy response");
        JobId::from_submit_response(&body)
    }

    async fn get_task(&self, job_id: &JobId) -> GenerationResult<Value> {
        let response = self
            .client
            .get(self.config.task_url(job_id)?)
            .bearer_auth(self.config.api_key.expose_secret())
            .send()
            .await?;

        read_json(response).await
    }
}

impl GenerationBackend for MeshyClient {
    fn submit<'a>(&'a self, request: &'a TextTo3dRequest) -> GenerationFuture<'a, GenerationResult<JobId>> {
        Box::pin(self.post_task(request))
    }

    fn fetch_status<'a>(&'a self, job_id: &'a JobId) -> GenerationFuture<'a, GenerationResult<Value>> {
        Box::pin(self.get_task(job_id))
    }
}

/// Fail on non-success status, otherwise parse the body as JSON.
async fn read_json(response: Response) -> GenerationResult<Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!(status = status.as_u16(), body = %body, "Meshy API HTTP error");
        return Err(GenerationError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json::<Value>().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_urls() {
        let config = MeshyConfig::new("key").with_base_url("http://localhost:9000/");
        assert_eq!(
            config.tasks_url().map(|u| u.to_string()).ok().as_deref(),
            Some("http://localhost:9000/openapi/v2/text-to-3d")
        );
        assert_eq!(
            config
                .task_url(&JobId::new("abc-123"))
                .map(|u| u.to_string())
                .ok()
                .as_deref(),
            Some("http://localhost:9000/openapi/v2/text-to-3d/abc-123")
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let client = MeshyClient::new(MeshyConfig::new("key").with_base_url("not a url"));
        assert!(matches!(client, Err(GenerationError::InvalidUrl(_))));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = MeshyConfig::new("msy-secret");
        assert!(!format!("{config:?}").contains("msy-secret"));
    }
}
