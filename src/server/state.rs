//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::conversation::ConversationDriver;
use crate::generation::{GenerationBackend, MeshyClient, ModelGenerator, PollSettings};
use crate::llm::{ChatModel, GeminiClient};
use crate::refiner::PromptRefiner;

/// Shared application state.
pub struct AppState {
    /// Guided food design dialog.
    pub driver: ConversationDriver,
    /// Prompt enrichment.
    pub refiner: PromptRefiner,
    /// Text-to-3D submit and poll.
    pub generator: ModelGenerator,
}

impl AppState {
    /// Create the application state from loaded configuration.
    ///
    /// # Errors
    /// Returns an error if either API client cannot be created.
    pub fn new(config: AppConfig) -> Result<Arc<Self>, Box<dyn std::error::Error + Send + Sync>> {
        let gemini = GeminiClient::new(config.gemini)
            .map_err(|e| format!("Failed to create Gemini client: {e}"))?;
        tracing::info!("Gemini model: {}", gemini.model());

        let meshy = MeshyClient::new(config.meshy)
            .map_err(|e| format!("Failed to create Meshy client: {e}"))?;

        Ok(Self::from_parts(Arc::new(gemini), Arc::new(meshy), config.poll))
    }

    /// Assemble state from already-built collaborators.
    #[must_use]
    pub fn from_parts(
        chat: Arc<dyn ChatModel>,
        backend: Arc<dyn GenerationBackend>,
        poll: PollSettings,
    ) -> Arc<Self> {
        Arc::new(Self {
            driver: ConversationDriver::new(Arc::clone(&chat)),
            refiner: PromptRefiner::new(chat),
            generator: ModelGenerator::new(backend, poll),
        })
    }
}
