//! Hosted chat model access.
//!
//! `ChatModel` is the seam the conversation driver and the prompt refiner talk
//! to; `GeminiClient` is the production implementation.

pub mod error;
pub mod gemini;

pub use error::{LlmError, LlmResult};
pub use gemini::{GeminiClient, GeminiConfig};

use std::future::Future;
use std::pin::Pin;

use crate::conversation::turn::Turn;

/// Boxed future type for chat model operations.
pub type LlmFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A single chat call: optional system instruction plus the ordered contents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatRequest {
    /// Instruction applied to the whole exchange.
    pub system_instruction: Option<String>,
    /// History followed by the new user turn.
    pub contents: Vec<Turn>,
}

impl ChatRequest {
    /// Request with a single user turn and no system instruction.
    #[must_use]
    pub fn single(prompt: impl Into<String>) -> Self {
        Self {
            system_instruction: None,
            contents: vec![Turn::user(prompt)],
        }
    }
}

/// Trait abstraction over hosted chat models.
pub trait ChatModel: Send + Sync {
    /// Send one request and return the model's reply text.
    ///
    /// # Errors
    /// Returns an error if the call fails or the reply carries no text.
    fn complete(&self, request: ChatRequest) -> LlmFuture<'_, LlmResult<String>>;
}
