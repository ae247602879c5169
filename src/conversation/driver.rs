//! One conversational step against the hosted chat model.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::llm::{ChatModel, ChatRequest};

use super::completion::is_conversation_complete;
use super::state::ConversationState;
use super::turn::Turn;

/// System instruction for the guided food design dialog.
pub const FOOD_DESIGN_INSTRUCTION: &str = r"You're a 3D food printing assistant. Guide users through these one by one:
1. Food selection
2. Toppings choice
3. Allergy info
4. Final confirmation

Rules:
- Use [brackets] for each individual options of toppings and allergies at first.
- When done, only repeat the details in simple words and NOTHING else.
- Keep responses brief";

/// Result of one conversational step.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatOutcome {
    /// Model reply, or an error description when the call failed.
    pub reply: String,
    /// State to hand back to the client.
    #[serde(rename = "conversation_state")]
    pub state: ConversationState,
    /// Whether the dialog looks finished.
    pub is_complete: bool,
}

/// Drives the guided dialog one user message at a time.
pub struct ConversationDriver {
    model: Arc<dyn ChatModel>,
    system_instruction: String,
}

impl ConversationDriver {
    /// Create a driver using the food design instruction.
    #[must_use]
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            system_instruction: FOOD_DESIGN_INSTRUCTION.to_string(),
        }
    }

    /// Send `user_input` with the accumulated history and return the next state.
    ///
    /// Never fails: a model error becomes the reply text, `is_complete` is
    /// false and `state` is returned as given.
    pub async fn step(&self, user_input: &str, state: &ConversationState) -> ChatOutcome {
        let user_turn = Turn::user(user_input);
        let mut contents = Vec::with_capacity(state.len() + 1);
        contents.extend(state.history.iter().cloned());
        contents.push(user_turn.clone());

        let request = ChatRequest {
            system_instruction: Some(self.system_instruction.clone()),
            contents,
        };

        debug!(history = state.len(), "Sending conversation turn");

        match self.model.complete(request).await {
            Ok(reply) => {
                let is_complete = is_conversation_complete(&reply);
                if is_complete {
                    info!(turns = state.len() + 2, "Conversation marked complete");
                }
                let next = state.with_exchange(user_turn, Turn::model(reply.clone()), is_complete);
                ChatOutcome {
                    reply,
                    state: next,
                    is_complete,
                }
            }
            Err(err) => {
                if err.is_quota() {
                    warn!(error = %err, "Chat model quota exhausted");
                } else {
                    error!(error = %err, kind = err.kind(), "Chat model call failed");
                }
                ChatOutcome {
                    reply: format!("Error: Please try again. ({err})"),
                    state: state.clone(),
                    is_complete: false,
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use crate::llm::{LlmError, LlmFuture, LlmResult};

    /// Chat model that replays scripted replies and records requests.
    #[derive(Default)]
    pub(crate) struct ScriptedChatModel {
        replies: Mutex<VecDeque<LlmResult<String>>>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedChatModel {
        pub(crate) fn replying(replies: impl IntoIterator<Item = LlmResult<String>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into_iter().collect()),
                requests: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn requests(&self) -> Vec<ChatRequest> {
            self.requests.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    impl ChatModel for ScriptedChatModel {
        fn complete(&self, request: ChatRequest) -> LlmFuture<'_, LlmResult<String>> {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request);
            }
            let next = self
                .replies
                .lock()
                .ok()
                .and_then(|mut r| r.pop_front())
                .unwrap_or(Err(LlmError::EmptyResponse));
            Box::pin(async move { next })
        }
    }

    #[tokio::test]
    async fn test_step_appends_both_turns() {
        let model = ScriptedChatModel::replying([Ok("Which toppings? [cheese] [olives]".to_string())]);
        let driver = ConversationDriver::new(model.clone());

        let outcome = driver.step("A pizza please", &ConversationState::default()).await;

        assert_eq!(outcome.reply, "Which toppings? [cheese] [olives]");
        assert!(!outcome.is_complete);
        assert_eq!(
            outcome.state.history,
            vec![
                Turn::user("A pizza please"),
                Turn::model("Which toppings? [cheese] [olives]")
            ]
        );

        let requests = model.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].system_instruction.as_deref(),
            Some(FOOD_DESIGN_INSTRUCTION)
        );
        assert_eq!(requests[0].contents, vec![Turn::user("A pizza please")]);
    }

    #[tokio::test]
    async fn test_step_sends_history_before_new_input() {
        let model = ScriptedChatModel::replying([Ok("Here's your design: pizza, olives".to_string())]);
        let driver = ConversationDriver::new(model.clone());

        let state = ConversationState::default().with_exchange(
            Turn::user("pizza"),
            Turn::model("Toppings?"),
            false,
        );
        let outcome = driver.step("olives", &state).await;

        assert!(outcome.is_complete);
        assert_eq!(outcome.state.len(), 4);
        assert_eq!(outcome.state.stage.as_deref(), Some("complete"));
        assert_eq!(state.len(), 2);

        let sent = &model.requests()[0];
        assert_eq!(sent.system_instruction.as_deref(), Some(FOOD_DESIGN_INSTRUCTION));
        assert_eq!(
            sent.contents,
            vec![Turn::user("pizza"), Turn::model("Toppings?"), Turn::user("olives")]
        );
    }

    #[tokio::test]
    async fn test_model_failure_is_swallowed_into_reply() {
        let model = ScriptedChatModel::replying([Err(LlmError::Api {
            status: 429,
            message: "Quota exceeded".to_string(),
        })]);
        let driver = ConversationDriver::new(model);

        let state = ConversationState::default().with_exchange(
            Turn::user("cake"),
            Turn::model("Toppings?"),
            false,
        );
        let outcome = driver.step("[GENERATE] sprinkles", &state).await;

        assert!(outcome.reply.starts_with("Error: Please try again."));
        assert!(outcome.reply.contains("Quota exceeded"));
        assert!(!outcome.is_complete);
        assert_eq!(outcome.state, state);
    }
}
