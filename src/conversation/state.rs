//! Caller-held conversation state.
//!
//! The server keeps no sessions: the client sends the state it received on the
//! previous turn and gets a new one back. A step never edits the value it was
//! given.

use serde::Serialize;
use serde_json::{Map, Value};

use super::turn::Turn;

/// Stage label written once the dialog is detected as finished.
pub const COMPLETE_STAGE: &str = "complete";

/// Conversation state round-tripped through the client.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ConversationState {
    /// Chronological, append-only turn history.
    pub history: Vec<Turn>,
    /// Optional stage label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    /// Prompt the client settled on for generation, if it stored one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_prompt: Option<String>,
    /// Any other keys the client attached; echoed back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConversationState {
    /// Coerce arbitrary client JSON into a valid state.
    ///
    /// Non-objects become the empty state, a missing or non-array `history`
    /// becomes empty, and history entries that are not objects are dropped.
    /// A `stage` or `final_prompt` that is not a string is kept as raw JSON.
    #[must_use]
    pub fn coerce(value: Option<&Value>) -> Self {
        let Some(obj) = value.and_then(Value::as_object) else {
            return Self::default();
        };

        let mut state = Self::default();
        for (key, field) in obj {
            match key.as_str() {
                "history" => {
                    state.history = field
                        .as_array()
                        .map(|items| items.iter().filter_map(Turn::coerce).collect())
                        .unwrap_or_default();
                }
                "stage" if field.is_string() => state.stage = field.as_str().map(str::to_owned),
                "final_prompt" if field.is_string() => {
                    state.final_prompt = field.as_str().map(str::to_owned);
                }
                _ => {
                    state.extra.insert(key.clone(), field.clone());
                }
            }
        }
        state
    }

    /// Return a new state with one user turn and one model turn appended.
    ///
    /// When `complete` is set the stage becomes [`COMPLETE_STAGE`]; otherwise
    /// the caller's stage is kept.
    #[must_use]
    pub fn with_exchange(&self, user: Turn, model: Turn, complete: bool) -> Self {
        let mut next = self.clone();
        next.history.reserve(2);
        next.history.push(user);
        next.history.push(model);
        if complete {
            next.extra.remove("stage");
            next.stage = Some(COMPLETE_STAGE.to_string());
        }
        next
    }

    /// Number of turns recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether no turn has been exchanged yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
