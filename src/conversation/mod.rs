//! Guided food design conversation.
//!
//! - `turn`: role/parts dialog turns
//! - `state`: caller-held state and its coercion rules
//! - `completion`: the "dialog finished" heuristic
//! - `driver`: one model round-trip per user message

pub mod completion;
pub mod driver;
pub mod state;
pub mod turn;

pub use completion::is_conversation_complete;
pub use driver::{ChatOutcome, ConversationDriver};
pub use state::ConversationState;
pub use turn::{Part, Role, Turn};
