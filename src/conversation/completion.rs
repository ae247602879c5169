//! Heuristic detection of a finished guided dialog.
//!
//! The model is asked to summarize the order once everything is chosen. There
//! is no structured signal for that, so the reply is matched against a small
//! set of phrases. Paraphrases will be missed.

/// Phrases that mark the end of the guided dialog, lowercase.
pub const COMPLETION_PHRASES: [&str; 6] = [
    "ready to generate",
    "that's all",
    "final confirmation",
    "here's your design",
    "3d model can be generated",
    "proceed to generation",
];

/// Literal marker the model may emit when the design is ready, lowercase.
pub const GENERATE_MARKER: &str = "[generate]";

/// Whether `reply` signals that the dialog is complete.
///
/// Case-insensitive substring match against [`COMPLETION_PHRASES`] and
/// [`GENERATE_MARKER`].
#[must_use]
pub fn is_conversation_complete(reply: &str) -> bool {
    let lowered = reply.to_lowercase();
    lowered.contains(GENERATE_MARKER)
        || COMPLETION_PHRASES
            .iter()
            .any(|phrase| lowered.contains(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrases_match_case_insensitively() {
        assert!(is_conversation_complete("Great! Here's Your Design: a round pizza."));
        assert!(is_conversation_complete("All set [GENERATE]"));
        assert!(is_conversation_complete("We are READY TO GENERATE."));
        assert!(is_conversation_complete("Your 3D model can be generated now"));
    }

    #[test]
    fn test_ordinary_replies_are_not_complete() {
        assert!(!is_conversation_complete("Which toppings would you like? [cheese] [olives]"));
        assert!(!is_conversation_complete("Any allergies we should know about?"));
        assert!(!is_conversation_complete(""));
    }
}
