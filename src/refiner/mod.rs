//! Prompt refinement: expand a short food request into a detailed
//! text-to-3D prompt plus topping and allergy suggestions.

pub mod parser;

pub use parser::{RefinedPrompt, parse_refined};

use std::sync::Arc;

use tracing::debug;

use crate::llm::{ChatModel, ChatRequest, LlmResult};

/// Build the refinement prompt for `user_input`.
fn refinement_prompt(user_input: &str) -> String {
    format!(
        r#"As a 3D food printing assistant, expand this request:
USER INPUT: "{user_input}"

Generate:
1. A detailed technical prompt for Meshy API
2. 3-5 common toppings as bullet points
3. 3-5 common allergies as bullet points
4. Key 3D printing parameters

Format your response as:
TECHNICAL PROMPT: <text>
TOPPINGS: - <item1> - <item2>
ALLERGIES: - <item1> - <item2>
PARAMETERS: <text>"#
    )
}

/// LLM-backed prompt refiner.
pub struct PromptRefiner {
    model: Arc<dyn ChatModel>,
}

impl PromptRefiner {
    /// Create a refiner over `model`.
    #[must_use]
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Ask the model to expand `user_input` and parse its answer.
    ///
    /// # Errors
    /// Returns an error if the model call fails.
    pub async fn refine(&self, user_input: &str) -> LlmResult<RefinedPrompt> {
        let text = self
            .model
            .complete(ChatRequest::single(refinement_prompt(user_input)))
            .await?;
        debug!(chars = text.len(), "Refiner response received");
        Ok(parse_refined(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::driver::tests::ScriptedChatModel;
    use crate::llm::LlmError;

    #[tokio::test]
    async fn test_refine_parses_model_output() {
        let model = ScriptedChatModel::replying([Ok(
            "TECHNICAL PROMPT: glazed ring donut\nTOPPINGS: - sprinkles - icing\nALLERGIES: - gluten\nPARAMETERS: fine"
                .to_string(),
        )]);
        let refiner = PromptRefiner::new(model.clone());

        let refined = refiner.refine("a donut").await.ok();
        let refined = refined.unwrap_or_default();
        assert_eq!(refined.enhanced_prompt, "glazed ring donut");
        assert_eq!(refined.toppings, vec!["sprinkles", "icing"]);
        assert_eq!(refined.allergies, vec!["gluten"]);

        let sent = model.requests();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].system_instruction.is_none());
        assert!(sent[0].contents[0].parts[0].text.contains("USER INPUT: \"a donut\""));
    }

    #[tokio::test]
    async fn test_refine_propagates_model_errors() {
        let model = ScriptedChatModel::replying([Err(LlmError::EmptyResponse)]);
        let result = PromptRefiner::new(model).refine("soup").await;
        assert!(matches!(result, Err(LlmError::EmptyResponse)));
    }
}
