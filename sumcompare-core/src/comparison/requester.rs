//! Sends one original/neighbor pair to the LLM and returns its raw answer.

use crate::brain::{LlmProvider, complete_with_retry};
use crate::config::LlmConfig;
use crate::error::LlmError;
use crate::types::{CompletionRequest, Message};
use std::sync::Arc;
use tracing::debug;

/// System instruction describing the five-step comparison protocol.
pub const COMPARISON_SYSTEM_PROMPT: &str = r#"
You are a helpful assistant that compares two summaries and identifies the key differences between them. The user will provide you with two summaries, and your task is to analyze them, following these steps:

1- Identify Core Ideas:
   **Original Summary:**
   - [Main idea 1]
   - [Main idea 2]

   **Neighbor Summary:**
   - [Main idea 1]
   - [Main idea 2]

2- Highlight Differences in Content:
   **Original Summary:**
   - [Unique point 1]
   - [Unique point 2]

   **Neighbor Summary:**
   - [Unique point 1]
   - [Unique point 2]

3- Assess Tone and Emphasis:
   **Original Summary:**
   - [Tone detail 1]
   - [Tone detail 2]

   **Neighbor Summary:**
   - [Tone detail 1]
   - [Tone detail 2]

4- Contextual Integrity:
   **Original Summary:**
   - [Minor difference 1]
   - [Minor difference 2]

   **Neighbor Summary:**
   - [Minor difference 1]
   - [Minor difference 2]

5- Summarize Key Differences:
   **Original Summary:**
   - [Key difference 1]
   - [Key difference 2]

   **Neighbor Summary:**
   - [Key difference 1]
   - [Key difference 2]
"#;

/// Build the user prompt embedding both summaries.
pub fn build_comparison_prompt(original: &str, neighbor: &str) -> String {
    format!(
        "Original Summary:\n{original}\n\n\
         Neighbor Summary:\n{neighbor}\n\n\
         Please provide the key differences between the original summary and the neighbor summary."
    )
}

/// Issues comparison requests against an LLM provider.
pub struct ComparisonRequester {
    provider: Arc<dyn LlmProvider>,
    temperature: f32,
    max_tokens: Option<usize>,
    max_retries: usize,
}

impl ComparisonRequester {
    pub fn new(provider: Arc<dyn LlmProvider>, config: &LlmConfig) -> Self {
        Self {
            provider,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            max_retries: config.max_retries,
        }
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Ask the LLM for the differences between two summaries.
    ///
    /// The returned text is not validated. Provider errors are returned as-is.
    pub async fn compare(&self, original: &str, neighbor: &str) -> Result<String, LlmError> {
        let request = CompletionRequest {
            messages: vec![
                Message::system(COMPARISON_SYSTEM_PROMPT),
                Message::user(build_comparison_prompt(original, neighbor)),
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            model: None,
        };

        let response =
            complete_with_retry(self.provider.as_ref(), request, self.max_retries).await?;

        debug!(
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Comparison received"
        );

        Ok(response.message.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::MockLlmProvider;
    use crate::types::Role;

    #[test]
    fn test_build_comparison_prompt_exact() {
        assert_eq!(
            build_comparison_prompt("A", "B"),
            "Original Summary:\nA\n\nNeighbor Summary:\nB\n\nPlease provide the key differences between the original summary and the neighbor summary."
        );
    }

    #[test]
    fn test_system_prompt_lists_every_category() {
        for category in crate::comparison::Category::ALL {
            assert!(COMPARISON_SYSTEM_PROMPT.contains(category.label()));
        }
    }

    #[tokio::test]
    async fn test_compare_sends_system_and_user_messages() {
        let provider = Arc::new(MockLlmProvider::with_responses(["raw answer"]));
        let requester = ComparisonRequester::new(provider.clone(), &LlmConfig::default());

        let text = requester.compare("orig text", "neigh text").await.unwrap();
        assert_eq!(text, "raw answer");

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let messages = &requests[0].messages;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].text, COMPARISON_SYSTEM_PROMPT);
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[1].text.contains("orig text"));
        assert!(messages[1].text.contains("neigh text"));
        assert_eq!(requests[0].temperature, 0.7);
    }

    #[tokio::test]
    async fn test_compare_propagates_errors() {
        let provider = Arc::new(MockLlmProvider::new());
        provider.queue_error(LlmError::AuthFailed {
            provider: "openai".into(),
        });
        let requester = ComparisonRequester::new(provider, &LlmConfig::default());

        let err = requester.compare("a", "b").await.unwrap_err();
        assert!(matches!(err, LlmError::AuthFailed { .. }));
    }
}
