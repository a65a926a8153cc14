//! LLM provider implementations.
//!
//! Use `create_provider()` to instantiate the provider named in config.

pub mod openai_compat;

use crate::brain::LlmProvider;
use crate::config::LlmConfig;
use crate::error::LlmError;
use std::sync::Arc;

pub use openai_compat::OpenAiCompatibleProvider;

/// Create the provider described by `config`.
///
/// "openai", "azure", "local" and "ollama" all speak the chat
/// completions protocol and map to [`OpenAiCompatibleProvider`].
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    match config.provider.to_lowercase().as_str() {
        "openai" | "azure" | "local" | "ollama" => {
            Ok(Arc::new(OpenAiCompatibleProvider::new(config)?))
        }
        other => Err(LlmError::ApiRequest {
            message: format!("Unsupported LLM provider: '{}'", other),
        }),
    }
}
