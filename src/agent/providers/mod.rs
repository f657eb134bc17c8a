//! Concrete [`LlmProvider`](crate::agent::provider::LlmProvider) implementations
//! and the factory that selects one by name.

pub mod openai;

pub use openai::OpenAiProvider;

use crate::agent::config::AgentConfig;
use crate::agent::provider::LlmProvider;
use crate::error::AgentError;

/// Builds the provider named in [`AgentConfig::provider`].
///
/// All three agent roles share one provider instance; per-role behavior
/// lives in the models and prompts, not the transport. `"openai"` covers
/// any OpenAI-compatible endpoint via the config's `base_url` override.
///
/// # Errors
///
/// Returns [`AgentError::UnsupportedProvider`] if the name is not known.
pub fn create_provider(config: &AgentConfig) -> Result<Box<dyn LlmProvider>, AgentError> {
    match config.provider.as_str() {
        "openai" => Ok(Box::new(OpenAiProvider::new(config))),
        other => Err(AgentError::UnsupportedProvider {
            name: other.to_string(),
        }),
    }
}
