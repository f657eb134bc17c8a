//! Critic agent.
//!
//! Judges whether one search result is good enough for the original
//! query and, if not, suggests a single revised search term. Unlike
//! searcher failures, critic errors propagate: the orchestrator decides
//! what to do with the affected item.

use async_trait::async_trait;

use super::config::AgentConfig;
use super::plan::{Critique, SearchItem};
use super::provider::LlmProvider;
use super::prompt::{build_critic_prompt, render_critic_prompt};
use super::traits::{Agent, AgentResponse};
use crate::error::AgentError;

/// Agent that critiques a single search result.
pub struct CriticAgent {
    model: String,
    max_tokens: u32,
    system_prompt: String,
}

impl CriticAgent {
    /// Creates a new critic agent from the configuration and prompt template.
    #[must_use]
    pub fn new(config: &AgentConfig, prompt_template: &str) -> Self {
        Self {
            model: config.critic_model.clone(),
            max_tokens: config.critic_max_tokens,
            system_prompt: render_critic_prompt(prompt_template),
        }
    }

    /// Critiques one search result against the original query.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ResponseParse`] if the response is not a
    /// valid critique, or any provider error.
    pub async fn critique(
        &self,
        provider: &dyn LlmProvider,
        original_query: &str,
        item: &SearchItem,
        result_text: &str,
    ) -> Result<(Critique, AgentResponse), AgentError> {
        let user_msg = build_critic_prompt(original_query, item, result_text);
        let response = self.execute(provider, &user_msg).await?;
        let critique = Self::parse_critique(&response.content)?;
        Ok((critique, response))
    }

    /// Parses the agent's JSON response into a critique.
    fn parse_critique(content: &str) -> Result<Critique, AgentError> {
        let trimmed = content.trim();

        // Handle markdown code blocks
        let json_str = if trimmed.starts_with("```") {
            trimmed
                .trim_start_matches("```json")
                .trim_start_matches("```")
                .trim_end_matches("```")
                .trim()
        } else {
            trimmed
        };

        serde_json::from_str::<Critique>(json_str).map_err(|e| AgentError::ResponseParse {
            message: format!("Failed to parse critique: {e}"),
            content: content.to_string(),
        })
    }
}

#[async_trait]
impl Agent for CriticAgent {
    fn name(&self) -> &'static str {
        "critic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    fn json_mode(&self) -> bool {
        true
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::prompt::CRITIC_PROMPT_TEMPLATE;

    #[test]
    fn test_parse_critique_valid() {
        let json = r#"{"is_good_enough": false, "critique": "too old", "revised_query": "x 2026"}"#;
        let critique = CriticAgent::parse_critique(json).unwrap_or_else(|_| unreachable!());
        assert!(!critique.is_good_enough);
        assert_eq!(critique.revised_query.as_deref(), Some("x 2026"));
    }

    #[test]
    fn test_parse_critique_code_block() {
        let json = "```json\n{\"is_good_enough\": true}\n```";
        let critique = CriticAgent::parse_critique(json).unwrap_or_else(|_| unreachable!());
        assert!(critique.is_good_enough);
    }

    #[test]
    fn test_parse_critique_invalid() {
        let result = CriticAgent::parse_critique("not json");
        assert!(matches!(result, Err(AgentError::ResponseParse { .. })));
    }

    #[test]
    fn test_agent_properties() {
        let config = AgentConfig::builder()
            .api_key("test")
            .build()
            .unwrap_or_else(|_| unreachable!());
        let agent = CriticAgent::new(&config, CRITIC_PROMPT_TEMPLATE);
        assert_eq!(agent.name(), "critic");
        assert!(agent.json_mode());
        assert!(agent.tools().is_empty());
        assert!(!agent.system_prompt().contains("{today}"));
    }
}
