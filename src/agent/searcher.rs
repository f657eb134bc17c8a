//! Searcher agent.
//!
//! Executes a single planned search term: runs the tool-calling loop
//! against the web search backend and condenses what it finds into a
//! short summary. A searcher failure never fails the run — the item is
//! dropped and the pipeline continues with the rest.

use async_trait::async_trait;
use tracing::warn;

use super::config::AgentConfig;
use super::message::TokenUsage;
use super::plan::{SearchItem, SearchOutcome};
use super::provider::LlmProvider;
use super::prompt::build_searcher_prompt;
use super::tool::{ToolDefinition, ToolSet};
use super::traits::{Agent, execute_with_tools};
use crate::search::executor::ToolExecutor;

/// Result of one search attempt.
///
/// `outcome` is `None` when the attempt failed. A failed attempt reports
/// zero usage: the error path carries no per-round token counts, so
/// whatever the provider consumed before failing is not accounted.
#[derive(Debug, Clone)]
pub struct SearchAttempt {
    /// The accepted outcome, if the search succeeded.
    pub outcome: Option<SearchOutcome>,
    /// Tokens consumed by a successful attempt; zero on failure.
    pub usage: TokenUsage,
}

/// Agent that performs one web search and summarizes the findings.
pub struct SearcherAgent {
    model: String,
    max_tokens: u32,
    max_tool_iterations: usize,
    system_prompt: String,
}

impl SearcherAgent {
    /// Creates a new searcher agent from the configuration and system prompt.
    #[must_use]
    pub fn new(config: &AgentConfig, system_prompt: String) -> Self {
        Self {
            model: config.searcher_model.clone(),
            max_tokens: config.searcher_max_tokens,
            max_tool_iterations: config.max_tool_iterations,
            system_prompt,
        }
    }

    /// Runs the search for one plan item.
    ///
    /// This is the failure isolation point of the pipeline: any error —
    /// provider, tool loop, or parse — is logged and converted into an
    /// empty attempt instead of propagating.
    pub async fn search(
        &self,
        provider: &dyn LlmProvider,
        executor: &ToolExecutor,
        item: &SearchItem,
    ) -> SearchAttempt {
        let user_msg = build_searcher_prompt(item);

        match execute_with_tools(self, provider, &user_msg, executor).await {
            Ok(response) => SearchAttempt {
                outcome: Some(SearchOutcome {
                    item: item.clone(),
                    text: response.content,
                }),
                usage: response.usage,
            },
            Err(e) => {
                warn!(query = item.query, error = %e, "search attempt failed");
                SearchAttempt {
                    outcome: None,
                    usage: TokenUsage::default(),
                }
            }
        }
    }
}

#[async_trait]
impl Agent for SearcherAgent {
    fn name(&self) -> &'static str {
        "searcher"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        ToolSet::searcher_tools().definitions().to_vec()
    }

    fn force_tool_use(&self) -> bool {
        true
    }

    fn max_tool_iterations(&self) -> usize {
        self.max_tool_iterations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::message::{ChatRequest, ChatResponse};
    use crate::agent::prompt::SEARCHER_SYSTEM_PROMPT;
    use crate::error::AgentError;
    use crate::search::{SearchHit, SearchTool};

    use std::sync::Arc;

    struct TextProvider {
        reply: Option<String>,
    }

    #[async_trait]
    impl LlmProvider for TextProvider {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError> {
            let Some(reply) = &self.reply else {
                return Err(AgentError::ApiRequest {
                    message: "backend down".to_string(),
                    status: Some(500),
                });
            };
            if request.force_tool_use {
                return Ok(ChatResponse {
                    content: String::new(),
                    usage: TokenUsage {
                        prompt_tokens: 5,
                        completion_tokens: 5,
                        total_tokens: 10,
                    },
                    tool_calls: vec![crate::agent::tool::ToolCall {
                        id: "call_0".to_string(),
                        name: "web_search".to_string(),
                        arguments: r#"{"query":"x"}"#.to_string(),
                    }],
                    finish_reason: Some("tool_calls".to_string()),
                });
            }
            Ok(ChatResponse {
                content: reply.clone(),
                usage: TokenUsage {
                    prompt_tokens: 10,
                    completion_tokens: 10,
                    total_tokens: 20,
                },
                tool_calls: Vec::new(),
                finish_reason: Some("stop".to_string()),
            })
        }
    }

    struct EmptySearch;

    #[async_trait]
    impl SearchTool for EmptySearch {
        async fn search(
            &self,
            _query: &str,
            _max_results: usize,
        ) -> Result<Vec<SearchHit>, AgentError> {
            Ok(Vec::new())
        }

        async fn fetch(&self, _url: &str) -> Result<String, AgentError> {
            Ok(String::new())
        }
    }

    fn agent() -> SearcherAgent {
        let config = AgentConfig::builder()
            .api_key("test")
            .build()
            .unwrap_or_else(|_| unreachable!());
        SearcherAgent::new(&config, SEARCHER_SYSTEM_PROMPT.to_string())
    }

    fn item() -> SearchItem {
        SearchItem {
            reason: "test".to_string(),
            query: "rust joinset".to_string(),
        }
    }

    #[tokio::test]
    async fn test_search_success() {
        let provider = TextProvider {
            reply: Some("Summary of findings.".to_string()),
        };
        let executor = ToolExecutor::new(Arc::new(EmptySearch), 8);

        let attempt = agent().search(&provider, &executor, &item()).await;
        let outcome = attempt.outcome.unwrap_or_else(|| unreachable!());
        assert_eq!(outcome.text, "Summary of findings.");
        assert_eq!(outcome.item.query, "rust joinset");
        // Forced tool round (10) plus final answer (20)
        assert_eq!(attempt.usage.total_tokens, 30);
    }

    #[tokio::test]
    async fn test_search_failure_is_swallowed() {
        let provider = TextProvider { reply: None };
        let executor = ToolExecutor::new(Arc::new(EmptySearch), 8);

        let attempt = agent().search(&provider, &executor, &item()).await;
        assert!(attempt.outcome.is_none());
        assert_eq!(attempt.usage.total_tokens, 0);
    }

    #[test]
    fn test_agent_properties() {
        let agent = agent();
        assert_eq!(agent.name(), "searcher");
        assert!(!agent.json_mode());
        assert!(agent.force_tool_use());
        assert_eq!(agent.tools().len(), 3);
    }
}
