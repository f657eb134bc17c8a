//! Agentic tool-calling loop.
//!
//! Drives the LLM ↔ tool execution round-trip: sends a request to the model,
//! executes any tool calls in the response, appends results, and repeats
//! until the model produces a final text response or the iteration limit
//! is reached.

use tracing::debug;

use super::message::{ChatRequest, ChatResponse, assistant_tool_calls_message, tool_message};
use super::provider::LlmProvider;
use crate::error::AgentError;
use crate::search::executor::ToolExecutor;

/// Runs an agentic loop: model → tool calls → tool results → model → …
///
/// Continues until the model responds without tool calls (i.e., it produces
/// a final text answer) or `max_iterations` is reached.
///
/// If `request.force_tool_use` is set, only the first round requires a
/// tool call; the flag is cleared after the first tool round so the model
/// can eventually answer in text.
///
/// # Arguments
///
/// * `provider` - LLM provider to call.
/// * `request` - Initial chat request (mutated in-place with tool messages).
/// * `executor` - Dispatches tool calls to the search backend.
/// * `max_iterations` - Safety limit on round-trips.
///
/// # Returns
///
/// The final [`ChatResponse`] containing the model's text answer.
/// The returned usage is cumulative across all rounds of the loop.
///
/// # Errors
///
/// Returns [`AgentError::ToolLoopExceeded`] if the model keeps requesting
/// tools beyond `max_iterations`. Propagates any provider errors.
pub async fn agentic_loop(
    provider: &dyn LlmProvider,
    request: &mut ChatRequest,
    executor: &ToolExecutor,
    max_iterations: usize,
) -> Result<ChatResponse, AgentError> {
    let mut total_usage = super::message::TokenUsage::default();

    for iteration in 0..max_iterations {
        let mut response = provider.chat(request).await?;
        total_usage.absorb(response.usage);

        // If no tool calls, we have a final answer
        if response.tool_calls.is_empty() {
            debug!(iteration, "agentic loop completed with final text response");
            response.usage = total_usage;
            return Ok(response);
        }

        debug!(
            iteration,
            tool_count = response.tool_calls.len(),
            "executing tool calls"
        );

        // Append the assistant message with tool calls
        request
            .messages
            .push(assistant_tool_calls_message(response.tool_calls.clone()));

        // Execute each tool call and append results
        for call in &response.tool_calls {
            let result = executor.execute(call).await;
            debug!(
                tool = call.name,
                call_id = call.id,
                is_error = result.is_error,
                "tool execution complete"
            );
            request
                .messages
                .push(tool_message(&result.tool_call_id, &result.content));
        }

        // The model has searched at least once; let it answer in text now
        request.force_tool_use = false;
    }

    Err(AgentError::ToolLoopExceeded { max_iterations })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::agent::message::{
        ChatRequest, ChatResponse, TokenUsage, system_message, user_message,
    };
    use crate::agent::tool::ToolCall;
    use crate::error::AgentError;
    use crate::search::{SearchHit, SearchTool};

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    /// Mock provider that returns tool calls on the first N calls,
    /// then a final text response.
    struct MockToolProvider {
        call_count: AtomicUsize,
        tool_rounds: usize,
    }

    impl MockToolProvider {
        fn new(tool_rounds: usize) -> Self {
            Self {
                call_count: AtomicUsize::new(0),
                tool_rounds,
            }
        }
    }

    #[async_trait]
    impl LlmProvider for MockToolProvider {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError> {
            let count = self.call_count.fetch_add(1, Ordering::SeqCst);

            if count < self.tool_rounds || request.force_tool_use {
                // Return a tool call
                Ok(ChatResponse {
                    content: String::new(),
                    usage: TokenUsage {
                        prompt_tokens: 10,
                        completion_tokens: 5,
                        total_tokens: 15,
                    },
                    tool_calls: vec![ToolCall {
                        id: format!("call_{count}"),
                        name: "web_search".to_string(),
                        arguments: r#"{"query":"test"}"#.to_string(),
                    }],
                    finish_reason: Some("tool_calls".to_string()),
                })
            } else {
                // Return final text
                Ok(ChatResponse {
                    content: "Final answer based on tool results.".to_string(),
                    usage: TokenUsage {
                        prompt_tokens: 100,
                        completion_tokens: 20,
                        total_tokens: 120,
                    },
                    tool_calls: Vec::new(),
                    finish_reason: Some("stop".to_string()),
                })
            }
        }
    }

    /// Search backend that returns one canned hit.
    struct MockSearchTool;

    #[async_trait]
    impl SearchTool for MockSearchTool {
        async fn search(
            &self,
            query: &str,
            _max_results: usize,
        ) -> Result<Vec<SearchHit>, AgentError> {
            Ok(vec![SearchHit {
                url: "https://example.com".to_string(),
                title: format!("Result for {query}"),
                snippet: "snippet".to_string(),
            }])
        }

        async fn fetch(&self, _url: &str) -> Result<String, AgentError> {
            Ok("page text".to_string())
        }
    }

    fn setup_executor() -> ToolExecutor {
        ToolExecutor::new(Arc::new(MockSearchTool), 8)
    }

    fn base_request(force_tool_use: bool) -> ChatRequest {
        ChatRequest {
            model: "test".to_string(),
            messages: vec![
                system_message("You are a test agent."),
                user_message("Search for something."),
            ],
            temperature: Some(0.0),
            max_tokens: Some(1024),
            json_mode: false,
            tools: Vec::new(),
            force_tool_use,
        }
    }

    #[tokio::test]
    async fn test_agentic_loop_single_tool_round() {
        let executor = setup_executor();
        let provider = MockToolProvider::new(1);
        let mut request = base_request(false);

        let response = agentic_loop(&provider, &mut request, &executor, 10)
            .await
            .unwrap_or_else(|e| panic!("agentic_loop failed: {e}"));

        assert_eq!(response.content, "Final answer based on tool results.");
        // Should have: system + user + assistant(tool_calls) + tool(result) = 4 messages
        assert_eq!(request.messages.len(), 4);
        // Usage is cumulative: 15 (tool round) + 120 (final)
        assert_eq!(response.usage.total_tokens, 135);
    }

    #[tokio::test]
    async fn test_agentic_loop_multiple_rounds() {
        let executor = setup_executor();
        let provider = MockToolProvider::new(3);
        let mut request = base_request(false);

        let response = agentic_loop(&provider, &mut request, &executor, 10)
            .await
            .unwrap_or_else(|e| panic!("agentic_loop failed: {e}"));

        assert_eq!(response.content, "Final answer based on tool results.");
        // 2 initial + 3 rounds * 2 (assistant + tool) = 8 messages
        assert_eq!(request.messages.len(), 8);
    }

    #[tokio::test]
    async fn test_agentic_loop_exceeds_max() {
        let executor = setup_executor();
        // Provider always returns tool calls (100 rounds > max of 2)
        let provider = MockToolProvider::new(100);
        let mut request = base_request(false);

        let result = agentic_loop(&provider, &mut request, &executor, 2).await;
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(
            matches!(err, AgentError::ToolLoopExceeded { max_iterations: 2 }),
            "Expected ToolLoopExceeded, got: {err}"
        );
    }

    #[tokio::test]
    async fn test_agentic_loop_no_tools() {
        let executor = setup_executor();
        // Provider returns text immediately (0 tool rounds)
        let provider = MockToolProvider::new(0);
        let mut request = base_request(false);

        let response = agentic_loop(&provider, &mut request, &executor, 10)
            .await
            .unwrap_or_else(|e| panic!("agentic_loop failed: {e}"));

        assert_eq!(response.content, "Final answer based on tool results.");
        // No tool rounds, so messages unchanged
        assert_eq!(request.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_agentic_loop_clears_forced_tool_use() {
        let executor = setup_executor();
        // Provider would answer in text immediately, but the forced flag
        // makes it call a tool on round one.
        let provider = MockToolProvider::new(0);
        let mut request = base_request(true);

        let response = agentic_loop(&provider, &mut request, &executor, 10)
            .await
            .unwrap_or_else(|e| panic!("agentic_loop failed: {e}"));

        assert_eq!(response.content, "Final answer based on tool results.");
        // Exactly one forced tool round happened
        assert_eq!(request.messages.len(), 4);
        assert!(!request.force_tool_use);
    }
}
