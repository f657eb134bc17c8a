//! Tool call dispatcher.
//!
//! Maps LLM tool calls by name onto the search backend. Execution never
//! returns `Err`: failures are folded into an error [`ToolResult`] so the
//! model can see what went wrong and try a different call.

use std::sync::Arc;

use serde_json::json;
use tracing::warn;

use super::{SearchTool, valid_http_url};
use crate::agent::tool::{ToolCall, ToolResult};
use crate::error::AgentError;

/// Upper bound on tool call argument payloads.
const MAX_TOOL_ARGS_LEN: usize = 4096;

/// Dispatches tool calls from the agentic loop to the search backend.
#[derive(Clone)]
pub struct ToolExecutor {
    search: Arc<dyn SearchTool>,
    top_k: usize,
}

impl ToolExecutor {
    /// Creates an executor over the given backend. `top_k` caps the
    /// number of results returned by `web_search`.
    #[must_use]
    pub fn new(search: Arc<dyn SearchTool>, top_k: usize) -> Self {
        Self { search, top_k }
    }

    /// Executes a tool call, returning the result to feed back to the model.
    ///
    /// Unknown tool names, malformed arguments, and backend failures all
    /// produce an error result rather than aborting the loop.
    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        match self.dispatch(call).await {
            Ok(content) => ToolResult {
                tool_call_id: call.id.clone(),
                content,
                is_error: false,
            },
            Err(e) => {
                warn!(tool = call.name, error = %e, "tool call failed");
                ToolResult {
                    tool_call_id: call.id.clone(),
                    content: format!("Error: {e}"),
                    is_error: true,
                }
            }
        }
    }

    async fn dispatch(&self, call: &ToolCall) -> Result<String, AgentError> {
        if call.arguments.len() > MAX_TOOL_ARGS_LEN {
            return Err(AgentError::ToolExecution {
                name: call.name.clone(),
                message: format!(
                    "arguments too large ({} bytes, max {MAX_TOOL_ARGS_LEN})",
                    call.arguments.len()
                ),
            });
        }

        let args: serde_json::Value =
            serde_json::from_str(&call.arguments).map_err(|e| AgentError::ToolExecution {
                name: call.name.clone(),
                message: format!("invalid JSON arguments: {e}"),
            })?;

        match call.name.as_str() {
            "web_search" => {
                let query = required_str(&args, "query", &call.name)?;
                let max_results = args["max_results"]
                    .as_u64()
                    .map_or(self.top_k, |n| usize::try_from(n).unwrap_or(self.top_k))
                    .min(self.top_k);
                let hits = self.search.search(query, max_results).await?;
                serde_json::to_string(&hits).map_err(|e| AgentError::ToolExecution {
                    name: call.name.clone(),
                    message: format!("failed to encode results: {e}"),
                })
            }
            "fetch_page" => {
                let url = required_str(&args, "url", &call.name)?;
                if !valid_http_url(url) {
                    return Err(AgentError::ToolExecution {
                        name: call.name.clone(),
                        message: format!("URL must start with http:// or https://: {url}"),
                    });
                }
                self.search.fetch(url).await
            }
            "search_top_result" => {
                let query = required_str(&args, "query", &call.name)?;
                let hits = self.search.search(query, 1).await?;
                let Some(top) = hits.first() else {
                    return Ok(json!({"message": "no results found"}).to_string());
                };
                let text = self.search.fetch(&top.url).await?;
                Ok(format!("# {} ({})\n{text}", top.title, top.url))
            }
            other => Err(AgentError::ToolExecution {
                name: other.to_string(),
                message: "unknown tool".to_string(),
            }),
        }
    }
}

impl std::fmt::Debug for ToolExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolExecutor")
            .field("top_k", &self.top_k)
            .finish_non_exhaustive()
    }
}

/// Extracts a required string field from tool arguments.
fn required_str<'a>(
    args: &'a serde_json::Value,
    field: &str,
    tool: &str,
) -> Result<&'a str, AgentError> {
    args[field]
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AgentError::ToolExecution {
            name: tool.to_string(),
            message: format!("missing required argument '{field}'"),
        })
}
