//! Tool type definitions for LLM function-calling.
//!
//! Provides provider-agnostic types for tool definitions, calls, and results.
//! Tools expose web search and page fetching as function-calling targets
//! for the searcher agent.

use serde::{Deserialize, Serialize};
use serde_json::json;

/// A tool definition that can be sent to an LLM for function-calling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (must match the dispatch table in the executor).
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema object describing the tool's parameters.
    pub parameters: serde_json::Value,
}

/// A tool call requested by the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this call (assigned by the provider).
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// JSON-encoded arguments for the tool.
    pub arguments: String,
}

/// The result of executing a tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the tool call this result corresponds to.
    pub tool_call_id: String,
    /// Result content (JSON string on success, error message on failure).
    pub content: String,
    /// Whether this result represents an error.
    pub is_error: bool,
}

/// A set of tool definitions scoped to an agent role.
///
/// Only the searcher agent gets tools; the planner and critic receive
/// their context directly and produce structured JSON.
#[derive(Debug, Clone, Default)]
pub struct ToolSet {
    definitions: Vec<ToolDefinition>,
}

impl ToolSet {
    /// Returns the tool definitions in this set.
    #[must_use]
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Returns `true` if this set contains no tools.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Returns the number of tools in this set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Tool set for the searcher agent.
    ///
    /// Includes `web_search`, `fetch_page`, and `search_top_result`.
    #[must_use]
    pub fn searcher_tools() -> Self {
        Self {
            definitions: vec![def_web_search(), def_fetch_page(), def_search_top_result()],
        }
    }

    /// Empty tool set (no tools available).
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Tool schema definitions
// ---------------------------------------------------------------------------

/// Defines the `web_search` tool.
fn def_web_search() -> ToolDefinition {
    ToolDefinition {
        name: "web_search".to_string(),
        description: "Search the web for a query. Returns a JSON array of ranked results, \
                       each with url, title, and snippet."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query."
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of results to return. Defaults to 8.",
                    "default": 8
                }
            },
            "required": ["query"],
            "additionalProperties": false
        }),
    }
}

/// Defines the `fetch_page` tool.
fn def_fetch_page() -> ToolDefinition {
    ToolDefinition {
        name: "fetch_page".to_string(),
        description: "Fetch a web page and return its readable text content. The URL must \
                       start with http:// or https://."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "Full URL of the page to read."
                }
            },
            "required": ["url"],
            "additionalProperties": false
        }),
    }
}

/// Defines the `search_top_result` tool.
fn def_search_top_result() -> ToolDefinition {
    ToolDefinition {
        name: "search_top_result".to_string(),
        description: "Search the web for a query and return the readable text of the top \
                       result's page. Combines web_search and fetch_page in one call."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query."
                }
            },
            "required": ["query"],
            "additionalProperties": false
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toolset_searcher() {
        let ts = ToolSet::searcher_tools();
        assert_eq!(ts.len(), 3);
        let names: Vec<&str> = ts.definitions().iter().map(|d| d.name.as_str()).collect();
        assert!(names.contains(&"web_search"));
        assert!(names.contains(&"fetch_page"));
        assert!(names.contains(&"search_top_result"));
    }

    #[test]
    fn test_toolset_none() {
        let ts = ToolSet::none();
        assert!(ts.is_empty());
        assert_eq!(ts.len(), 0);
    }

    #[test]
    fn test_tool_definition_serialization() {
        let def = def_web_search();
        let json = serde_json::to_string(&def).unwrap_or_default();
        assert!(json.contains("web_search"));
        assert!(json.contains("max_results"));
    }

    #[test]
    fn test_tool_call_serialization() {
        let call = ToolCall {
            id: "call_123".to_string(),
            name: "fetch_page".to_string(),
            arguments: r#"{"url":"https://example.com"}"#.to_string(),
        };
        let json = serde_json::to_string(&call).unwrap_or_default();
        assert!(json.contains("call_123"));
        assert!(json.contains("fetch_page"));
    }

    #[test]
    fn test_all_definitions_have_valid_schemas() {
        let all = vec![def_web_search(), def_fetch_page(), def_search_top_result()];
        for def in &all {
            assert!(!def.name.is_empty());
            assert!(!def.description.is_empty());
            assert!(def.parameters.is_object());
            assert_eq!(def.parameters["type"], "object");
        }
    }
}
