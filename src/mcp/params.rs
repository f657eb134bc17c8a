//! MCP tool parameter types.
//!
//! Defines the input schemas for MCP tools using `schemars` for automatic
//! JSON Schema generation required by the MCP protocol.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `web_search` MCP tool.
///
/// Runs the full research pipeline: plan → concurrent searches →
/// critique → revise → aggregate.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchParams {
    /// The research question or topic to investigate.
    pub query: String,
}
