//! MCP server implementation for websearch-rs.
//!
//! Exposes the research pipeline as the `web_search` MCP tool. Each tool
//! call runs one full pipeline and returns the aggregated markdown
//! document.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use crate::agent::config::AgentConfig;
use crate::agent::orchestrator::Orchestrator;
use crate::agent::progress::TracingSink;
use crate::agent::providers::create_provider;
use crate::error::AgentError;
use crate::search::HttpSearchTool;

use super::params::WebSearchParams;

/// websearch-rs MCP server.
///
/// Provides the `web_search` tool, which runs the full research pipeline
/// and returns one markdown section per accepted search result.
#[derive(Clone)]
pub struct WebSearchServer {
    tool_router: ToolRouter<Self>,
    orchestrator: Arc<Orchestrator>,
}

#[tool_router]
impl WebSearchServer {
    /// Run the research pipeline: plan → search fan-out → critique → revise.
    #[tool(
        name = "web_search",
        description = "Perform in-depth web research on a query. Plans multiple searches, runs them concurrently, critiques each result and retries weak ones, then returns a markdown document with one section per search result."
    )]
    async fn web_search(
        &self,
        Parameters(params): Parameters<WebSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let document = self
            .orchestrator
            .run_to_document(&params.query)
            .await
            .map_err(|e| McpError::internal_error(format!("Research pipeline failed: {e}"), None))?;

        Ok(CallToolResult::success(vec![Content::text(document)]))
    }
}

#[tool_handler]
impl ServerHandler for WebSearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "websearch-rs".to_string(),
                title: Some("WebSearch-RS MCP Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "WebSearch-RS: agentic web research. Use the `web_search` tool with a \
                 research question; it plans and runs multiple web searches, critiques \
                 the results, and returns a markdown summary document."
                    .to_string(),
            ),
        }
    }
}

impl WebSearchServer {
    /// Creates a new MCP server from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the agent configuration cannot be loaded from
    /// environment variables, the LLM provider cannot be created, or the
    /// search backend client cannot be built.
    pub fn new() -> Result<Self, AgentError> {
        let config = AgentConfig::from_env()?;
        let provider = create_provider(&config)?;
        let search = HttpSearchTool::new(&config.search_url, config.timeout)?;

        let orchestrator = Arc::new(
            Orchestrator::new(Arc::from(provider), Arc::new(search), config)
                .with_progress(Arc::new(TracingSink)),
        );

        Ok(Self {
            tool_router: Self::tool_router(),
            orchestrator,
        })
    }
}
