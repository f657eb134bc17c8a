//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// WebSearch-RS: agentic web research from the command line.
///
/// Plans multiple web searches for a query, runs them concurrently,
/// critiques each result, and aggregates the survivors into a markdown
/// document.
#[derive(Parser, Debug)]
#[command(name = "websearch-rs")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the research pipeline for a query.
    ///
    /// Requires an OpenAI-compatible API key and a reachable
    /// SearxNG-compatible search endpoint.
    #[command(after_help = r#"Examples:
  websearch-rs search "tell me about the latest acme earnings"
  websearch-rs search "rust async runtimes compared" --json
  websearch-rs search "quantum error correction" --plan-min 3 --plan-max 8
  websearch-rs search "k8s 1.31 changes" --search-url http://searx.local:8888
  OPENAI_API_KEY=sk-... websearch-rs search "explain MCP transports"
"#)]
    Search {
        /// The research question or topic. Multiple words are joined.
        #[arg(required = true)]
        query: Vec<String>,

        /// Emit the full pipeline result as JSON instead of markdown.
        #[arg(long)]
        json: bool,

        /// Model for the planner agent.
        #[arg(long)]
        planner_model: Option<String>,

        /// Model for searcher agents.
        #[arg(long)]
        searcher_model: Option<String>,

        /// Model for the critic agent.
        #[arg(long)]
        critic_model: Option<String>,

        /// Minimum number of planned searches.
        #[arg(long)]
        plan_min: Option<usize>,

        /// Maximum number of planned searches.
        #[arg(long)]
        plan_max: Option<usize>,

        /// Maximum results per web_search tool call.
        #[arg(long)]
        top_k: Option<usize>,

        /// Base URL of the SearxNG-compatible search endpoint.
        #[arg(long)]
        search_url: Option<String>,

        /// Directory containing prompt template files.
        #[arg(long)]
        prompt_dir: Option<PathBuf>,
    },

    /// Start MCP (Model Context Protocol) server.
    #[command(subcommand)]
    Mcp(McpCommands),

    /// Prompt template operations.
    #[command(subcommand)]
    Prompts(PromptCommands),
}

/// MCP server subcommands.
#[derive(Subcommand, Debug)]
pub enum McpCommands {
    /// Start MCP server with stdio transport.
    ///
    /// Reads JSON-RPC messages from stdin, writes responses to stdout.
    #[command(after_help = r#"Examples:
  websearch-rs mcp stdio                         # Start stdio MCP server
  OPENAI_API_KEY=sk-... websearch-rs mcp stdio   # With API key
"#)]
    Stdio,

    /// Start MCP server with SSE/HTTP transport.
    ///
    /// Listens for incoming HTTP connections using streamable HTTP transport.
    #[command(after_help = r#"Examples:
  websearch-rs mcp sse                            # Listen on 127.0.0.1:3000
  websearch-rs mcp sse --host 0.0.0.0 --port 8080
"#)]
    Sse {
        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to.
        #[arg(long, default_value = "3000")]
        port: u16,
    },
}

/// Prompt template subcommands.
#[derive(Subcommand, Debug)]
pub enum PromptCommands {
    /// Write default prompt templates to disk for customization.
    ///
    /// Creates markdown template files in the prompt directory so users
    /// can customize agent system prompts without recompiling. Existing
    /// files are left untouched.
    #[command(after_help = r#"Examples:
  websearch-rs prompts init                       # Write to ~/.config/websearch-rs/prompts/
  websearch-rs prompts init --dir ./my-prompts    # Write to custom directory
"#)]
    Init {
        /// Target directory for prompt templates.
        ///
        /// Defaults to `~/.config/websearch-rs/prompts/`.
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_joins_words() {
        let cli = Cli::parse_from(["websearch-rs", "search", "acme", "earnings", "outlook"]);
        match cli.command {
            Commands::Search { query, json, .. } => {
                assert_eq!(query.join(" "), "acme earnings outlook");
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_mcp_sse_defaults() {
        let cli = Cli::parse_from(["websearch-rs", "mcp", "sse"]);
        match cli.command {
            Commands::Mcp(McpCommands::Sse { host, port }) => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(port, 3000);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
