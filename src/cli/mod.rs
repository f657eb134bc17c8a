//! CLI layer for websearch-rs.
//!
//! Provides the command-line interface using clap, with commands for
//! running the research pipeline, serving MCP, and managing prompt
//! templates.

pub mod commands;
pub mod parser;

pub use commands::execute;
pub use parser::{Cli, Commands, McpCommands, PromptCommands};
