//! MCP (Model Context Protocol) server for websearch-rs.
//!
//! Exposes the research pipeline as a single MCP tool, allowing external
//! agents to delegate web research to websearch-rs.
//!
//! # Architecture
//!
//! ```text
//! MCP Client (agent)
//!   ↓ web_search(query)
//! WebSearchServer
//!   ↓
//! Orchestrator::run()
//!   ├── PlannerAgent (plan sub-queries)
//!   ├── Fan-out → N SearcherAgents (web tools)
//!   └── CriticAgent per result → at most one revision
//!   ↓
//! markdown document → MCP Client
//! ```

pub mod params;
pub mod server;
pub mod transport;

pub use params::WebSearchParams;
pub use server::WebSearchServer;
pub use transport::{serve_sse, serve_stdio};
