//! Agentic web research pipeline.
//!
//! Turns a free-form query into a set of web-research results via a
//! multi-stage pipeline: an LLM planner produces sub-queries, each is
//! executed concurrently by a search agent with web tools, a critic
//! evaluates every result, and a failed critique triggers at most one
//! revised search. Accepted results are aggregated into a document.
//!
//! # Architecture
//!
//! ```text
//! User query → Orchestrator
//!   ├── PlannerAgent → SearchPlan (5–15 sub-queries)
//!   ├── Stage 1 fan-out → N concurrent SearcherAgents
//!   │   └── each drives web_search/fetch_page tools → result text
//!   ├── Stage 2 fan-out → one CriticAgent per surviving result
//!   │   └── revise? → exactly one more search within the same task
//!   └── Aggregate accepted (item, text) pairs → PipelineResult
//! ```
//!
//! Failure policy: a failed search (initial or revised) silently drops
//! that item; a failed critique drops that item and is reported in the
//! result; only a planning failure aborts the run.

pub mod agent;
pub mod cli;
pub mod error;
pub mod mcp;
pub mod search;

pub use agent::{
    AgentConfig, Critique, Orchestrator, PipelineResult, PromptSet, SearchItem, SearchOutcome,
    SearchPlan,
};
pub use error::AgentError;
pub use search::{HttpSearchTool, SearchHit, SearchTool};
