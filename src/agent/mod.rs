//! Agentic research pipeline.
//!
//! A query runs through three agent roles coordinated by the
//! [`Orchestrator`]:
//!
//! 1. **Planner** — decomposes the query into a bounded set of searches
//! 2. **Searchers** — fan out concurrently, one tool-calling agent per
//!    search term
//! 3. **Critic** — judges each result on arrival; a rejected result gets
//!    at most one revised search
//!
//! Providers are pluggable via the [`provider::LlmProvider`] trait.

pub mod agentic_loop;
pub mod config;
pub mod critic;
pub mod message;
pub mod orchestrator;
pub mod plan;
pub mod planner;
pub mod progress;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod searcher;
pub mod tool;
pub mod traits;

pub use config::{AgentConfig, AgentConfigBuilder};
pub use providers::create_provider;
pub use orchestrator::Orchestrator;
pub use plan::{Critique, PipelineResult, SearchItem, SearchOutcome, SearchPlan};
pub use progress::{NullSink, ProgressSink, TracingSink};
pub use prompt::PromptSet;
pub use traits::{Agent, AgentResponse};
