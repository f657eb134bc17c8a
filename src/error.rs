//! Error types for the research pipeline.
//!
//! A run either fails outright during planning or returns a (possibly
//! empty) result set: search failures are absorbed at the searcher
//! boundary and never surface as errors, while critic failures are
//! contained per item by the orchestrator.

use thiserror::Error;

/// Errors produced by agents, providers, and the orchestrator.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Planning failed. Fatal: aborts the whole run, no partial plan.
    #[error("planning failed: {message}")]
    Planning {
        /// What went wrong.
        message: String,
    },

    /// An LLM response did not validate against its expected schema.
    #[error("response parse failed: {message}")]
    ResponseParse {
        /// What went wrong.
        message: String,
        /// The raw response content, for diagnostics.
        content: String,
    },

    /// The provider API call failed.
    #[error("API request failed: {message}")]
    ApiRequest {
        /// Provider error description.
        message: String,
        /// HTTP status, when available.
        status: Option<u16>,
    },

    /// The web search tool failed (network, endpoint, or parse error).
    #[error("search tool failed: {message}")]
    SearchTool {
        /// What went wrong.
        message: String,
    },

    /// A tool call could not be executed.
    #[error("tool '{name}' failed: {message}")]
    ToolExecution {
        /// Name of the tool that failed.
        name: String,
        /// What went wrong.
        message: String,
    },

    /// The tool-calling loop exceeded its iteration limit.
    #[error("tool loop exceeded {max_iterations} iterations")]
    ToolLoopExceeded {
        /// The configured iteration limit.
        max_iterations: usize,
    },

    /// An orchestration-level failure (task join, invalid state).
    #[error("orchestration failed: {message}")]
    Orchestration {
        /// What went wrong.
        message: String,
    },

    /// No API key was configured.
    #[error("no API key configured (set OPENAI_API_KEY or WEBSEARCH_API_KEY)")]
    ApiKeyMissing,

    /// The configured provider name is not recognized.
    #[error("unsupported provider: {name}")]
    UnsupportedProvider {
        /// The unrecognized provider name.
        name: String,
    },
}

/// Convenience alias for pipeline results.
pub type Result<T> = std::result::Result<T, AgentError>;
