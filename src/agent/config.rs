//! Agent configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::AgentError;

/// Default minimum number of planned searches.
const DEFAULT_PLAN_MIN: usize = 5;
/// Default maximum number of planned searches.
const DEFAULT_PLAN_MAX: usize = 15;
/// Default planner max tokens.
const DEFAULT_PLANNER_MAX_TOKENS: u32 = 2048;
/// Default searcher max tokens. The searcher produces a short summary,
/// but its tool rounds can carry large page extracts.
const DEFAULT_SEARCHER_MAX_TOKENS: u32 = 2048;
/// Default critic max tokens.
const DEFAULT_CRITIC_MAX_TOKENS: u32 = 1024;
/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;
/// Default maximum tool-calling loop iterations.
const DEFAULT_MAX_TOOL_ITERATIONS: usize = 10;
/// Default search results returned per `web_search` tool call.
const DEFAULT_SEARCH_TOP_K: usize = 8;
/// Default SearxNG-compatible search endpoint.
const DEFAULT_SEARCH_URL: &str = "http://localhost:8080";

/// Configuration for the research pipeline.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// LLM provider name (e.g., "openai").
    pub provider: String,
    /// API key for the provider.
    pub api_key: String,
    /// Optional base URL override (for proxies or compatible APIs).
    pub base_url: Option<String>,
    /// Model for the planner agent.
    pub planner_model: String,
    /// Model for searcher agents.
    pub searcher_model: String,
    /// Model for the critic agent.
    pub critic_model: String,
    /// Minimum number of searches a plan must contain.
    pub plan_min: usize,
    /// Maximum number of searches a plan may contain.
    pub plan_max: usize,
    /// Maximum tokens for planner responses.
    pub planner_max_tokens: u32,
    /// Maximum tokens for searcher responses.
    pub searcher_max_tokens: u32,
    /// Maximum tokens for critic responses.
    pub critic_max_tokens: u32,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum tool-calling loop iterations before aborting.
    pub max_tool_iterations: usize,
    /// Maximum results returned per `web_search` tool call.
    pub search_top_k: usize,
    /// Base URL of the SearxNG-compatible search endpoint.
    pub search_url: String,
    /// Directory containing prompt template files.
    ///
    /// When set, system prompts are loaded from markdown files in this
    /// directory, falling back to compiled-in defaults for any missing
    /// files.
    pub prompt_dir: Option<PathBuf>,
    /// Minimum delay before each spawned search task starts.
    ///
    /// Set to `Duration::ZERO` (default) to disable rate limiting.
    pub request_delay: Duration,
}

impl AgentConfig {
    /// Creates a new builder for `AgentConfig`.
    #[must_use]
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if no API key is found.
    pub fn from_env() -> Result<Self, AgentError> {
        Self::builder().from_env().build()
    }
}

/// Builder for [`AgentConfig`].
#[derive(Debug, Clone, Default)]
pub struct AgentConfigBuilder {
    provider: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    planner_model: Option<String>,
    searcher_model: Option<String>,
    critic_model: Option<String>,
    plan_min: Option<usize>,
    plan_max: Option<usize>,
    planner_max_tokens: Option<u32>,
    searcher_max_tokens: Option<u32>,
    critic_max_tokens: Option<u32>,
    timeout: Option<Duration>,
    max_tool_iterations: Option<usize>,
    search_top_k: Option<usize>,
    search_url: Option<String>,
    prompt_dir: Option<PathBuf>,
    request_delay: Option<Duration>,
}

impl AgentConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.provider.is_none() {
            self.provider = std::env::var("WEBSEARCH_PROVIDER").ok();
        }
        if self.api_key.is_none() {
            self.api_key = std::env::var("OPENAI_API_KEY")
                .or_else(|_| std::env::var("WEBSEARCH_API_KEY"))
                .ok();
        }
        if self.base_url.is_none() {
            self.base_url = std::env::var("OPENAI_BASE_URL")
                .or_else(|_| std::env::var("WEBSEARCH_BASE_URL"))
                .ok();
        }
        if self.planner_model.is_none() {
            self.planner_model = std::env::var("WEBSEARCH_PLANNER_MODEL").ok();
        }
        if self.searcher_model.is_none() {
            self.searcher_model = std::env::var("WEBSEARCH_SEARCHER_MODEL").ok();
        }
        if self.critic_model.is_none() {
            self.critic_model = std::env::var("WEBSEARCH_CRITIC_MODEL").ok();
        }
        if self.plan_min.is_none() {
            self.plan_min = std::env::var("WEBSEARCH_PLAN_MIN")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        if self.plan_max.is_none() {
            self.plan_max = std::env::var("WEBSEARCH_PLAN_MAX")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        if self.search_top_k.is_none() {
            self.search_top_k = std::env::var("WEBSEARCH_SEARCH_TOP_K")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        if self.search_url.is_none() {
            self.search_url = std::env::var("WEBSEARCH_SEARX_URL").ok();
        }
        if self.prompt_dir.is_none() {
            self.prompt_dir = std::env::var("WEBSEARCH_PROMPT_DIR")
                .ok()
                .map(PathBuf::from);
        }
        self
    }

    /// Sets the LLM provider name.
    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL override.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the planner model.
    #[must_use]
    pub fn planner_model(mut self, model: impl Into<String>) -> Self {
        self.planner_model = Some(model.into());
        self
    }

    /// Sets the searcher model.
    #[must_use]
    pub fn searcher_model(mut self, model: impl Into<String>) -> Self {
        self.searcher_model = Some(model.into());
        self
    }

    /// Sets the critic model.
    #[must_use]
    pub fn critic_model(mut self, model: impl Into<String>) -> Self {
        self.critic_model = Some(model.into());
        self
    }

    /// Sets the minimum plan size.
    #[must_use]
    pub const fn plan_min(mut self, n: usize) -> Self {
        self.plan_min = Some(n);
        self
    }

    /// Sets the maximum plan size.
    #[must_use]
    pub const fn plan_max(mut self, n: usize) -> Self {
        self.plan_max = Some(n);
        self
    }

    /// Sets the planner max tokens.
    #[must_use]
    pub const fn planner_max_tokens(mut self, n: u32) -> Self {
        self.planner_max_tokens = Some(n);
        self
    }

    /// Sets the searcher max tokens.
    #[must_use]
    pub const fn searcher_max_tokens(mut self, n: u32) -> Self {
        self.searcher_max_tokens = Some(n);
        self
    }

    /// Sets the critic max tokens.
    #[must_use]
    pub const fn critic_max_tokens(mut self, n: u32) -> Self {
        self.critic_max_tokens = Some(n);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Sets the maximum tool-calling loop iterations.
    #[must_use]
    pub const fn max_tool_iterations(mut self, n: usize) -> Self {
        self.max_tool_iterations = Some(n);
        self
    }

    /// Sets the maximum results per `web_search` tool call.
    #[must_use]
    pub const fn search_top_k(mut self, n: usize) -> Self {
        self.search_top_k = Some(n);
        self
    }

    /// Sets the search endpoint base URL.
    #[must_use]
    pub fn search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = Some(url.into());
        self
    }

    /// Sets the prompt template directory.
    #[must_use]
    pub fn prompt_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.prompt_dir = Some(dir.into());
        self
    }

    /// Sets the minimum delay before each spawned search task starts.
    #[must_use]
    pub const fn request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = Some(delay);
        self
    }

    /// Builds the [`AgentConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if no API key was set, or
    /// [`AgentError::Orchestration`] if the plan bounds are inverted.
    pub fn build(self) -> Result<AgentConfig, AgentError> {
        let api_key = self.api_key.ok_or(AgentError::ApiKeyMissing)?;

        let plan_min = self.plan_min.unwrap_or(DEFAULT_PLAN_MIN).max(1);
        let plan_max = self.plan_max.unwrap_or(DEFAULT_PLAN_MAX);
        if plan_max < plan_min {
            return Err(AgentError::Orchestration {
                message: format!("invalid plan bounds: min {plan_min} > max {plan_max}"),
            });
        }

        Ok(AgentConfig {
            provider: self.provider.unwrap_or_else(|| "openai".to_string()),
            api_key,
            base_url: self.base_url,
            planner_model: self
                .planner_model
                .unwrap_or_else(|| "gpt-4o-mini".to_string()),
            searcher_model: self
                .searcher_model
                .unwrap_or_else(|| "gpt-4o-mini".to_string()),
            critic_model: self.critic_model.unwrap_or_else(|| "gpt-4o-mini".to_string()),
            plan_min,
            plan_max,
            planner_max_tokens: self
                .planner_max_tokens
                .unwrap_or(DEFAULT_PLANNER_MAX_TOKENS),
            searcher_max_tokens: self
                .searcher_max_tokens
                .unwrap_or(DEFAULT_SEARCHER_MAX_TOKENS),
            critic_max_tokens: self.critic_max_tokens.unwrap_or(DEFAULT_CRITIC_MAX_TOKENS),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_tool_iterations: self
                .max_tool_iterations
                .unwrap_or(DEFAULT_MAX_TOOL_ITERATIONS),
            search_top_k: self.search_top_k.unwrap_or(DEFAULT_SEARCH_TOP_K),
            search_url: self
                .search_url
                .unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string()),
            prompt_dir: self.prompt_dir,
            request_delay: self.request_delay.unwrap_or(Duration::ZERO),
        })
    }
}
