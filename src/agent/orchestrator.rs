//! Orchestrator for the plan → search → critique research pipeline.
//!
//! Coordinates the full run: plan sub-queries, fan searches out
//! concurrently, critique each arriving result, run at most one revised
//! search per rejected result, and aggregate whatever survives.

use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinSet;
use tracing::{info, warn};

use super::config::AgentConfig;
use super::critic::CriticAgent;
use super::message::TokenUsage;
use super::plan::{PipelineResult, SearchOutcome};
use super::planner::PlannerAgent;
use super::progress::{NullSink, ProgressSink};
use super::prompt::{PromptSet, build_planner_prompt};
use super::provider::LlmProvider;
use super::searcher::SearcherAgent;
use crate::error::AgentError;
use crate::search::SearchTool;
use crate::search::executor::ToolExecutor;

/// Upper bound on the research query length.
const MAX_QUERY_LEN: usize = 10_000;

/// What one critique task did with its search result.
struct CritiqueVerdict {
    index: usize,
    outcome: Option<SearchOutcome>,
    revision_attempted: bool,
    revision_failed: bool,
    usage: TokenUsage,
}

/// Orchestrates the agentic research workflow.
///
/// Holds the provider, the search backend, and the prompt set; each
/// [`Orchestrator::run`] call executes one independent pipeline.
pub struct Orchestrator {
    provider: Arc<dyn LlmProvider>,
    executor: ToolExecutor,
    config: AgentConfig,
    prompts: PromptSet,
    progress: Arc<dyn ProgressSink>,
}

impl Orchestrator {
    /// Creates a new orchestrator with the given provider, search backend,
    /// and configuration.
    ///
    /// Loads prompt templates from the directory specified in
    /// [`AgentConfig::prompt_dir`], falling back to compiled-in defaults.
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        search: Arc<dyn SearchTool>,
        config: AgentConfig,
    ) -> Self {
        let prompts = PromptSet::load(config.prompt_dir.as_deref());
        let executor = ToolExecutor::new(search, config.search_top_k);
        Self {
            provider,
            executor,
            config,
            prompts,
            progress: Arc::new(NullSink),
        }
    }

    /// Replaces the progress sink.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Executes the full research pipeline for one query.
    ///
    /// # Steps
    ///
    /// 1. Plan sub-queries via [`PlannerAgent`]
    /// 2. Fan out one searcher task per plan item
    /// 3. Critique each result as it arrives; a rejected result gets at
    ///    most one revised search, accepted without re-critique
    /// 4. Aggregate surviving outcomes in arrival order
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Planning`] for empty, overlong, or
    /// out-of-bounds plans, and propagates planner API failures. Search
    /// and critique failures do not fail the run; they drop the affected
    /// item and are counted in the result.
    #[allow(clippy::too_many_lines)]
    pub async fn run(&self, query: &str) -> Result<PipelineResult, AgentError> {
        if query.trim().is_empty() {
            return Err(AgentError::Planning {
                message: "query cannot be empty".to_string(),
            });
        }
        if query.len() > MAX_QUERY_LEN {
            return Err(AgentError::Planning {
                message: format!(
                    "query exceeds maximum length ({} bytes, max {MAX_QUERY_LEN})",
                    query.len()
                ),
            });
        }

        let start = Instant::now();
        let mut total_usage = TokenUsage::default();

        // Step 1: Plan
        let planner = PlannerAgent::new(&self.config, &self.prompts.planner);
        let (plan, plan_response) = planner
            .plan(&*self.provider, &build_planner_prompt(query))
            .await?;
        total_usage.absorb(plan_response.usage);
        let planned = plan.len();
        info!(planned, "search plan ready");
        self.progress
            .on_update("plan", &format!("planned {planned} searches"), true);

        // Step 2: Fan out searches, one task per plan item
        let mut search_tasks: JoinSet<(usize, super::searcher::SearchAttempt)> = JoinSet::new();
        for (index, item) in plan.searches.into_iter().enumerate() {
            let provider = Arc::clone(&self.provider);
            let executor = self.executor.clone();
            let config = self.config.clone();
            let system_prompt = self.prompts.searcher.clone();
            let progress = Arc::clone(&self.progress);
            let delay = stagger_delay(self.config.request_delay, index);

            search_tasks.spawn(async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                progress.on_update(
                    &format!("search-{index}"),
                    &format!("searching: {}", item.query),
                    false,
                );
                let searcher = SearcherAgent::new(&config, system_prompt);
                let attempt = searcher.search(&*provider, &executor, &item).await;
                (index, attempt)
            });
        }

        // Step 3: Critique results as they arrive; each rejected result
        // gets one revised search, accepted as-is without re-critique.
        let mut critique_tasks: JoinSet<Result<CritiqueVerdict, AgentError>> = JoinSet::new();
        let mut searches_failed: usize = 0;

        while let Some(joined) = search_tasks.join_next().await {
            let (index, attempt) = match joined {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(error = %e, "search task panicked");
                    searches_failed += 1;
                    continue;
                }
            };
            total_usage.absorb(attempt.usage);

            let Some(outcome) = attempt.outcome else {
                searches_failed += 1;
                self.progress
                    .on_update(&format!("search-{index}"), "search failed", true);
                continue;
            };

            let provider = Arc::clone(&self.provider);
            let executor = self.executor.clone();
            let config = self.config.clone();
            let critic_template = self.prompts.critic.clone();
            let searcher_prompt = self.prompts.searcher.clone();
            let progress = Arc::clone(&self.progress);
            let original_query = query.to_string();

            critique_tasks.spawn(async move {
                let key = format!("search-{index}");
                progress.on_update(&key, "critiquing result", false);

                let critic = CriticAgent::new(&config, &critic_template);
                let (critique, response) = critic
                    .critique(&*provider, &original_query, &outcome.item, &outcome.text)
                    .await?;
                let mut usage = response.usage;

                let Some(revised) = critique.revision_target() else {
                    progress.on_update(&key, "accepted", true);
                    return Ok(CritiqueVerdict {
                        index,
                        outcome: Some(outcome),
                        revision_attempted: false,
                        revision_failed: false,
                        usage,
                    });
                };

                progress.on_update(&key, &format!("revising: {}", revised.query), false);
                let searcher = SearcherAgent::new(&config, searcher_prompt);
                let attempt = searcher.search(&*provider, &executor, &revised).await;
                usage.absorb(attempt.usage);

                let revision_failed = attempt.outcome.is_none();
                progress.on_update(
                    &key,
                    if revision_failed {
                        "revised search failed"
                    } else {
                        "revised result accepted"
                    },
                    true,
                );
                Ok(CritiqueVerdict {
                    index,
                    outcome: attempt.outcome,
                    revision_attempted: true,
                    revision_failed,
                    usage,
                })
            });
        }

        // Step 4: Aggregate in arrival order
        let mut outcomes: Vec<SearchOutcome> = Vec::new();
        let mut revisions_attempted: usize = 0;
        let mut revisions_failed: usize = 0;
        let mut critique_errors: Vec<String> = Vec::new();

        while let Some(joined) = critique_tasks.join_next().await {
            match joined {
                Ok(Ok(verdict)) => {
                    total_usage.absorb(verdict.usage);
                    if verdict.revision_attempted {
                        revisions_attempted += 1;
                    }
                    if verdict.revision_failed {
                        revisions_failed += 1;
                    }
                    if let Some(outcome) = verdict.outcome {
                        outcomes.push(outcome);
                    } else {
                        self.progress.on_update(
                            &format!("search-{}", verdict.index),
                            "dropped",
                            true,
                        );
                    }
                }
                Ok(Err(e)) => {
                    warn!(error = %e, "critique failed; dropping item");
                    critique_errors.push(e.to_string());
                }
                Err(e) => {
                    warn!(error = %e, "critique task panicked; dropping item");
                    critique_errors.push(format!("critique task panicked: {e}"));
                }
            }
        }

        let elapsed = start.elapsed();
        self.progress.on_finish(&format!(
            "collected {} of {planned} searches in {:.1}s",
            outcomes.len(),
            elapsed.as_secs_f64()
        ));

        Ok(PipelineResult {
            outcomes,
            planned,
            searches_failed,
            revisions_attempted,
            revisions_failed,
            critique_errors,
            total_tokens: total_usage.total_tokens,
            elapsed,
        })
    }

    /// Runs the pipeline and renders the outcomes as one markdown document.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Orchestrator::run`].
    pub async fn run_to_document(&self, query: &str) -> Result<String, AgentError> {
        Ok(self.run(query).await?.render_document())
    }
}

/// Per-task start delay, staggered by task index.
fn stagger_delay(base: std::time::Duration, index: usize) -> std::time::Duration {
    if base.is_zero() {
        return base;
    }
    base.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
