//! Planner agent.
//!
//! Decomposes the research query into a bounded set of web searches,
//! each with a reason and a search term, driving the fan-out stage.

use async_trait::async_trait;

use super::config::AgentConfig;
use super::plan::{SearchItem, SearchPlan};
use super::provider::LlmProvider;
use super::prompt::render_planner_prompt;
use super::traits::{Agent, AgentResponse};
use crate::error::AgentError;

/// Agent that plans the searches for a research query.
pub struct PlannerAgent {
    model: String,
    max_tokens: u32,
    system_prompt: String,
    plan_min: usize,
    plan_max: usize,
}

impl PlannerAgent {
    /// Creates a new planner agent from the configuration and prompt template.
    #[must_use]
    pub fn new(config: &AgentConfig, prompt_template: &str) -> Self {
        Self {
            model: config.planner_model.clone(),
            max_tokens: config.planner_max_tokens,
            system_prompt: render_planner_prompt(prompt_template, config.plan_min, config.plan_max),
            plan_min: config.plan_min,
            plan_max: config.plan_max,
        }
    }

    /// Executes the agent and parses the search plan.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ResponseParse`] if the response is not a valid
    /// plan, or [`AgentError::Planning`] if the plan violates the size
    /// bounds or contains empty queries.
    pub async fn plan(
        &self,
        provider: &dyn LlmProvider,
        user_msg: &str,
    ) -> Result<(SearchPlan, AgentResponse), AgentError> {
        let response = self.execute(provider, user_msg).await?;
        let plan = Self::parse_plan(&response.content)?;
        self.validate_plan(&plan)?;
        Ok((plan, response))
    }

    /// Parses the agent's JSON response into a search plan.
    ///
    /// Accepts either the `{"searches": [...]}` envelope or a bare array
    /// of items.
    fn parse_plan(content: &str) -> Result<SearchPlan, AgentError> {
        let trimmed = content.trim();

        // Handle markdown code blocks
        let json_str = if trimmed.starts_with("```") {
            trimmed
                .trim_start_matches("```json")
                .trim_start_matches("```")
                .trim_end_matches("```")
                .trim()
        } else {
            trimmed
        };

        if let Ok(plan) = serde_json::from_str::<SearchPlan>(json_str) {
            return Ok(plan);
        }
        match serde_json::from_str::<Vec<SearchItem>>(json_str) {
            Ok(searches) => Ok(SearchPlan { searches }),
            Err(e) => Err(AgentError::ResponseParse {
                message: format!("Failed to parse search plan: {e}"),
                content: content.to_string(),
            }),
        }
    }

    /// Checks the plan against the configured size bounds.
    fn validate_plan(&self, plan: &SearchPlan) -> Result<(), AgentError> {
        if plan.len() < self.plan_min || plan.len() > self.plan_max {
            return Err(AgentError::Planning {
                message: format!(
                    "plan has {} searches, expected between {} and {}",
                    plan.len(),
                    self.plan_min,
                    self.plan_max
                ),
            });
        }
        if let Some(item) = plan.searches.iter().find(|i| i.query.trim().is_empty()) {
            return Err(AgentError::Planning {
                message: format!("plan contains an empty query (reason: {:?})", item.reason),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Agent for PlannerAgent {
    fn name(&self) -> &'static str {
        "planner"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    fn json_mode(&self) -> bool {
        true
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}
