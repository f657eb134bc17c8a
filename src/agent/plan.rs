//! Data types for search plans, critiques, and pipeline results.
//!
//! These are the values flowing through the pipeline: the planner emits
//! a [`SearchPlan`], searchers produce [`SearchOutcome`]s, the critic
//! emits [`Critique`]s, and the orchestrator aggregates everything into
//! a [`PipelineResult`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reason text used for a revised item when the critic gave no critique.
pub const REVISED_REASON_PLACEHOLDER: &str = "revised";

/// A single planned or revised sub-query with its justification.
///
/// Immutable after creation: revision replaces an item with a new one
/// rather than mutating it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchItem {
    /// Why this search is relevant to the original query.
    pub reason: String,
    /// The search term to execute.
    pub query: String,
}

/// An ordered list of searches produced by the planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPlan {
    /// The searches to perform, in planning order.
    pub searches: Vec<SearchItem>,
}

impl SearchPlan {
    /// Number of items in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.searches.len()
    }

    /// Returns `true` if the plan contains no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.searches.is_empty()
    }
}

/// The critic's verdict on a single search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Critique {
    /// Whether the search result is good enough to keep as-is.
    pub is_good_enough: bool,
    /// Explanation of what was wrong and how to fix it.
    #[serde(default)]
    pub critique: Option<String>,
    /// Replacement search term, when a revision is suggested.
    #[serde(default)]
    pub revised_query: Option<String>,
}

impl Critique {
    /// Returns the revised item to search, or `None` to accept the
    /// original result.
    ///
    /// The original is accepted when `is_good_enough` is true or when no
    /// usable `revised_query` was suggested — a good verdict ignores any
    /// leftover revised query.
    #[must_use]
    pub fn revision_target(&self) -> Option<SearchItem> {
        if self.is_good_enough {
            return None;
        }
        let query = self.revised_query.as_deref()?.trim();
        if query.is_empty() {
            return None;
        }
        Some(SearchItem {
            reason: self
                .critique
                .clone()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| REVISED_REASON_PLACEHOLDER.to_string()),
            query: query.to_string(),
        })
    }
}

/// An accepted pairing of a search item and its result text.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    /// The item that produced this result (planned or revised).
    pub item: SearchItem,
    /// The searcher's result text.
    pub text: String,
}

/// Final result of a pipeline run.
///
/// `outcomes` is in arrival order, which is not plan order — callers
/// must treat it as a set.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    /// Accepted outcomes, in aggregation (arrival) order.
    pub outcomes: Vec<SearchOutcome>,
    /// Number of items in the plan.
    pub planned: usize,
    /// Initial searches that failed and were dropped.
    pub searches_failed: usize,
    /// Revisions the critic requested.
    pub revisions_attempted: usize,
    /// Revised searches that failed, dropping their item.
    pub revisions_failed: usize,
    /// Error messages from critic tasks whose item was dropped.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub critique_errors: Vec<String>,
    /// Total tokens consumed across all LLM calls.
    pub total_tokens: u32,
    /// Total elapsed time.
    #[serde(serialize_with = "serialize_duration")]
    pub elapsed: Duration,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_duration<S>(d: &Duration, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.serialize_f64(d.as_secs_f64())
}

impl PipelineResult {
    /// Renders the outcomes as a single markdown document.
    ///
    /// Each outcome becomes a block `# <query>` followed by its result
    /// text; blocks are separated by a blank line, in aggregation order.
    #[must_use]
    pub fn render_document(&self) -> String {
        let blocks: Vec<String> = self
            .outcomes
            .iter()
            .map(|o| format!("# {}\n{}", o.item.query, o.text))
            .collect();
        blocks.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(query: &str) -> SearchItem {
        SearchItem {
            reason: "test".to_string(),
            query: query.to_string(),
        }
    }

    #[test]
    fn test_plan_deserialization() {
        let json = r#"{"searches": [{"reason": "recent news", "query": "acme earnings"}]}"#;
        let plan: SearchPlan = serde_json::from_str(json).unwrap_or_else(|_| unreachable!());
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.searches[0].query, "acme earnings");
    }

    #[test]
    fn test_critique_good_enough_ignores_revised_query() {
        let critique = Critique {
            is_good_enough: true,
            critique: Some("stale".to_string()),
            revised_query: Some("acme 2026".to_string()),
        };
        assert!(critique.revision_target().is_none());
    }

    #[test]
    fn test_critique_revision_uses_critique_as_reason() {
        let critique = Critique {
            is_good_enough: false,
            critique: Some("results were outdated".to_string()),
            revised_query: Some("acme earnings 2026".to_string()),
        };
        let revised = critique.revision_target().unwrap_or_else(|| unreachable!());
        assert_eq!(revised.query, "acme earnings 2026");
        assert_eq!(revised.reason, "results were outdated");
    }

    #[test]
    fn test_critique_revision_placeholder_reason() {
        let critique = Critique {
            is_good_enough: false,
            critique: None,
            revised_query: Some("better query".to_string()),
        };
        let revised = critique.revision_target().unwrap_or_else(|| unreachable!());
        assert_eq!(revised.reason, REVISED_REASON_PLACEHOLDER);
    }

    #[test]
    fn test_critique_no_revised_query_accepts_original() {
        let critique = Critique {
            is_good_enough: false,
            critique: Some("weak results".to_string()),
            revised_query: None,
        };
        assert!(critique.revision_target().is_none());

        let critique = Critique {
            is_good_enough: false,
            critique: None,
            revised_query: Some("   ".to_string()),
        };
        assert!(critique.revision_target().is_none());
    }

    #[test]
    fn test_critique_defaults_on_sparse_json() {
        let json = r#"{"is_good_enough": true}"#;
        let critique: Critique = serde_json::from_str(json).unwrap_or_else(|_| unreachable!());
        assert!(critique.is_good_enough);
        assert!(critique.critique.is_none());
        assert!(critique.revised_query.is_none());
    }

    #[test]
    fn test_render_document() {
        let result = PipelineResult {
            outcomes: vec![
                SearchOutcome {
                    item: item("first query"),
                    text: "first text".to_string(),
                },
                SearchOutcome {
                    item: item("second query"),
                    text: "second text".to_string(),
                },
            ],
            planned: 2,
            searches_failed: 0,
            revisions_attempted: 0,
            revisions_failed: 0,
            critique_errors: Vec::new(),
            total_tokens: 0,
            elapsed: Duration::ZERO,
        };
        assert_eq!(
            result.render_document(),
            "# first query\nfirst text\n\n# second query\nsecond text"
        );
    }

    #[test]
    fn test_render_document_empty() {
        let result = PipelineResult {
            outcomes: Vec::new(),
            planned: 3,
            searches_failed: 3,
            revisions_attempted: 0,
            revisions_failed: 0,
            critique_errors: Vec::new(),
            total_tokens: 0,
            elapsed: Duration::ZERO,
        };
        assert!(result.render_document().is_empty());
    }
}
