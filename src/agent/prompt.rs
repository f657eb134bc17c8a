//! System prompts and template builders for agents.
//!
//! Prompts are the core instructions that define each agent's behavior.
//! The planner and critic prompts are built at runtime so the plan-size
//! bound and today's date can be interpolated; the orchestrator is
//! specialized to a research domain purely by swapping the [`PromptSet`],
//! never by duplicating pipeline logic.

use std::path::Path;

use chrono::Local;

/// Template for the planner system prompt. `{min}`/`{max}` are replaced
/// with the configured plan bounds and `{today}` with the current date.
pub const PLANNER_PROMPT_TEMPLATE: &str = "You are a research planner. Given a request for \
    information, produce a set of web searches to gather the context needed. Aim for recent \
    coverage, primary sources, expert commentary, and relevant background. \
    Output between {min} and {max} search terms to query for.\n\n\
    Respond with a JSON object:\n\
    {\"searches\": [{\"reason\": \"why this search is relevant\", \"query\": \"the search term\"}]}\n\n\
    Return ONLY the JSON object, no surrounding text. \
    Additional info: today is {today}.";

/// System prompt for the searcher agent.
pub const SEARCHER_SYSTEM_PROMPT: &str = "You are a research assistant. Given a search term, \
    use web search to retrieve up-to-date context and produce a short summary of at most 300 \
    words. Use the web_search, fetch_page, or search_top_result tools to ground your summary \
    in actual page content; never answer from memory alone. Capture the main points succinctly \
    — the summary feeds into a larger research synthesis, so it is fine to omit fluff and \
    write in fragments.";

/// Template for the critic system prompt. `{today}` is replaced with the
/// current date.
pub const CRITIC_PROMPT_TEMPLATE: &str = "You critique searches that are meant to gather \
    relevant information for a research request. Given the original request, a search query, \
    and the search result, you decide whether the search was successful or needs to be \
    revised to get better results.\n\n\
    Respond with a JSON object:\n\
    {\"is_good_enough\": true or false,\n \
    \"critique\": \"if not successful, what the problem was and how to fix it\",\n \
    \"revised_query\": \"if not successful, a better search term\"}\n\n\
    Return ONLY the JSON object, no surrounding text. \
    Additional info: today is {today}.";

/// Default prompt directory under user config.
const DEFAULT_PROMPT_DIR: &str = ".config/websearch-rs/prompts";

/// Filename for the planner prompt template.
const PLANNER_FILENAME: &str = "planner.md";
/// Filename for the searcher prompt template.
const SEARCHER_FILENAME: &str = "searcher.md";
/// Filename for the critic prompt template.
const CRITIC_FILENAME: &str = "critic.md";

/// Renders the planner prompt with the configured plan bounds.
#[must_use]
pub fn render_planner_prompt(template: &str, plan_min: usize, plan_max: usize) -> String {
    template
        .replace("{min}", &plan_min.to_string())
        .replace("{max}", &plan_max.to_string())
        .replace("{today}", &today())
}

/// Renders the critic prompt.
#[must_use]
pub fn render_critic_prompt(template: &str) -> String {
    template.replace("{today}", &today())
}

/// Today's date in `YYYY-MM-DD` format.
fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// A set of system prompts (or prompt templates) for all agents.
///
/// Loaded from external template files when available, falling back to
/// compiled-in defaults. Use [`PromptSet::load`] to resolve the prompt
/// directory from CLI flags, environment variables, or the default path.
#[derive(Debug, Clone)]
pub struct PromptSet {
    /// Planner prompt template (`{min}`/`{max}`/`{today}` placeholders).
    pub planner: String,
    /// Searcher system prompt.
    pub searcher: String,
    /// Critic prompt template (`{today}` placeholder).
    pub critic: String,
}

impl PromptSet {
    /// Loads prompts from the given directory, falling back to compiled-in defaults.
    ///
    /// Resolution order for `prompt_dir`:
    /// 1. Explicit `prompt_dir` argument (from `--prompt-dir` CLI flag)
    /// 2. `WEBSEARCH_PROMPT_DIR` environment variable
    /// 3. `~/.config/websearch-rs/prompts/`
    ///
    /// Each file is loaded independently — a missing file uses its default.
    #[must_use]
    pub fn load(prompt_dir: Option<&Path>) -> Self {
        let resolved_dir = prompt_dir
            .map(std::path::PathBuf::from)
            .or_else(|| {
                std::env::var("WEBSEARCH_PROMPT_DIR")
                    .ok()
                    .map(std::path::PathBuf::from)
            })
            .or_else(|| dirs::home_dir().map(|h| h.join(DEFAULT_PROMPT_DIR)));

        let load_file = |filename: &str, default: &str| -> String {
            resolved_dir
                .as_ref()
                .map(|dir| dir.join(filename))
                .and_then(|path| std::fs::read_to_string(&path).ok())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            planner: load_file(PLANNER_FILENAME, PLANNER_PROMPT_TEMPLATE),
            searcher: load_file(SEARCHER_FILENAME, SEARCHER_SYSTEM_PROMPT),
            critic: load_file(CRITIC_FILENAME, CRITIC_PROMPT_TEMPLATE),
        }
    }

    /// Returns compiled-in defaults without checking the filesystem.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            planner: PLANNER_PROMPT_TEMPLATE.to_string(),
            searcher: SEARCHER_SYSTEM_PROMPT.to_string(),
            critic: CRITIC_PROMPT_TEMPLATE.to_string(),
        }
    }

    /// Writes the compiled-in default prompts to the given directory.
    ///
    /// Creates the directory if it does not exist. Existing files are
    /// **not** overwritten — use this for initial scaffolding only.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if directory creation or file writing fails.
    pub fn write_defaults(dir: &Path) -> std::io::Result<Vec<std::path::PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let templates = [
            (PLANNER_FILENAME, PLANNER_PROMPT_TEMPLATE),
            (SEARCHER_FILENAME, SEARCHER_SYSTEM_PROMPT),
            (CRITIC_FILENAME, CRITIC_PROMPT_TEMPLATE),
        ];

        let mut written = Vec::new();
        for (filename, content) in &templates {
            let path = dir.join(filename);
            if !path.exists() {
                std::fs::write(&path, content)?;
                written.push(path);
            }
        }

        Ok(written)
    }

    /// Returns the default prompt directory under the user's home.
    ///
    /// Returns `None` if the home directory cannot be determined.
    #[must_use]
    pub fn default_dir() -> Option<std::path::PathBuf> {
        dirs::home_dir().map(|h| h.join(DEFAULT_PROMPT_DIR))
    }
}

/// Builds the user message for the planner agent.
#[must_use]
pub fn build_planner_prompt(query: &str) -> String {
    format!("Query: {query}")
}

/// Builds the user message for a searcher agent.
#[must_use]
pub fn build_searcher_prompt(item: &super::plan::SearchItem) -> String {
    format!("Search term: {}\nReason: {}", item.query, item.reason)
}

/// Builds the user message for the critic agent from the evaluation triple.
#[must_use]
pub fn build_critic_prompt(original_query: &str, item: &super::plan::SearchItem, result: &str) -> String {
    format!(
        "Original query: {original_query}\nSearch terms: {}\nSearch result: {result}",
        item.query
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::plan::SearchItem;

    #[test]
    fn test_render_planner_prompt() {
        let prompt = render_planner_prompt(PLANNER_PROMPT_TEMPLATE, 5, 15);
        assert!(prompt.contains("between 5 and 15"));
        assert!(!prompt.contains("{min}"));
        assert!(!prompt.contains("{today}"));
    }

    #[test]
    fn test_render_critic_prompt() {
        let prompt = render_critic_prompt(CRITIC_PROMPT_TEMPLATE);
        assert!(!prompt.contains("{today}"));
        assert!(prompt.contains("is_good_enough"));
    }

    #[test]
    fn test_build_planner_prompt() {
        assert_eq!(build_planner_prompt("acme outlook"), "Query: acme outlook");
    }

    #[test]
    fn test_build_searcher_prompt() {
        let item = SearchItem {
            reason: "recent coverage".to_string(),
            query: "acme earnings".to_string(),
        };
        let prompt = build_searcher_prompt(&item);
        assert_eq!(
            prompt,
            "Search term: acme earnings\nReason: recent coverage"
        );
    }

    #[test]
    fn test_build_critic_prompt() {
        let item = SearchItem {
            reason: "recent coverage".to_string(),
            query: "acme earnings".to_string(),
        };
        let prompt = build_critic_prompt("acme outlook", &item, "some result");
        assert!(prompt.starts_with("Original query: acme outlook\n"));
        assert!(prompt.contains("Search terms: acme earnings\n"));
        assert!(prompt.ends_with("Search result: some result"));
    }

    #[test]
    fn test_load_from_dir_overrides() {
        let dir = tempfile::tempdir().unwrap_or_else(|_| unreachable!());
        std::fs::write(dir.path().join("searcher.md"), "custom searcher")
            .unwrap_or_else(|_| unreachable!());

        let prompts = PromptSet::load(Some(dir.path()));
        assert_eq!(prompts.searcher, "custom searcher");
        // Missing files fall back to defaults
        assert_eq!(prompts.planner, PLANNER_PROMPT_TEMPLATE);
        assert_eq!(prompts.critic, CRITIC_PROMPT_TEMPLATE);
    }

    #[test]
    fn test_write_defaults_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap_or_else(|_| unreachable!());
        std::fs::write(dir.path().join("planner.md"), "existing")
            .unwrap_or_else(|_| unreachable!());

        let written = PromptSet::write_defaults(dir.path()).unwrap_or_else(|_| unreachable!());
        // planner.md existed, so only searcher.md and critic.md are written
        assert_eq!(written.len(), 2);
        let existing = std::fs::read_to_string(dir.path().join("planner.md"))
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(existing, "existing");
    }

    #[test]
    fn test_prompts_not_empty() {
        assert!(!PLANNER_PROMPT_TEMPLATE.is_empty());
        assert!(!SEARCHER_SYSTEM_PROMPT.is_empty());
        assert!(!CRITIC_PROMPT_TEMPLATE.is_empty());
    }
}
