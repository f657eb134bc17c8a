//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use std::io::{self, Write as IoWrite};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use crate::agent::config::AgentConfig;
use crate::agent::orchestrator::Orchestrator;
use crate::agent::progress::TracingSink;
use crate::agent::prompt::PromptSet;
use crate::agent::providers::create_provider;
use crate::cli::parser::{Cli, Commands, McpCommands, PromptCommands};
use crate::search::HttpSearchTool;

/// Options collected from the `search` subcommand flags.
struct SearchOptions {
    query: String,
    json: bool,
    planner_model: Option<String>,
    searcher_model: Option<String>,
    critic_model: Option<String>,
    plan_min: Option<usize>,
    plan_max: Option<usize>,
    top_k: Option<usize>,
    search_url: Option<String>,
    prompt_dir: Option<PathBuf>,
}

/// Executes the parsed CLI command.
///
/// # Errors
///
/// Returns an error if the command fails; the message is suitable for
/// direct display to the user.
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Search {
            query,
            json,
            planner_model,
            searcher_model,
            critic_model,
            plan_min,
            plan_max,
            top_k,
            search_url,
            prompt_dir,
        } => {
            run_search(SearchOptions {
                query: query.join(" "),
                json,
                planner_model,
                searcher_model,
                critic_model,
                plan_min,
                plan_max,
                top_k,
                search_url,
                prompt_dir,
            })
            .await
        }
        Commands::Mcp(McpCommands::Stdio) => {
            let server = crate::mcp::WebSearchServer::new()
                .context("failed to start MCP server")?;
            crate::mcp::serve_stdio(server).await
        }
        Commands::Mcp(McpCommands::Sse { host, port }) => {
            // Probe the environment config up front for a clear error
            // before binding the listener.
            crate::mcp::WebSearchServer::new().context("failed to start MCP server")?;
            crate::mcp::serve_sse(&host, port).await
        }
        Commands::Prompts(PromptCommands::Init { dir }) => init_prompts(dir),
    }
}

/// Runs the research pipeline and writes the result to stdout.
async fn run_search(opts: SearchOptions) -> anyhow::Result<()> {
    let mut builder = AgentConfig::builder();
    if let Some(model) = opts.planner_model {
        builder = builder.planner_model(model);
    }
    if let Some(model) = opts.searcher_model {
        builder = builder.searcher_model(model);
    }
    if let Some(model) = opts.critic_model {
        builder = builder.critic_model(model);
    }
    if let Some(n) = opts.plan_min {
        builder = builder.plan_min(n);
    }
    if let Some(n) = opts.plan_max {
        builder = builder.plan_max(n);
    }
    if let Some(n) = opts.top_k {
        builder = builder.search_top_k(n);
    }
    if let Some(url) = opts.search_url {
        builder = builder.search_url(url);
    }
    if let Some(dir) = opts.prompt_dir {
        builder = builder.prompt_dir(dir);
    }
    let config = builder
        .from_env()
        .build()
        .context("invalid configuration (is OPENAI_API_KEY set?)")?;

    let provider = create_provider(&config).context("failed to create LLM provider")?;
    let search = HttpSearchTool::new(&config.search_url, config.timeout)
        .context("failed to create search client")?;

    let orchestrator = Orchestrator::new(Arc::from(provider), Arc::new(search), config)
        .with_progress(Arc::new(TracingSink));

    let result = orchestrator.run(&opts.query).await?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if opts.json {
        let json = serde_json::to_string_pretty(&result)?;
        writeln!(out, "{json}")?;
    } else {
        writeln!(out, "{}", result.render_document())?;
    }
    Ok(())
}

/// Writes default prompt templates to the target directory.
fn init_prompts(dir: Option<PathBuf>) -> anyhow::Result<()> {
    let target = dir
        .or_else(PromptSet::default_dir)
        .context("cannot determine prompt directory (no home directory)")?;

    let written = PromptSet::write_defaults(&target)
        .with_context(|| format!("failed to write prompts to {}", target.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if written.is_empty() {
        writeln!(out, "All prompt templates already exist in {}", target.display())?;
    } else {
        for path in &written {
            writeln!(out, "Wrote {}", path.display())?;
        }
    }
    Ok(())
}
