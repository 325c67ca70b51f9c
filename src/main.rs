use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::*;
use eyre::{Context, Result, bail};
use log::info;

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;

use redsift::analysis::{AnalysisOrchestrator, CancelFlag, RateLimiter, RetryPolicy, RunParams};
use redsift::domain::{Post, task_catalog};
use redsift::llm::{AnthropicClient, AnthropicConfig};
use redsift::prompt::PromptCatalog;
use redsift::scrape::{Listing, RedditClient, TimeFilter};

fn setup_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.is_verbose());

    let config = Config::load(cli.config.as_ref())?;
    config.validate()?;

    match &cli.command {
        Commands::Scrape {
            query,
            subreddit,
            listing,
            time,
            output,
        } => {
            handle_scrape(
                query.as_deref(),
                subreddit.as_deref(),
                listing,
                time,
                output,
                &config,
            )
            .await
        }
        Commands::Analyze {
            input,
            query,
            output,
            num_top_posts,
            min_comment_score,
        } => {
            let posts = read_corpus(input)?;
            let mut config = config;
            if let Some(n) = num_top_posts {
                config.analysis.num_top_posts = *n;
            }
            if let Some(t) = min_comment_score {
                config.analysis.min_comment_score = *t;
            }
            handle_analyze(posts, query, output.as_ref(), &config).await
        }
        Commands::Run { query, time, output } => {
            let posts = scrape_search(query, time, &config).await?;
            handle_analyze(posts, query, output.as_ref(), &config).await
        }
        Commands::Tasks => {
            handle_tasks();
            Ok(())
        }
    }
}

async fn handle_scrape(
    query: Option<&str>,
    subreddit: Option<&str>,
    listing: &str,
    time: &str,
    output: &PathBuf,
    config: &Config,
) -> Result<()> {
    let time_filter: TimeFilter = time.parse()?;
    let client = RedditClient::new(&config.reddit.user_agent)?;

    let posts = match (query, subreddit) {
        (Some(query), None) => {
            client
                .search(query, time_filter, config.reddit.search_limit)
                .await?
        }
        (None, Some(name)) => {
            let listing: Listing = listing.parse()?;
            client
                .subreddit_posts(name, listing, time_filter, config.reddit.search_limit)
                .await?
        }
        _ => bail!("Provide either --query or --subreddit"),
    };

    println!("{}", format!("Collected {} posts, fetching comments...", posts.len()).cyan());
    let posts = client.collect_comments(posts).await;

    fs::write(output, serde_json::to_string_pretty(&posts)?)
        .context(format!("Failed to write corpus to {}", output.display()))?;

    println!(
        "{}",
        format!("Wrote {} posts to {}", posts.len(), output.display()).green()
    );
    Ok(())
}

async fn scrape_search(query: &str, time: &str, config: &Config) -> Result<Vec<Post>> {
    let time_filter: TimeFilter = time.parse()?;
    let client = RedditClient::new(&config.reddit.user_agent)?;

    let posts = client
        .search(query, time_filter, config.reddit.search_limit)
        .await?;
    println!("{}", format!("Collected {} posts, fetching comments...", posts.len()).cyan());
    Ok(client.collect_comments(posts).await)
}

fn read_corpus(input: &PathBuf) -> Result<Vec<Post>> {
    let content = fs::read_to_string(input)
        .context(format!("Failed to read corpus from {}", input.display()))?;
    let posts: Vec<Post> = serde_json::from_str(&content)
        .context(format!("Invalid corpus JSON in {}", input.display()))?;
    info!("Loaded {} posts from {}", posts.len(), input.display());
    Ok(posts)
}

async fn handle_analyze(
    posts: Vec<Post>,
    query: &str,
    output: Option<&PathBuf>,
    config: &Config,
) -> Result<()> {
    let llm_config = AnthropicConfig {
        model: config.llm.model.clone(),
        max_tokens: config.llm.max_tokens,
        temperature: config.llm.temperature,
        top_p: config.llm.top_p,
        top_k: config.llm.top_k,
        timeout: Duration::from_secs(config.llm.timeout_secs),
    };
    let llm = Arc::new(AnthropicClient::new(llm_config)?);

    let orchestrator = AnalysisOrchestrator::new(
        llm,
        RateLimiter::new(config.analysis.rate_limit_per_second),
        RetryPolicy::new(
            config.analysis.max_retries,
            Duration::from_secs_f64(config.analysis.base_delay_secs),
        ),
        PromptCatalog::new(&config.prompts.templates_dir),
    );

    let params = RunParams::new(
        config.analysis.num_top_posts,
        config.analysis.min_comment_score,
    )
    .with_variable("search_query", query);

    let summary = orchestrator
        .run(&posts, &params, &CancelFlag::new(), |task_name, result| {
            if result.is_success() {
                println!("{}", format!("  ✓ {} completed", task_name).green());
            } else {
                let error = result.error.as_deref().unwrap_or("unknown error");
                println!("{}", format!("  ✗ {} failed: {}", task_name, error).red());
            }
        })
        .await?;

    println!(
        "{}",
        format!(
            "Analyzed {} posts: {} tasks succeeded, {} failed",
            summary.posts_analyzed,
            summary.succeeded(),
            summary.failed()
        )
        .cyan()
    );

    if let Some(path) = output {
        let mut export = serde_json::Map::new();
        for result in &summary.results {
            export.insert(result.task_name.clone(), serde_json::to_value(result)?);
        }
        fs::write(path, serde_json::to_string_pretty(&export)?)
            .context(format!("Failed to write results to {}", path.display()))?;
        println!("{}", format!("Wrote results to {}", path.display()).green());
    }

    Ok(())
}

fn handle_tasks() {
    println!("{}", "Analysis pipeline:".cyan());
    for task in task_catalog() {
        let suffix = if task.depends_on_prior {
            " (correlates prior results)"
        } else {
            ""
        };
        println!("  {}. {}{}", task.number, task.name, suffix);
    }
}
