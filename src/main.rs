//! Newsreel main entry point
//!
//! Command-line interface for the Newsreel news crawler.

use anyhow::Context;
use clap::Parser;
use newsreel::config::load_config_with_hash;
use newsreel::crawler::{crawl, FetchOutcome};
use newsreel::storage::ArticleStore;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Newsreel: a depth-bounded news article crawler
///
/// Newsreel starts from the configured seed URLs and crawls linked news
/// articles level by level, storing each extracted article as a JSON
/// document under the configured data directory.
#[derive(Parser, Debug)]
#[command(name = "newsreel")]
#[command(version)]
#[command(about = "A depth-bounded news article crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("newsreel=info,warn"),
            1 => EnvFilter::new("newsreel=debug,info"),
            2 => EnvFilter::new("newsreel=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration and exits
fn handle_dry_run(config: &newsreel::Config) {
    println!("=== Newsreel Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Workers: {}", config.crawler.workers);
    println!("  Fetch attempts: {}", config.crawler.fetch_attempts);
    println!("  Retry delay: {}ms", config.crawler.retry_delay_ms);
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_secs
    );

    println!("\nOutput:");
    println!("  Data directory: {}", config.output.data_dir);

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling from {} seed URLs to depth {}",
        config.seeds.len(),
        config.crawler.max_depth
    );
}

/// Handles the main crawl operation
async fn handle_crawl(config: newsreel::Config) -> anyhow::Result<()> {
    let store = ArticleStore::new(&config.output.data_dir);

    tracing::info!(
        "Starting crawl: {} seeds, max depth {}",
        config.seeds.len(),
        config.crawler.max_depth
    );

    let mut stream = crawl(&config)?;

    while let Some(outcome) = stream.next().await {
        match outcome {
            FetchOutcome::Success(article) => {
                let path = store.store(&article)?;
                tracing::info!("Stored \"{}\" at {}", article.title, path.display());
            }
            FetchOutcome::Failure { kind, url, depth } => {
                tracing::warn!("Skipped {} at depth {} ({} failure)", url, depth, kind);
            }
        }
    }

    let summary = stream.finish().await?;
    tracing::info!(
        "Crawl finished: {} levels, {} articles stored, {} pages skipped",
        summary.levels,
        summary.articles,
        summary.failures
    );

    Ok(())
}
