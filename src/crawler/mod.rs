//! Crawler module: fetching, extraction, and crawl orchestration
//!
//! This module contains the crawl core:
//! - fetching with retry behind the [`Fetch`] seam
//! - article extraction from fetched pages
//! - the single-writer frontier (visited set + level queue)
//! - the level-order coordinator and the outcome stream it feeds

mod coordinator;
mod extract;
mod fetch;
mod frontier;
mod stream;

pub use coordinator::{Coordinator, CrawlSummary};
pub use extract::{extract_article, Article, ExtractError};
pub use fetch::{
    build_http_client, ArticleFetcher, FailureKind, Fetch, FetchError, FetchOutcome, HttpFetch,
    RetryPolicy,
};
pub use frontier::{Frontier, FrontierItem};
pub use stream::CrawlStream;

use crate::config::{Config, CrawlerConfig};
use crate::Result;
use tokio::sync::mpsc;

/// Buffered outcomes between the coordinator and a slow consumer
const OUTCOME_BUFFER: usize = 64;

/// Starts a crawl over any [`Fetch`] implementation
///
/// Seeds are normalized and accepted at depth 0, the coordinator is spawned,
/// and the outcome stream is returned to the caller. Fails fast on a
/// malformed seed.
///
/// Must be called from within a tokio runtime.
pub fn start_crawl<F: Fetch + 'static>(
    fetch: F,
    seeds: &[String],
    options: &CrawlerConfig,
) -> Result<CrawlStream> {
    let fetcher = ArticleFetcher::new(fetch);
    let mut coordinator =
        Coordinator::new(fetcher, options.max_depth, options.workers as usize);
    coordinator.seed(seeds)?;

    let (tx, rx) = mpsc::channel(OUTCOME_BUFFER);
    let task = tokio::spawn(coordinator.run(tx));

    Ok(CrawlStream::new(rx, task))
}

/// Starts a crawl over the network with the configured HTTP client
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use newsreel::config::load_config;
/// use newsreel::crawler::crawl;
///
/// # async fn example() -> newsreel::Result<()> {
/// # let config = load_config(Path::new("config.toml")).unwrap();
/// let mut stream = crawl(&config)?;
/// while let Some(outcome) = stream.next().await {
///     println!("{:?}", outcome);
/// }
/// # Ok(())
/// # }
/// ```
pub fn crawl(config: &Config) -> Result<CrawlStream> {
    let client = build_http_client(config.crawler.request_timeout())?;
    let retry = RetryPolicy {
        attempts: config.crawler.fetch_attempts,
        delay: config.crawler.retry_delay(),
    };
    let fetch = HttpFetch::new(client, retry);

    start_crawl(fetch, &config.seeds, &config.crawler)
}
