//! Crawl coordinator - level-order crawl orchestration
//!
//! This module drives the crawl round by round:
//! - drain the frontier's current level
//! - dispatch every item to a bounded pool of fetch workers
//! - collect outcomes in completion order on this single task, emitting each
//!   to the outcome stream and feeding discovered links into the next level
//! - wait for the whole level before starting the next one
//!
//! The round/barrier structure is what keeps the frontier single-writer: the
//! workers only ever return values, and all visited-set and queue mutation
//! happens in the collection loop below. The cost is that the slowest fetch
//! in a level gates the start of the next level.

use crate::crawler::fetch::{ArticleFetcher, Fetch, FetchOutcome};
use crate::crawler::frontier::Frontier;
use crate::url::normalize;
use crate::{NewsreelError, UrlError};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use url::Url;

/// Totals reported once a crawl ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Number of levels that were dispatched
    pub levels: u32,

    /// Successful article extractions
    pub articles: u64,

    /// Per-URL failures surfaced on the stream
    pub failures: u64,

    /// True if the consumer stopped reading before the crawl finished
    pub cancelled: bool,
}

/// Level-order crawl driver
///
/// Owns the frontier outright; worker tasks receive only the fetch-and-extract
/// unit and their frontier item.
pub struct Coordinator<F: Fetch + 'static> {
    fetcher: Arc<ArticleFetcher<F>>,
    frontier: Frontier,
    workers: usize,
}

impl<F: Fetch + 'static> Coordinator<F> {
    pub fn new(fetcher: ArticleFetcher<F>, max_depth: u32, workers: usize) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            frontier: Frontier::new(max_depth),
            workers,
        }
    }

    /// Accepts the seed URLs at depth 0
    ///
    /// Returns the number of distinct seeds accepted. A malformed seed is a
    /// configuration mistake, not a page condition, so it fails the crawl.
    pub fn seed(&mut self, seeds: &[String]) -> Result<usize, UrlError> {
        let mut accepted = 0;
        for seed in seeds {
            let url = normalize(seed, None)?;
            if self.frontier.accept(url, 0) {
                accepted += 1;
            }
        }
        Ok(accepted)
    }

    /// Runs the crawl to completion, emitting every outcome on `outcomes`
    ///
    /// Outcomes within a level arrive in completion order; a level is fully
    /// emitted before the next level starts. If the receiving side of
    /// `outcomes` is dropped, the crawl stops at the next emission point:
    /// in-flight fetches are aborted and the frontier is not touched again.
    ///
    /// A panicked worker indicates a bug, not a bad page, and aborts the
    /// whole crawl.
    pub async fn run(
        mut self,
        outcomes: mpsc::Sender<FetchOutcome>,
    ) -> Result<CrawlSummary, NewsreelError> {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut summary = CrawlSummary::default();

        loop {
            let items = self.frontier.drain_level();
            if items.is_empty() {
                break;
            }

            let level = summary.levels;
            tracing::info!("Dispatching level {} ({} URLs)", level, items.len());

            let mut in_flight = JoinSet::new();
            for item in items {
                let fetcher = Arc::clone(&self.fetcher);
                let semaphore = Arc::clone(&semaphore);
                in_flight.spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .expect("worker semaphore closed");
                    let outcome = fetcher.fetch_article(&item.url, item.depth).await;
                    (item.depth, outcome)
                });
            }

            while let Some(joined) = in_flight.join_next().await {
                let (depth, outcome) = joined.map_err(NewsreelError::Worker)?;

                let related: Vec<Url> = match &outcome {
                    FetchOutcome::Success(article) => {
                        summary.articles += 1;
                        article.related.clone()
                    }
                    FetchOutcome::Failure { .. } => {
                        summary.failures += 1;
                        Vec::new()
                    }
                };

                if outcomes.send(outcome).await.is_err() {
                    tracing::info!("Outcome consumer dropped, stopping crawl early");
                    summary.cancelled = true;
                    return Ok(summary);
                }

                for link in related {
                    self.frontier.accept(link, depth + 1);
                }
            }

            summary.levels += 1;
        }

        tracing::info!(
            "Crawl complete: {} levels, {} articles, {} failures, {} URLs visited",
            summary.levels,
            summary.articles,
            summary.failures,
            self.frontier.visited_count()
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::fetch::{FailureKind, FetchError};
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Scripted page graph standing in for the network
    struct PageGraph {
        pages: HashMap<String, String>,
    }

    #[async_trait]
    impl Fetch for PageGraph {
        async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
            self.pages.get(url.as_str()).cloned().ok_or_else(|| {
                FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                }
            })
        }
    }

    fn article_page(links: &[&str]) -> String {
        let anchors: String = links
            .iter()
            .map(|href| format!(r#"<a href="{}">link</a>"#, href))
            .collect();
        format!(
            r#"<html><head>
            <meta property="article:section" content="Politics" />
            </head><body>
            <h1>Headline</h1>
            <article>
                <time datetime="2019-12-19T14:23:58Z">date</time>
                <div data-component="text-block">Body text.</div>
                {anchors}
            </article>
            </body></html>"#
        )
    }

    fn coordinator(pages: HashMap<String, String>, max_depth: u32) -> Coordinator<PageGraph> {
        Coordinator::new(ArticleFetcher::new(PageGraph { pages }), max_depth, 8)
    }

    async fn collect(
        mut coordinator: Coordinator<PageGraph>,
        seeds: &[&str],
    ) -> (Vec<FetchOutcome>, CrawlSummary) {
        let seeds: Vec<String> = seeds.iter().map(|s| s.to_string()).collect();
        coordinator.seed(&seeds).unwrap();

        let (tx, mut rx) = mpsc::channel(16);
        let task = tokio::spawn(coordinator.run(tx));

        let mut outcomes = Vec::new();
        while let Some(outcome) = rx.recv().await {
            outcomes.push(outcome);
        }

        let summary = task.await.unwrap().unwrap();
        (outcomes, summary)
    }

    #[tokio::test]
    async fn test_empty_seed_list_terminates_immediately() {
        let (outcomes, summary) = collect(coordinator(HashMap::new(), 5), &[]).await;
        assert!(outcomes.is_empty());
        assert_eq!(summary.levels, 0);
        assert!(!summary.cancelled);
    }

    #[tokio::test]
    async fn test_malformed_seed_is_fatal() {
        let mut coordinator = coordinator(HashMap::new(), 5);
        assert!(coordinator.seed(&["not a url".to_string()]).is_err());
    }

    #[tokio::test]
    async fn test_two_level_crawl() {
        let mut pages = HashMap::new();
        pages.insert(
            "https://www.bbc.co.uk/news/a-1".to_string(),
            article_page(&["/news/b-2"]),
        );
        pages.insert(
            "https://www.bbc.co.uk/news/b-2".to_string(),
            article_page(&[]),
        );

        let (outcomes, summary) =
            collect(coordinator(pages, 5), &["https://www.bbc.co.uk/news/a-1"]).await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(summary.levels, 2);
        assert_eq!(summary.articles, 2);
        assert_eq!(summary.failures, 0);
    }

    #[tokio::test]
    async fn test_missing_page_is_a_failure_outcome() {
        let pages = HashMap::new();
        let (outcomes, summary) =
            collect(coordinator(pages, 5), &["https://www.bbc.co.uk/news/a-1"]).await;

        assert_eq!(outcomes.len(), 1);
        assert!(matches!(
            outcomes[0],
            FetchOutcome::Failure {
                kind: FailureKind::Network,
                ..
            }
        ));
        assert_eq!(summary.failures, 1);
    }

    #[tokio::test]
    async fn test_duplicate_seeds_fetched_once() {
        let mut pages = HashMap::new();
        pages.insert(
            "https://www.bbc.co.uk/news/a-1".to_string(),
            article_page(&[]),
        );

        let (outcomes, _) = collect(
            coordinator(pages, 5),
            &[
                "https://www.bbc.co.uk/news/a-1",
                // Same page through the mirror host and the insecure scheme
                "https://www.bbc.com/news/a-1",
                "http://www.bbc.co.uk/news/a-1",
            ],
        )
        .await;

        assert_eq!(outcomes.len(), 1);
    }

    #[tokio::test]
    async fn test_consumer_drop_cancels_crawl() {
        let mut pages = HashMap::new();
        pages.insert(
            "https://www.bbc.co.uk/news/a-1".to_string(),
            article_page(&["/news/b-2"]),
        );
        pages.insert(
            "https://www.bbc.co.uk/news/b-2".to_string(),
            article_page(&["/news/c-3"]),
        );
        pages.insert(
            "https://www.bbc.co.uk/news/c-3".to_string(),
            article_page(&[]),
        );

        let mut coordinator = coordinator(pages, 5);
        coordinator
            .seed(&["https://www.bbc.co.uk/news/a-1".to_string()])
            .unwrap();

        // Capacity 1 so the coordinator cannot buffer the whole crawl ahead
        // of the consumer
        let (tx, mut rx) = mpsc::channel(1);
        let task = tokio::spawn(coordinator.run(tx));

        // Take the first outcome, then walk away
        let first = rx.recv().await;
        assert!(first.is_some());
        drop(rx);

        let summary = task.await.unwrap().unwrap();
        assert!(summary.cancelled);
    }
}
