//! Page fetching for the crawler
//!
//! This module owns everything between a normalized URL and a
//! [`FetchOutcome`]:
//! - the [`Fetch`] seam the coordinator crawls through
//! - the production reqwest client with retry on transient failures
//! - the fetch-and-extract unit that classifies per-URL failures
//!
//! Nothing here touches shared state; each call produces a value and the
//! coordinator does all bookkeeping.

use crate::crawler::extract::{extract_article, Article};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use url::Url;

/// Capability to fetch the content of a page
///
/// The crawl core only ever talks to the network through this trait, so tests
/// can drive the coordinator with a scripted page graph and no sockets.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetches the page body for a URL, retrying transient failures
    ///
    /// An `Err` is terminal for this URL: either the failure was not
    /// transient, or the retry budget ran out.
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// Fetch failures, classified
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("connection to {url} failed: {message}")]
    Connect { url: String, message: String },

    #[error("transport error fetching {url}: {message}")]
    Transport { url: String, message: String },

    #[error("giving up on {url} after {attempts} attempts: {last}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last: String,
    },
}

impl FetchError {
    /// Whether another attempt could plausibly succeed
    ///
    /// Timeouts, connection failures, and server-side errors are transient;
    /// client errors (404 and friends) are not.
    fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Connect { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Retry parameters for transient fetch failures
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts per URL, including the first
    pub attempts: u32,

    /// Fixed delay between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay: Duration::from_secs(1),
        }
    }
}

/// Builds the shared HTTP client
pub fn build_http_client(request_timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("newsreel/", env!("CARGO_PKG_VERSION")))
        .timeout(request_timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Production [`Fetch`] implementation backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpFetch {
    client: Client,
    retry: RetryPolicy,
}

impl HttpFetch {
    pub fn new(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// One GET attempt, with the response classified into a [`FetchError`]
    async fn attempt(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_reqwest_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| classify_reqwest_error(url, e))
    }
}

#[async_trait]
impl Fetch for HttpFetch {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let mut last_error = None;

        for attempt in 1..=self.retry.attempts {
            match self.attempt(url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() => {
                    tracing::debug!(
                        "Attempt {}/{} for {} failed: {}",
                        attempt,
                        self.retry.attempts,
                        url,
                        e
                    );
                    last_error = Some(e);
                    if attempt < self.retry.attempts {
                        sleep(self.retry.delay).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Err(FetchError::RetriesExhausted {
            url: url.to_string(),
            attempts: self.retry.attempts,
            last: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no attempts made".to_string()),
        })
    }
}

/// Maps a reqwest error onto the fetch error taxonomy
fn classify_reqwest_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

/// Classification of a per-URL failure, surfaced on the outcome stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Fetch failed terminally (after retries, or a non-retryable status)
    Network,

    /// Page fetched but a required article field was absent or unparseable
    Extraction,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::Extraction => write!(f, "extraction"),
        }
    }
}

/// The outcome of one crawled URL
///
/// Every accepted frontier item produces exactly one of these on the outcome
/// stream.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The page yielded a structured article
    Success(Article),

    /// The page failed for a classified, per-URL reason
    Failure {
        kind: FailureKind,
        url: Url,
        depth: u32,
    },
}

/// The fetch-and-extract unit: one call per dispatched frontier item
///
/// Wraps a [`Fetch`] implementation and the article extractor behind a single
/// operation that always returns a value; classified failures become
/// [`FetchOutcome::Failure`] rather than errors.
#[derive(Debug)]
pub struct ArticleFetcher<F: Fetch> {
    fetch: F,
}

impl<F: Fetch> ArticleFetcher<F> {
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }

    /// Fetches and extracts one article
    pub async fn fetch_article(&self, url: &Url, depth: u32) -> FetchOutcome {
        let body = match self.fetch.fetch(url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Fetch failed for {}: {}", url, e);
                return FetchOutcome::Failure {
                    kind: FailureKind::Network,
                    url: url.clone(),
                    depth,
                };
            }
        };

        match extract_article(&body, url) {
            Ok(article) => FetchOutcome::Success(article),
            Err(e) => {
                tracing::warn!("Extraction failed for {}: {}", url, e);
                FetchOutcome::Failure {
                    kind: FailureKind::Extraction,
                    url: url.clone(),
                    depth,
                }
            }
        }
    }
}
