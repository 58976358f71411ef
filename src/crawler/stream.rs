//! The outcome stream handed to the crawl consumer
//!
//! A [`CrawlStream`] is a lazy, forward-only sequence of [`FetchOutcome`]
//! values: outcomes of level *d* are always yielded before any outcome of
//! level *d+1*, and within a level they arrive in fetch-completion order.

use crate::crawler::coordinator::CrawlSummary;
use crate::crawler::fetch::FetchOutcome;
use crate::{NewsreelError, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Handle to a running crawl: the outcome sequence plus the coordinator task
///
/// Dropping the stream - or calling [`finish`](Self::finish) before the
/// stream is exhausted - cancels the crawl cooperatively: the coordinator
/// notices the closed channel at its next emission, aborts in-flight fetches,
/// and leaves the frontier untouched from that point on.
pub struct CrawlStream {
    outcomes: mpsc::Receiver<FetchOutcome>,
    coordinator: JoinHandle<Result<CrawlSummary>>,
}

impl CrawlStream {
    pub(crate) fn new(
        outcomes: mpsc::Receiver<FetchOutcome>,
        coordinator: JoinHandle<Result<CrawlSummary>>,
    ) -> Self {
        Self {
            outcomes,
            coordinator,
        }
    }

    /// Yields the next outcome, or `None` once the crawl has terminated
    pub async fn next(&mut self) -> Option<FetchOutcome> {
        self.outcomes.recv().await
    }

    /// Waits for the coordinator and returns the crawl totals
    ///
    /// Call after [`next`](Self::next) has returned `None` to get the totals
    /// of a completed crawl; calling earlier cancels the remainder and
    /// returns the totals up to the cancellation point.
    pub async fn finish(self) -> Result<CrawlSummary> {
        // Closing the receiver is what tells a still-running coordinator to
        // stop.
        drop(self.outcomes);
        self.coordinator.await.map_err(NewsreelError::Worker)?
    }
}
