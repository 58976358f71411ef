//! Newsreel: a depth-bounded news article crawler
//!
//! This crate implements a breadth-first crawler that starts from a set of seed
//! URLs, fetches linked news articles level by level with a bounded worker
//! pool, and streams extracted articles (or per-URL failures) to a consumer as
//! they become available.

pub mod config;
pub mod crawler;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Newsreel operations
///
/// Per-URL conditions (a page that fails to fetch or parse) are not errors at
/// this level; they travel through the outcome stream as
/// [`crawler::FetchOutcome::Failure`]. This enum covers the conditions that
/// abort a crawl.
#[derive(Debug, Error)]
pub enum NewsreelError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Crawl worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid seed URL: {0}")]
    InvalidSeed(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Unsupported URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Relative link without a base URL: {0}")]
    RelativeWithoutBase(String),
}

/// Result type alias for Newsreel operations
pub type Result<T> = std::result::Result<T, NewsreelError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Article, CrawlStream, CrawlSummary, FailureKind, FetchOutcome};
pub use crate::url::{is_article_href, normalize};
