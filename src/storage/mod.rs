//! Article persistence
//!
//! The store is the bundled consumer of the outcome stream: each successful
//! article is written as one JSON document under a directory named for its
//! publication date, with a truncated content digest as the file name:
//! `<data-dir>/19-12-19/1a2b3c4d5e.json`. The crawl core itself knows
//! nothing about this module.

use crate::crawler::Article;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Hex characters of the content digest kept for file names
const DIGEST_LEN: usize = 10;

/// Errors from persisting articles
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Writes articles to a date-partitioned directory tree
#[derive(Debug, Clone)]
pub struct ArticleStore {
    root: PathBuf,
}

impl ArticleStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Persists one article, returning the path it was written to
    ///
    /// The day directory is created on demand. Re-storing an identical
    /// article overwrites the same file, so stores are idempotent.
    pub fn store(&self, article: &Article) -> Result<PathBuf, StorageError> {
        let day = article.published.format("%y-%m-%d").to_string();
        let dir = self.root.join(day);
        fs::create_dir_all(&dir)?;

        let body = serde_json::to_string_pretty(&article.to_json())?;
        let path = dir.join(format!("{}.json", digest_prefix(&body)));
        fs::write(&path, body)?;

        Ok(path)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Truncated hex digest of the stored document body
fn digest_prefix(body: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..DIGEST_LEN].to_string()
}
