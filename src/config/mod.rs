//! Configuration loading and validation
//!
//! Newsreel is configured through a TOML file holding the crawl parameters,
//! the output location, and the seed URL list.

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{Config, CrawlerConfig, OutputConfig};
pub use validation::validate;
