use crate::config::types::{Config, CrawlerConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_seeds(&config.seeds)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so no check needed

    if config.workers < 1 || config.workers > 64 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 64, got {}",
            config.workers
        )));
    }

    if config.fetch_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "fetch_attempts must be >= 1, got {}",
            config.fetch_attempts
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.data_dir.is_empty() {
        return Err(ConfigError::Validation(
            "data_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the seed URL list
fn validate_seeds(seeds: &[String]) -> Result<(), ConfigError> {
    if seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    }

    for seed in seeds {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidSeed(format!("{}: {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidSeed(format!(
                "{}: only http and https seeds are supported",
                seed
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{Config, CrawlerConfig, OutputConfig};

    fn create_test_config() -> Config {
        Config {
            crawler: CrawlerConfig {
                max_depth: 5,
                workers: 8,
                fetch_attempts: 5,
                retry_delay_ms: 1000,
                request_timeout_secs: 30,
            },
            output: OutputConfig {
                data_dir: "./data".to_string(),
            },
            seeds: vec!["https://www.bbc.co.uk/news/uk-politics-50874389".to_string()],
        }
    }

    #[test]
    fn test_valid_config() {
        let config = create_test_config();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = create_test_config();
        config.crawler.workers = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_excessive_workers_rejected() {
        let mut config = create_test_config();
        config.crawler.workers = 500;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_zero_fetch_attempts_rejected() {
        let mut config = create_test_config();
        config.crawler.fetch_attempts = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_data_dir_rejected() {
        let mut config = create_test_config();
        config.output.data_dir = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_seeds_rejected() {
        let mut config = create_test_config();
        config.seeds.clear();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_malformed_seed_rejected() {
        let mut config = create_test_config();
        config.seeds.push("not a url".to_string());
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidSeed(_))
        ));
    }

    #[test]
    fn test_non_http_seed_rejected() {
        let mut config = create_test_config();
        config.seeds.push("ftp://example.com/file".to_string());
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidSeed(_))
        ));
    }
}
