use crate::config::types::{Config, CrawlerConfig, DirectoryConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_seed_source(config)?;
    validate_keywords(&config.keywords.terms)?;
    config.extraction.compile()?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_seeds < 1 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_seeds must be >= 1, got {}",
            config.max_concurrent_seeds
        )));
    }

    if config.cache_max_entries < 1 {
        return Err(ConfigError::Validation(format!(
            "cache_max_entries must be >= 1, got {}",
            config.cache_max_entries
        )));
    }

    if config.cache_ttl < 1 {
        return Err(ConfigError::Validation(format!(
            "cache_ttl must be >= 1 second, got {}",
            config.cache_ttl
        )));
    }

    if let Some(timeout) = config.request_timeout {
        if timeout < 1 {
            return Err(ConfigError::Validation(format!(
                "request_timeout must be >= 1 second when set, got {}",
                timeout
            )));
        }
    }

    Ok(())
}

/// Validates that at least one seed source is configured and that inline
/// seeds are absolute HTTP(S) URLs
fn validate_seed_source(config: &Config) -> Result<(), ConfigError> {
    if config.seeds.is_empty() && config.directory.is_none() {
        return Err(ConfigError::Validation(
            "either inline seeds or a [directory] feed must be configured".to_string(),
        ));
    }

    for seed in &config.seeds {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "'{}': scheme must be http or https",
                seed
            )));
        }

        if url.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!("'{}': missing host", seed)));
        }
    }

    if let Some(directory) = &config.directory {
        validate_directory_config(directory)?;
    }

    Ok(())
}

/// Validates directory feed configuration
fn validate_directory_config(config: &DirectoryConfig) -> Result<(), ConfigError> {
    Url::parse(&config.feed_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid feed_url '{}': {}", config.feed_url, e)))?;

    if config.records_field.is_empty() {
        return Err(ConfigError::Validation(
            "records_field cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the keyword list
fn validate_keywords(terms: &[String]) -> Result<(), ConfigError> {
    if terms.is_empty() {
        return Err(ConfigError::Validation(
            "keyword list cannot be empty".to_string(),
        ));
    }

    if let Some(blank) = terms.iter().find(|t| t.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "keyword '{}' is blank",
            blank
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.report_path.is_empty() {
        return Err(ConfigError::Validation(
            "report_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
