//! Spire-Harvest: contact-email harvesting for organization websites
//!
//! This crate implements a batch crawler that visits organization homepages,
//! follows links that look like contact pages, and collects the email
//! addresses found on those pages into a spreadsheet.

pub mod config;
pub mod crawler;
pub mod directory;
pub mod report;

use thiserror::Error;

/// Main error type for Spire-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Directory feed error for {url}: {message}")]
    DirectoryFeed { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Report error: {0}")]
    Report(#[from] csv::Error),

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

    #[error("Invalid seed URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid email pattern: {0}")]
    InvalidPattern(String),
}

/// Result type alias for Spire-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{BatchRunner, FetchCache, FetchOutcome, Fetcher, PageEmails, ResultMap};
