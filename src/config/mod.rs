//! Configuration module for Spire-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use spire_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Report goes to: {}", config.output.report_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, DirectoryConfig, ExtractionConfig, KeywordConfig, OutputConfig,
    DEFAULT_EMAIL_PATTERN, DEFAULT_KEYWORDS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
