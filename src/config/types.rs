use crate::{ConfigError, ConfigResult};
use regex::Regex;
use serde::Deserialize;

/// Default email pattern, used both for extraction and for re-validating
/// rows before the report is written.
pub const DEFAULT_EMAIL_PATTERN: &str = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}";

/// Default contact-page keywords. Mixed English/Dutch, matching the
/// organization directories this tool is usually pointed at.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "contact", "about", "over ons", "anbi", "gegevens", "info", "wie", "geven", "give", "gift",
    "donatie", "doneren", "doneer", "mail",
];

/// Main configuration structure for Spire-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,

    /// Directory feed to pull organization records from. Optional when
    /// seeds are listed inline.
    #[serde(default)]
    pub directory: Option<DirectoryConfig>,

    /// Inline seed URLs. Take precedence over the directory feed.
    #[serde(default)]
    pub seeds: Vec<String>,

    #[serde(default)]
    pub keywords: KeywordConfig,

    #[serde(default)]
    pub extraction: ExtractionConfig,

    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of seed URLs processed concurrently
    #[serde(rename = "max-concurrent-seeds", default = "default_max_concurrent_seeds")]
    pub max_concurrent_seeds: u32,

    /// Per-request timeout in seconds. Omitted means no timeout at all.
    #[serde(rename = "request-timeout", default)]
    pub request_timeout: Option<u64>,

    /// Maximum number of response bodies kept in the fetch cache
    #[serde(rename = "cache-max-entries", default = "default_cache_max_entries")]
    pub cache_max_entries: usize,

    /// Fetch cache time-to-live in seconds
    #[serde(rename = "cache-ttl", default = "default_cache_ttl")]
    pub cache_ttl: u64,
}

/// Directory feed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    /// Endpoint returning a JSON document with organization records
    #[serde(rename = "feed-url")]
    pub feed_url: String,

    /// Top-level field holding the record array (e.g. "churches")
    #[serde(rename = "records-field")]
    pub records_field: String,
}

/// Contact-link keyword configuration
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordConfig {
    /// Case-insensitive substrings that mark an href as contact-like
    #[serde(default = "default_keywords")]
    pub terms: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            terms: default_keywords(),
        }
    }
}

/// Email extraction configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Regular expression applied to raw page markup
    #[serde(rename = "email-pattern", default = "default_email_pattern")]
    pub email_pattern: String,
}

impl ExtractionConfig {
    /// Compiles the configured pattern
    ///
    /// Validation runs this at load time, so a config that came through
    /// `load_config` always compiles here.
    pub fn compile(&self) -> ConfigResult<Regex> {
        Regex::new(&self.email_pattern).map_err(|e| ConfigError::InvalidPattern(e.to_string()))
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            email_pattern: default_email_pattern(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the CSV report file
    #[serde(rename = "report-path")]
    pub report_path: String,
}

fn default_max_concurrent_seeds() -> u32 {
    50
}

fn default_cache_max_entries() -> usize {
    1000
}

fn default_cache_ttl() -> u64 {
    300
}

fn default_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

fn default_email_pattern() -> String {
    DEFAULT_EMAIL_PATTERN.to_string()
}
