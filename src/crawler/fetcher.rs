//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvest pipeline:
//! - Building the HTTP client shared by the whole batch
//! - GET requests with cache-aside memoization
//! - Folding every failure into a loggable, non-fatal outcome

use crate::config::CrawlerConfig;
use crate::crawler::cache::FetchCache;
use reqwest::Client;
use std::time::Duration;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("spire-harvest/", env!("CARGO_PKG_VERSION"));

/// Result of a fetch operation
///
/// A fetch never fails from the caller's point of view: transport errors,
/// non-success statuses, and body-decode failures all become `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Successfully fetched the page body
    Success {
        /// Page body content
        body: String,
    },

    /// Transport error, non-success HTTP status, or undecodable body
    Failed {
        /// Error description
        error: String,
    },
}

impl FetchOutcome {
    /// The fetched text, with failures flattened to the empty string
    ///
    /// Downstream consumers treat a failed fetch and an empty body the same
    /// way; the enum keeps the distinction alive for logging and for the
    /// per-page error field.
    pub fn text(&self) -> &str {
        match self {
            FetchOutcome::Success { body } => body,
            FetchOutcome::Failed { .. } => "",
        }
    }

    /// The failure description, if this outcome is a failure
    pub fn error(&self) -> Option<&str> {
        match self {
            FetchOutcome::Success { .. } => None,
            FetchOutcome::Failed { error } => Some(error),
        }
    }

    /// Returns true when the fetch did not produce a body
    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed { .. })
    }
}

/// Builds the HTTP client shared by all concurrent tasks
///
/// The client owns the connection pool; it is built once, before the first
/// task starts, and dropped only after the last task completes. No timeout
/// is applied unless one is configured; a hung request stalls only its own
/// task, since every other task keeps making progress on the shared runtime.
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(USER_AGENT)
        .gzip(true)
        .brotli(true);

    if let Some(seconds) = config.request_timeout {
        builder = builder.timeout(Duration::from_secs(seconds));
    }

    builder.build()
}

/// Cache-aside fetcher shared by every task in a batch
///
/// Holds the HTTP client (one connection pool) and the fetch cache (one
/// TTL+LRU map); both handles are passed in at construction so tests can
/// substitute their own.
pub struct Fetcher {
    client: Client,
    cache: FetchCache,
}

impl Fetcher {
    /// Creates a fetcher around an existing client and cache
    pub fn new(client: Client, cache: FetchCache) -> Self {
        Self { client, cache }
    }

    /// Fetches `url`, serving repeated requests from the cache
    ///
    /// Cache-aside: check the cache, on a miss perform the GET, store the
    /// body, return it. Only successful bodies are cached, since caching a
    /// transient failure would pin it for the whole TTL window. Every
    /// failure is logged with the offending URL.
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        if let Some(body) = self.cache.get(url) {
            tracing::trace!("Cache hit for {}", url);
            return FetchOutcome::Success { body };
        }

        match self.fetch_uncached(url).await {
            Ok(body) => {
                self.cache.put(url, body.clone());
                FetchOutcome::Success { body }
            }
            Err(error) => {
                tracing::error!("Error fetching {}: {}", url, error);
                FetchOutcome::Failed { error }
            }
        }
    }

    async fn fetch_uncached(&self, url: &str) -> Result<String, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        // Non-success statuses are failures, same as transport errors
        let response = response.error_for_status().map_err(|e| e.to_string())?;

        response.text().await.map_err(|e| e.to_string())
    }
}
