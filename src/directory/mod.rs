//! Organization directory feed
//!
//! Pulls the list of organization records from a JSON endpoint and keeps
//! the ones whose website is a usable crawl seed. Filtering happens here,
//! before any crawl task exists: a record with an unusable website never
//! becomes a task and never appears in the results.

use crate::config::{Config, DirectoryConfig};
use crate::{HarvestError, Result};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

/// One organization record from the feed
///
/// Feeds carry many more fields per record; only the website matters here.
#[derive(Debug, Clone, Deserialize)]
pub struct OrgRecord {
    #[serde(default)]
    pub website: Option<String>,
}

/// Parses a candidate seed, returning it only when it is an absolute
/// HTTP(S) URL with a host
pub fn parse_seed(candidate: &str) -> Option<Url> {
    let url = Url::parse(candidate).ok()?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.host_str()?;

    Some(url)
}

/// Resolves the seed list from the configuration
///
/// Inline seeds take precedence over the directory feed; validation has
/// already guaranteed that at least one source is present and that inline
/// seeds parse.
pub async fn resolve_seeds(client: &Client, config: &Config) -> Result<Vec<Url>> {
    if !config.seeds.is_empty() {
        let mut seeds = Vec::with_capacity(config.seeds.len());
        for seed in &config.seeds {
            seeds.push(Url::parse(seed)?);
        }
        return Ok(seeds);
    }

    match &config.directory {
        Some(directory) => fetch_seed_urls(client, directory).await,
        None => Ok(Vec::new()),
    }
}

/// Fetches the directory feed and returns the valid seed URLs
///
/// A feed that cannot be fetched or parsed is a hard error: without
/// seeds there is nothing to do. Individual bad records are only
/// logged and skipped.
pub async fn fetch_seed_urls(client: &Client, config: &DirectoryConfig) -> Result<Vec<Url>> {
    let body = client
        .get(&config.feed_url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    parse_seed_urls(&body, &config.records_field).map_err(|message| HarvestError::DirectoryFeed {
        url: config.feed_url.clone(),
        message,
    })
}

/// Extracts seed URLs from a feed document
fn parse_seed_urls(body: &str, records_field: &str) -> std::result::Result<Vec<Url>, String> {
    let document: serde_json::Value =
        serde_json::from_str(body).map_err(|e| format!("invalid JSON: {}", e))?;

    let records = document
        .get(records_field)
        .and_then(|value| value.as_array())
        .ok_or_else(|| format!("missing record array field '{}'", records_field))?;

    let mut seeds = Vec::new();
    for value in records {
        let record: OrgRecord = match serde_json::from_value(value.clone()) {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!("Skipping malformed directory record: {}", e);
                continue;
            }
        };

        let Some(website) = record.website else {
            continue;
        };

        match parse_seed(&website) {
            Some(url) => seeds.push(url),
            None => tracing::debug!("Skipping record with unusable website '{}'", website),
        }
    }

    Ok(seeds)
}
