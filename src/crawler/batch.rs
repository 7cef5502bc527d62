//! Batch runner: concurrent fan-out over seed URLs
//!
//! Every seed becomes one logical task. Tasks share one fetcher (one
//! connection pool, one cache) and at most `max_concurrent` of them are in
//! flight at a time; within a task the discovered contact pages are fetched
//! strictly in sequence. No individual seed failure terminates the batch;
//! failures are folded into the result data and a log line, and the runner's
//! only terminal state is "all tasks completed".

use crate::crawler::discover::discover_contact_links;
use crate::crawler::extract::extract_emails;
use crate::crawler::fetcher::Fetcher;
use futures::stream::{self, StreamExt};
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

/// Emails found on a single contact-page candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEmails {
    /// The candidate URL as fetched, or the raw href when resolution failed
    pub page_url: String,

    /// Pattern matches from the page, in order of appearance
    pub emails: Vec<String>,

    /// Fetch or resolution failure, if any. Kept apart from `emails` so an
    /// error description can never be mistaken for an address.
    pub error: Option<String>,
}

/// Mapping from seed URL to its per-contact-page results
///
/// Exactly one entry per seed, present even when every fetch for that seed
/// failed. An empty value means no contact candidates were found.
pub type ResultMap = HashMap<String, Vec<PageEmails>>;

/// Observer advanced as each seed completes
///
/// Completions arrive in whatever order the tasks resolve, not in seed
/// input order. The CLI installs a progress bar; tests install counters.
pub trait Progress: Send + Sync {
    fn seed_completed(&self, completed: usize, total: usize, seed: &str);
}

/// Progress sink that emits one tracing line per completed seed
pub struct LogProgress;

impl Progress for LogProgress {
    fn seed_completed(&self, completed: usize, total: usize, seed: &str) {
        tracing::info!("[{}/{}] completed {}", completed, total, seed);
    }
}

/// Orchestrates the fetch pipeline over a batch of seeds
pub struct BatchRunner {
    fetcher: Arc<Fetcher>,
    keywords: Vec<String>,
    email_pattern: Regex,
    max_concurrent: usize,
}

impl BatchRunner {
    /// Creates a runner
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Shared fetcher (client pool + cache) used by every task
    /// * `keywords` - Contact-link keywords, matched case-insensitively
    /// * `email_pattern` - Compiled email pattern applied to contact pages
    /// * `max_concurrent` - Maximum number of seeds in flight at once
    pub fn new(
        fetcher: Arc<Fetcher>,
        keywords: Vec<String>,
        email_pattern: Regex,
        max_concurrent: usize,
    ) -> Self {
        Self {
            fetcher,
            keywords,
            email_pattern,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Processes every seed and returns one result entry per seed
    ///
    /// Results are folded into the map in completion order and the progress
    /// observer advances with each one; the map is keyed by seed URL, so
    /// the final content is order-independent.
    pub async fn run(&self, seeds: &[Url], progress: &dyn Progress) -> ResultMap {
        let total = seeds.len();
        let mut results = ResultMap::with_capacity(total);

        let mut completions = stream::iter(seeds)
            .map(|seed| self.process_seed(seed))
            .buffer_unordered(self.max_concurrent);

        while let Some((seed, pages)) = completions.next().await {
            results.insert(seed.clone(), pages);
            progress.seed_completed(results.len(), total, &seed);
        }

        results
    }

    /// Processes one seed: discover contact candidates on its homepage,
    /// then fetch each candidate in sequence and extract emails
    ///
    /// Candidates are fetched one after another; only the seed fan-out
    /// is concurrent.
    pub async fn process_seed(&self, seed: &Url) -> (String, Vec<PageEmails>) {
        let homepage = self.fetcher.fetch(seed.as_str()).await;
        let candidates = discover_contact_links(homepage.text(), &self.keywords);

        tracing::info!("Found URLs for {}: {:?}", seed, candidates);

        let mut pages = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            pages.push(self.process_candidate(seed, candidate).await);
        }

        (seed.to_string(), pages)
    }

    /// Fetches one contact-page candidate and extracts its emails
    async fn process_candidate(&self, seed: &Url, href: String) -> PageEmails {
        // Hrefs come straight out of the markup; resolve relative ones
        // against the seed before fetching.
        let resolved = match seed.join(&href) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Unresolvable contact link '{}' on {}: {}", href, seed, e);
                return PageEmails {
                    page_url: href,
                    emails: Vec::new(),
                    error: Some(e.to_string()),
                };
            }
        };

        let outcome = self.fetcher.fetch(resolved.as_str()).await;

        PageEmails {
            page_url: resolved.to_string(),
            emails: extract_emails(outcome.text(), &self.email_pattern),
            error: outcome.error().map(|e| e.to_string()),
        }
    }
}
