//! Crawler module: the concurrent fetch pipeline
//!
//! This module contains the core of the harvest, including:
//! - The TTL+LRU fetch cache shared by all tasks
//! - HTTP fetching that folds failures into data instead of raising
//! - Contact-link discovery and email extraction
//! - The batch runner fanning out over seeds with bounded concurrency

mod batch;
mod cache;
mod discover;
mod extract;
mod fetcher;

pub use batch::{BatchRunner, LogProgress, PageEmails, Progress, ResultMap};
pub use cache::FetchCache;
pub use discover::discover_contact_links;
pub use extract::extract_emails;
pub use fetcher::{build_http_client, FetchOutcome, Fetcher, USER_AGENT};
