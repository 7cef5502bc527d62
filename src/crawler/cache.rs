//! In-memory fetch cache
//!
//! Bounds duplicate network traffic within a single run. Entries expire
//! after a fixed time-to-live, and the cache holds at most a fixed number
//! of bodies, evicting the least-recently-used entry once full; whichever
//! limit triggers first removes an entry. Nothing is persisted across runs.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct CacheEntry {
    body: String,
    stored_at: Instant,
}

/// TTL + LRU bounded cache for fetched response bodies, keyed by the exact
/// URL string
///
/// The cache is shared by every concurrent task through a `Mutex`. The lock
/// is only held for map operations, never across I/O, so two tasks fetching
/// the same URL at the same moment may both miss and both hit the network.
/// That duplicate fetch is tolerated: the fetches are idempotent reads.
pub struct FetchCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl FetchCache {
    /// Creates a cache holding at most `max_entries` bodies, each valid
    /// for `ttl` after insertion
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Returns the cached body for `url` if present and not expired
    ///
    /// Expired entries are removed on access rather than by a background
    /// sweeper; an entry past its TTL behaves exactly like a miss.
    pub fn get(&self, url: &str) -> Option<String> {
        let mut entries = self.entries.lock().unwrap();

        match entries.get(url) {
            Some(entry) => {
                if entry.stored_at.elapsed() < self.ttl {
                    return Some(entry.body.clone());
                }
            }
            None => return None,
        }

        // Stale entry: drop it so the slot is freed for fresh bodies
        entries.pop(url);
        None
    }

    /// Stores a body for `url`, evicting the least-recently-used entry if
    /// the cache is full
    pub fn put(&self, url: &str, body: String) {
        let mut entries = self.entries.lock().unwrap();
        entries.put(
            url.to_string(),
            CacheEntry {
                body,
                stored_at: Instant::now(),
            },
        );
    }

    /// Number of entries currently held (including not-yet-collected stale ones)
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Returns true when the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
