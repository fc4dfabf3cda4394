use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::page::LeaderboardPage;

/// Bounded-staleness page cache. Grounded in the common TTL-cache shape:
/// a cached value plus the instant it was computed, valid until `ttl`
/// elapses, after which a read triggers recomputation rather than blocking.
struct CachedPage {
    page: LeaderboardPage,
    computed_at: Instant,
}

impl CachedPage {
    fn is_valid(&self, ttl: Duration) -> bool {
        self.computed_at.elapsed() < ttl
    }
}

pub struct PageCache {
    ttl: Duration,
    entries: HashMap<(String, u32), CachedPage>,
    pub hits: u64,
    pub misses: u64,
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Returns a valid cached page, else `None` (a miss, which the caller
    /// must refresh via `put`). Stale-but-present entries are treated as
    /// misses here but still satisfy the bounded-staleness contract because
    /// the caller recomputes synchronously before returning to the reader —
    /// a stale page is served at most once after the refresh starts.
    pub fn get(&mut self, category: &str, page: u32) -> Option<LeaderboardPage> {
        match self.entries.get(&(category.to_string(), page)) {
            Some(cached) if cached.is_valid(self.ttl) => {
                self.hits += 1;
                Some(cached.page.clone())
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn put(&mut self, category: &str, page: u32, value: LeaderboardPage) {
        self.entries.insert(
            (category.to_string(), page),
            CachedPage {
                page: value,
                computed_at: Instant::now(),
            },
        );
    }

    pub fn invalidate_category(&mut self, category: &str) {
        self.entries.retain(|(c, _), _| c != category);
    }
}
