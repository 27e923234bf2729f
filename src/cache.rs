use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::config::FRESHNESS_WINDOW_MINUTES;
use crate::filters::SearchFilters;
use crate::models::SearchResponse;
use crate::sort::{sort_repositories, SortKey, SortOrder};

/// The last successful result set and the filters that produced it.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Filters with sort and order blanked.
    pub filters: SearchFilters,
    pub response: SearchResponse,
    pub captured_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.captured_at) >= ttl
    }
}

/// Single-slot cache. A sort-only change is served from here; any other
/// filter change misses.
#[derive(Debug, Clone)]
pub struct ResultCache {
    entry: Option<CacheEntry>,
    ttl: Duration,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(Duration::minutes(FRESHNESS_WINDOW_MINUTES))
    }
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self { entry: None, ttl }
    }

    /// Returns the entry only when its filters (ignoring sort) match and it
    /// is younger than the freshness window.
    pub fn get(&self, filters: &SearchFilters, now: DateTime<Utc>) -> Option<CachedResult<'_>> {
        let entry = self.entry.as_ref()?;

        if entry.filters != filters.without_sort() {
            debug!("Cache miss: filters changed");
            return None;
        }
        if entry.is_expired(self.ttl, now) {
            debug!("Cache miss: entry older than {} minutes", self.ttl.num_minutes());
            return None;
        }

        Some(CachedResult {
            response: &entry.response,
        })
    }

    /// Replaces whatever was cached.
    pub fn put(&mut self, filters: &SearchFilters, response: SearchResponse, now: DateTime<Utc>) {
        self.entry = Some(CacheEntry {
            filters: filters.without_sort(),
            response,
            captured_at: now,
        });
    }

    /// Drops the entry.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }
}

/// A cache hit, borrowed from the slot.
#[derive(Debug, Clone, Copy)]
pub struct CachedResult<'a> {
    response: &'a SearchResponse,
}

impl CachedResult<'_> {
    /// The cached response with its items re-sorted in memory. Unknown sort
    /// keys keep the order the items were fetched in.
    pub fn view(&self, sort: &str, order: &str) -> SearchResponse {
        let mut view = self.response.clone();
        if let Some(key) = SortKey::parse(sort) {
            sort_repositories(&mut view.items, key, SortOrder::parse(order));
        }
        view
    }
}
