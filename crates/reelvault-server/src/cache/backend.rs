//! In-memory cache backend keyed by string, with TTL and tag tracking.

use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A cached entry with TTL support.
///
/// The data is wrapped in `Arc` to allow cheap cloning on cache hits,
/// avoiding copies of serialized response bodies.
#[derive(Clone, Debug)]
pub struct CachedEntry {
    pub data: Arc<Vec<u8>>,
    pub cached_at: Instant,
    pub ttl: Duration,
}

impl CachedEntry {
    pub fn new(data: Vec<u8>, ttl: Duration) -> Self {
        Self {
            data: Arc::new(data),
            cached_at: Instant::now(),
            ttl,
        }
    }

    /// Check if this entry has expired.
    pub fn is_expired(&self) -> bool {
        self.cached_at.elapsed() > self.ttl
    }
}

/// Single-instance cache backend built on `DashMap`.
///
/// Entries carry their own TTL; a second map tracks which keys belong to
/// which tag so a whole tag can be evicted after a write.
#[derive(Clone)]
pub struct CacheBackend {
    entries: Arc<DashMap<String, CachedEntry>>,
    tags: Arc<DashMap<String, HashSet<String>>>,
}

impl Default for CacheBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheBackend {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            tags: Arc::new(DashMap::new()),
        }
    }

    /// Get a value from the cache. Expired entries are removed on access.
    ///
    /// Returns `Arc<Vec<u8>>` for zero-copy access to cached data.
    pub fn get(&self, key: &str) -> Option<Arc<Vec<u8>>> {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired() {
                tracing::debug!(key = %key, "cache hit");
                return Some(Arc::clone(&entry.data));
            }
            drop(entry);
            self.entries.remove(key);
        }
        tracing::debug!(key = %key, "cache miss");
        None
    }

    /// Set a value in the cache with TTL, registering it under one or more tags.
    pub fn set(&self, key: &str, value: Vec<u8>, ttl: Duration, tags: &[&str]) {
        self.entries
            .insert(key.to_string(), CachedEntry::new(value, ttl));
        for tag in tags {
            self.tags
                .entry((*tag).to_string())
                .or_default()
                .insert(key.to_string());
        }
    }

    /// Invalidate a single cache entry.
    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
        tracing::debug!(key = %key, "cache invalidated");
    }

    /// Evict every entry registered under the tag.
    pub fn evict_by_tag(&self, tag: &str) {
        if let Some((_, keys)) = self.tags.remove(tag) {
            let count = keys.len();
            for key in keys {
                self.entries.remove(&key);
            }
            tracing::debug!(tag = %tag, evicted = count, "cache tag evicted");
        }
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub entries: usize,
}
