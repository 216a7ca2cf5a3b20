//! Memoization of lowest-common-ancestor results.
//!
//! Hierarchies are immutable once indexed and the LCA of a value set does
//! not depend on multiplicity, so results are keyed by the sorted, deduplicated
//! node handles of the query. Thread-safe using `Mutex` for LRU operations.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use lru::LruCache;

use crate::config::CacheConfig;
use crate::tree::NodeId;

/// Thread-safe LRU cache for LCA results.
pub struct LcaCache {
    inner: Mutex<LruCache<Vec<NodeId>, NodeId>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl LcaCache {
    /// Creates a cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Gets a memoized result. `key` must be sorted and deduplicated.
    pub fn get(&self, key: &[NodeId]) -> Option<NodeId> {
        let found = self
            .inner
            .lock()
            .ok()
            .and_then(|mut cache| cache.get(key).copied());

        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    /// Stores a result, evicting the least recently used entry when full.
    pub fn set(&self, key: Vec<NodeId>, lca: NodeId) {
        if let Ok(mut cache) = self.inner.lock() {
            cache.put(key, lca);
        }
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        match self.inner.lock() {
            Ok(cache) => cache.len(),
            _ => 0,
        }
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all entries and counters.
    pub fn clear(&self) {
        if let Ok(mut cache) = self.inner.lock() {
            cache.clear();
        }
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for LcaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("LcaCache")
            .field("entries", &stats.entries)
            .field("hits", &stats.hits)
            .field("misses", &stats.misses)
            .finish()
    }
}

/// Statistics about LCA cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheStats {
    /// Entries currently cached.
    pub entries: usize,
    /// Lookups answered from the cache.
    pub hits: usize,
    /// Lookups that had to be computed.
    pub misses: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
