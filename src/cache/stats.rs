//! Cache Statistics Module
//!
//! Snapshot of cache size, configuration and counters.

use serde::Serialize;

// == Cache Stats ==
/// Read-only view of the cache returned by the admin surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Current number of entries in the cache
    pub size: usize,
    /// Maximum number of entries
    pub max_size: usize,
    /// Default entry lifetime in milliseconds
    pub ttl: u64,
    /// Whether the cache is switched on
    pub enabled: bool,
    /// Number of successful cache reads
    pub hits: u64,
    /// Number of failed cache reads (absent or expired)
    pub misses: u64,
    /// Number of entries evicted by the LRU policy
    pub evictions: u64,
    /// hits / (hits + misses), 0.0 before the first read
    pub hit_rate: f64,
}

// == Counters ==
/// Running counters kept by the store.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Counters {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl Counters {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Hit Rate ==
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
