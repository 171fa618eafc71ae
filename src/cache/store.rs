//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL expiration.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::stats::Counters;
use crate::cache::{CacheEntry, CacheStats, Clock, LruTracker, SystemClock};

// == Cache Settings ==
/// Store configuration, fixed for the lifetime of the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Default lifetime of an entry
    pub ttl: Duration,
    /// Hard capacity
    pub max_entries: usize,
    /// Cadence of the background sweep
    pub sweep_interval: Duration,
    /// When false, reads always miss and writes are dropped
    pub enabled: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30 * 60),
            max_entries: 500,
            sweep_interval: Duration::from_secs(60),
            enabled: true,
        }
    }
}

// == Cache Store ==
/// Capacity-bounded cache with TTL expiry and LRU eviction.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Hit, miss and eviction counters
    counters: Counters,
    settings: CacheSettings,
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store driven by the wall clock.
    pub fn new(settings: CacheSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    /// Creates a store driven by the given clock.
    pub fn with_clock(settings: CacheSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            counters: Counters::default(),
            settings,
            clock,
        }
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    // == Set ==
    /// Stores a value with the default TTL.
    pub fn set(&mut self, key: String, value: String) {
        let ttl = self.settings.ttl;
        self.set_with_ttl(key, value, ttl);
    }

    /// Stores a value with an explicit TTL.
    ///
    /// Overwriting an existing key resets its expiry. Any write into a full
    /// store first evicts the least recently used entry, even when the key
    /// is already present.
    pub fn set_with_ttl(&mut self, key: String, value: String, ttl: Duration) {
        if !self.settings.enabled || self.settings.max_entries == 0 {
            return;
        }

        let now = self.clock.now_ms();
        if self.entries.len() >= self.settings.max_entries {
            self.evict_lru();
        }

        let entry = CacheEntry::new(value, ttl.as_millis() as u64, now);
        self.entries.insert(key.clone(), entry);
        self.lru.touch(&key, now);
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Expired entries are removed on read and counted as misses.
    pub fn get(&mut self, key: &str) -> Option<String> {
        if !self.settings.enabled {
            return None;
        }

        let now = self.clock.now_ms();
        let Some(entry) = self.entries.get_mut(key) else {
            self.counters.record_miss();
            return None;
        };

        if entry.is_expired(now) {
            self.remove(key);
            self.counters.record_miss();
            return None;
        }

        entry.touch(now);
        let value = entry.value.clone();
        self.lru.touch(key, now);
        self.counters.record_hit();
        Some(value)
    }

    // == Peek ==
    /// Returns the entry without touching it or the counters.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    // == Stats ==
    /// Returns a snapshot of the store.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            max_size: self.settings.max_entries,
            ttl: self.settings.ttl.as_millis() as u64,
            enabled: self.settings.enabled,
            hits: self.counters.hits,
            misses: self.counters.misses,
            evictions: self.counters.evictions,
            hit_rate: self.counters.hit_rate(),
        }
    }

    // == Expiry ==
    /// Keys whose entries are expired right now.
    pub fn expired_keys(&self) -> Vec<String> {
        let now = self.clock.now_ms();
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Removes `key` only if it is still expired.
    ///
    /// The entry may have been overwritten since the sweep took its
    /// snapshot, in which case it is left alone.
    pub fn remove_if_expired(&mut self, key: &str) -> bool {
        let now = self.clock.now_ms();
        match self.entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                self.remove(key);
                true
            }
            _ => false,
        }
    }

    /// Removes all expired entries in one pass.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired = self.expired_keys();
        for key in &expired {
            self.remove(key);
        }
        expired.len()
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
        self.lru.remove(key);
    }

    fn evict_lru(&mut self) {
        if let Some(evicted) = self.lru.evict_oldest() {
            self.entries.remove(&evicted);
            self.counters.record_eviction();
            debug!(key = %evicted, "Cache eviction: removed least recently used entry");
        }
    }
}
