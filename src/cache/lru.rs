//! LRU Tracker Module
//!
//! Orders keys by last access time for eviction.

use std::collections::{BTreeMap, HashMap};

/// Position of a key in the recency order: `(last_accessed_at, sequence)`.
///
/// The sequence number is assigned on every touch, so two accesses in the
/// same millisecond still have a fixed order.
type Stamp = (u64, u64);

// == LRU Tracker ==
/// Tracks access recency for LRU eviction.
///
/// The oldest key is the one with the smallest last-access timestamp; ties
/// go to whichever key was touched first.
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Keys ordered from least to most recently used
    order: BTreeMap<Stamp, String>,
    /// Current stamp of every tracked key
    stamps: HashMap<String, Stamp>,
    /// Monotonic access counter
    next_seq: u64,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as accessed at `now_ms`, inserting it if new.
    pub fn touch(&mut self, key: &str, now_ms: u64) {
        self.remove(key);

        let stamp = (now_ms, self.next_seq);
        self.next_seq += 1;

        self.order.insert(stamp, key.to_string());
        self.stamps.insert(key.to_string(), stamp);
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &str) {
        if let Some(stamp) = self.stamps.remove(key) {
            self.order.remove(&stamp);
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.stamps.remove(&key);
        Some(key)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&String> {
        self.order.values().next()
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
        self.stamps.clear();
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &str) -> bool {
        self.stamps.contains_key(key)
    }
}
