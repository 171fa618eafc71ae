//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL and
//! last-access bookkeeping.

// == Cache Entry ==
/// A single cached rewrite result with its timestamps.
///
/// `expires_at` is fixed when the entry is created. Reads only move
/// `last_accessed_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// The cached value
    pub value: String,
    /// Creation timestamp (clock milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (clock milliseconds)
    pub expires_at: u64,
    /// Last successful read, or creation time if never read
    pub last_accessed_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry that expires `ttl_ms` after `now_ms`.
    pub fn new(value: String, ttl_ms: u64, now_ms: u64) -> Self {
        Self {
            value,
            created_at: now_ms,
            expires_at: now_ms.saturating_add(ttl_ms),
            last_accessed_at: now_ms,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// An entry is expired once the current time has passed `expires_at`, so
    /// an entry with TTL `T` is live on `[created_at, created_at + T]`.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms > self.expires_at
    }

    // == Touch ==
    /// Records a successful read.
    pub fn touch(&mut self, now_ms: u64) {
        self.last_accessed_at = now_ms;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("test_value".to_string(), 60_000, 1_000);

        assert_eq!(entry.value, "test_value");
        assert_eq!(entry.created_at, 1_000);
        assert_eq!(entry.expires_at, 61_000);
        assert_eq!(entry.last_accessed_at, 1_000);
        assert!(!entry.is_expired(1_000));
    }

    #[test]
    fn test_entry_expiration_boundary() {
        let entry = CacheEntry::new("v".to_string(), 100, 0);

        assert!(!entry.is_expired(99));
        assert!(!entry.is_expired(100), "Entry should still be live at its expiry instant");
        assert!(entry.is_expired(101));
    }

    #[test]
    fn test_zero_ttl_expires_on_next_tick() {
        let entry = CacheEntry::new("v".to_string(), 0, 500);
        assert!(entry.is_expired(501));
    }

    #[test]
    fn test_touch_does_not_extend_expiry() {
        let mut entry = CacheEntry::new("v".to_string(), 100, 0);

        entry.touch(90);

        assert_eq!(entry.last_accessed_at, 90);
        assert_eq!(entry.expires_at, 100);
        assert!(entry.is_expired(101));
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let entry = CacheEntry::new("v".to_string(), u64::MAX, 10);
        assert_eq!(entry.expires_at, u64::MAX);
        assert!(!entry.is_expired(u64::MAX - 1));
    }
}
