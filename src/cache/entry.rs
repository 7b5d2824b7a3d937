//! Cache Entry Module
//!
//! A serialized record copy together with its expiry deadline.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// One cached value with the instant it stops being served.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Serialized payload (JSON for every key the managers write)
    pub value: String,
    /// Deadline after which the entry counts as a miss
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that expires `ttl` from now.
    pub fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    // == Is Expired ==
    /// An entry is expired once the current instant reaches its deadline.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Expiry check against an explicit instant, used by the sweeper so one
    /// pass judges every entry against the same clock reading.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_fresh_is_not_expired() {
        let entry = CacheEntry::new("{}".to_string(), Duration::from_secs(600));

        assert_eq!(entry.value, "{}");
        assert!(!entry.is_expired());
        assert!(!entry.is_expired_at(Instant::now() + Duration::from_secs(599)));
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("{}".to_string(), Duration::from_millis(50));

        sleep(Duration::from_millis(80));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new("{}".to_string(), Duration::ZERO);

        // Zero TTL is already at its deadline
        assert!(entry.is_expired_at(entry.expires_at));
    }
}
