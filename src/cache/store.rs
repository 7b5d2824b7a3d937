//! Cache Store Module
//!
//! In-process cache engine: HashMap storage, LRU bound and per-entry TTL.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::entry::CacheEntry;
use super::lru::LruTracker;
use crate::cache::{CacheStats, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::CacheError;

// == Cache Store ==
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    stats: CacheStats,
    max_entries: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store that holds at most `max_entries` keys.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries: max_entries.max(1),
        }
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl`, replacing any previous entry and
    /// resetting its TTL. Evicts the least recently used key when full.
    pub fn set(&mut self, key: String, value: String, ttl: Duration) -> Result<(), CacheError> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::Rejected {
                key,
                reason: format!("key exceeds {} bytes", MAX_KEY_LENGTH),
            });
        }
        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::Rejected {
                key,
                reason: format!("value exceeds {} bytes", MAX_VALUE_SIZE),
            });
        }

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                self.stats.evictions += 1;
            }
        }

        self.lru.touch(&key);
        self.entries.insert(key, CacheEntry::new(value, ttl));
        self.stats.writes += 1;
        Ok(())
    }

    // == Get ==
    /// Returns the live value for `key`. Expired entries are dropped on the
    /// spot and reported as a miss.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                let value = entry.value.clone();
                self.stats.hits += 1;
                self.lru.touch(key);
                return Some(value);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove(key);
            self.lru.remove(key);
        }
        self.stats.misses += 1;
        None
    }

    // == Delete ==
    /// Removes `key`; returns whether anything was there.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            self.stats.invalidations += 1;
            true
        } else {
            false
        }
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            ..self.stats.clone()
        }
    }

    // == Cleanup Expired ==
    /// Drops every expired entry and returns how many were removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.lru.remove(key);
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
