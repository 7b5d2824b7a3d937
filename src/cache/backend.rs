//! Cache collaborator contract and its in-process implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheStats, CacheStore};
use crate::error::CacheError;

/// Key-value cache as seen by the managers.
///
/// `get` distinguishes a clean miss (`Ok(None)`) from a lookup failure
/// (`Err`). Values are opaque strings; the coordinator owns the encoding.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Removes every listed key and returns how many existed.
    async fn delete(&self, keys: &[String]) -> Result<usize, CacheError>;

    async fn stats(&self) -> CacheStats;
}

// == Memory Cache ==
/// [`Cache`] backed by a shared [`CacheStore`].
///
/// Clones share the same store, so the cleanup task and the managers see
/// one cache.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<CacheStore>>,
}

impl MemoryCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(max_entries))),
        }
    }

    /// Handle to the underlying store for the TTL sweeper.
    pub fn store(&self) -> Arc<RwLock<CacheStore>> {
        Arc::clone(&self.store)
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        // Write lock: a lookup updates LRU order and counters
        Ok(self.store.write().await.get(key))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        self.store.write().await.set(key.to_string(), value, ttl)
    }

    async fn delete(&self, keys: &[String]) -> Result<usize, CacheError> {
        let mut store = self.store.write().await;
        Ok(keys.iter().filter(|key| store.delete(key)).count())
    }

    async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }
}
