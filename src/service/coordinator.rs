//! Cache Coordinator
//!
//! Stateless policy object shared by both managers: read-through lookups,
//! write-through refreshes, invalidation, and what happens when the cache
//! fails after the store has committed.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::cache::Cache;
use crate::config::CacheWritePolicy;
use crate::error::{CacheError, Result};

/// Clones share one invalidation generation, so managers built from the
/// same coordinator see each other's invalidations.
#[derive(Clone)]
pub struct CacheCoordinator {
    cache: Arc<dyn Cache>,
    ttl: Duration,
    write_policy: CacheWritePolicy,
    generation: Arc<AtomicU64>,
}

impl CacheCoordinator {
    pub fn new(cache: Arc<dyn Cache>, ttl: Duration, write_policy: CacheWritePolicy) -> Self {
        Self {
            cache,
            ttl,
            write_policy,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    // == Read Through ==
    /// Returns the cached value under `key`, or loads it from the store and
    /// caches it for the configured TTL.
    ///
    /// A lookup error is returned as-is. An entry that fails to decode is a
    /// hard [`CacheError::Corrupt`]; it is evicted first so the next read
    /// goes to the store.
    ///
    /// A loaded value is only cached if no invalidation ran while it was
    /// being loaded.
    pub async fn read_through<T, F, Fut>(&self, key: &str, load: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(raw) = self.cache.get(key).await? {
            return match serde_json::from_str(&raw) {
                Ok(value) => {
                    debug!(key, "cache hit");
                    Ok(value)
                }
                Err(source) => {
                    if let Err(err) = self.cache.delete(&[key.to_string()]).await {
                        warn!(key, error = %err, "failed to evict corrupt cache entry");
                    }
                    Err(CacheError::Corrupt {
                        key: key.to_string(),
                        source,
                    }
                    .into())
                }
            };
        }

        debug!(key, "cache miss");
        let observed = self.generation.load(Ordering::SeqCst);
        let value = load().await?;
        if self.generation.load(Ordering::SeqCst) != observed {
            debug!(key, "invalidated during load, not caching");
            return Ok(value);
        }
        self.refresh(key, &value).await?;

        // Invalidated between the check and the write
        if self.generation.load(Ordering::SeqCst) != observed {
            self.invalidate(&[key.to_string()]).await?;
        }
        Ok(value)
    }

    // == Refresh ==
    /// Writes `value` under `key` with a fresh TTL.
    pub async fn refresh<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let written = match serde_json::to_string(value) {
            Ok(raw) => self.cache.set(key, raw, self.ttl).await,
            Err(source) => Err(CacheError::Encode {
                key: key.to_string(),
                source,
            }),
        };
        self.settle(written)
    }

    // == Invalidate ==
    /// Drops every key in `keys`.
    pub async fn invalidate(&self, keys: &[String]) -> Result<()> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let removed = self.cache.delete(keys).await.map(|removed| {
            debug!(?keys, removed, "invalidated cache keys");
        });
        self.settle(removed)
    }

    fn settle(&self, outcome: std::result::Result<(), CacheError>) -> Result<()> {
        match (outcome, self.write_policy) {
            (Ok(()), _) => Ok(()),
            (Err(err), CacheWritePolicy::Strict) => Err(err.into()),
            (Err(err), CacheWritePolicy::BestEffort) => {
                warn!(error = %err, "cache maintenance failed; store write stands");
                Ok(())
            }
        }
    }
}
