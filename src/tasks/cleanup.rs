//! TTL Cleanup Task
//!
//! Background sweep that drops expired cache entries so memory held by
//! keys nobody reads again is released before they are next looked up.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns the sweeper. Abort the returned handle on shutdown.
///
/// ```ignore
/// let cache = MemoryCache::new(1000);
/// let cleanup_handle = spawn_cleanup_task(cache.store(), 30);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(
    cache: Arc<RwLock<CacheStore>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let period = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            interval_secs = period.as_secs(),
            "starting cache TTL cleanup task"
        );

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = cache.write().await.cleanup_expired();
            if removed > 0 {
                info!(removed, "cache TTL cleanup removed expired entries");
            } else {
                debug!("cache TTL cleanup found nothing to remove");
            }
        }
    })
}
