//! Cache Module
//!
//! Key-value cache with TTL expiration and LRU eviction, plus the key
//! convention the managers share.

mod backend;
mod entry;
pub mod keys;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

pub use backend::{Cache, MemoryCache};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 4 * 1024 * 1024; // 4 MB
