//! Property-Based Tests for the cache engine.

use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use crate::cache::CacheStore;

const TTL: Duration = Duration::from_secs(600);

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
}

/// Keys shaped like the ones the managers write.
fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("classes".to_string()),
        Just("students".to_string()),
        (1..20u64).prop_map(|id| format!("class:{id}")),
        (1..20u64).prop_map(|id| format!("student:{id}")),
    ]
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), "[a-z0-9{}:\"]{0,32}")
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // With room for every key, the store behaves like a plain map and its
    // counters match the operations applied.
    #[test]
    fn prop_store_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut store = CacheStore::new(1000);
        let mut model: HashMap<String, String> = HashMap::new();
        let (mut hits, mut misses, mut writes) = (0u64, 0u64, 0u64);

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key.clone(), value.clone(), TTL).unwrap();
                    model.insert(key, value);
                    writes += 1;
                }
                CacheOp::Get { key } => {
                    let got = store.get(&key);
                    prop_assert_eq!(got.as_ref(), model.get(&key));
                    if got.is_some() { hits += 1 } else { misses += 1 }
                }
                CacheOp::Delete { key } => {
                    prop_assert_eq!(store.delete(&key), model.remove(&key).is_some());
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, hits);
        prop_assert_eq!(stats.misses, misses);
        prop_assert_eq!(stats.writes, writes);
        prop_assert_eq!(stats.entries, model.len());
    }

    // The entry count never exceeds the configured bound.
    #[test]
    fn prop_capacity_bound(
        max_entries in 1..8usize,
        ops in prop::collection::vec(cache_op_strategy(), 1..60),
    ) {
        let mut store = CacheStore::new(max_entries);

        for op in ops {
            match op {
                CacheOp::Set { key, value } => store.set(key, value, TTL).unwrap(),
                CacheOp::Get { key } => { store.get(&key); }
                CacheOp::Delete { key } => { store.delete(&key); }
            }
            prop_assert!(store.len() <= max_entries);
        }
    }
}
