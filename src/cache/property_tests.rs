//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store against a plain HashMap model.

use proptest::prelude::*;
use std::collections::HashMap;
use std::thread::sleep;
use std::time::Duration;

use crate::cache::{Cache, InMemoryCache};

// == Strategies ==
/// Generates cache keys from a small alphabet so operations overlap
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,2}".prop_map(|s| s)
}

/// Generates arbitrary keys, including empty and non-ASCII ones
fn any_key_strategy() -> impl Strategy<Value = String> {
    any::<String>()
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: u32 },
    SetLongTtl { key: String, value: u32 },
    Get { key: String },
    Delete { key: String },
    Clear,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), any::<u32>()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        2 => (key_strategy(), any::<u32>())
            .prop_map(|(key, value)| CacheOp::SetLongTtl { key, value }),
        4 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        2 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
        1 => Just(CacheOp::Clear),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Without expirations in play, the store behaves exactly like a HashMap:
    // last write wins, delete is idempotent, clear empties everything.
    #[test]
    fn prop_matches_hashmap_model(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let store = InMemoryCache::new();
        let mut model: HashMap<String, u32> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key.clone(), value);
                    model.insert(key, value);
                }
                CacheOp::SetLongTtl { key, value } => {
                    store.set_with_ttl(key.clone(), value, Duration::from_secs(3600));
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(store.get(&key), model.get(&key).copied());
                }
                CacheOp::Delete { key } => {
                    store.delete(&key);
                    model.remove(&key);
                }
                CacheOp::Clear => {
                    store.clear();
                    model.clear();
                }
            }
            prop_assert_eq!(store.len(), model.len(), "Physical size diverged from model");
        }
    }

    #[test]
    fn prop_roundtrip_any_key(key in any_key_strategy(), value in any::<u64>()) {
        let store = InMemoryCache::new();

        store.set(key.clone(), value);

        prop_assert_eq!(store.get(&key), Some(value));
    }

    #[test]
    fn prop_unset_keys_not_found(
        stored in prop::collection::hash_set(key_strategy(), 0..10),
        probe in key_strategy()
    ) {
        prop_assume!(!stored.contains(&probe));
        let store = InMemoryCache::new();
        for key in &stored {
            store.set(key.clone(), ());
        }

        prop_assert_eq!(store.get(&probe), None);
    }

    #[test]
    fn prop_delete_is_idempotent(key in key_strategy(), value in any::<u32>(), times in 1usize..4) {
        let store = InMemoryCache::new();
        store.set(key.clone(), value);

        for _ in 0..times {
            store.delete(&key);
        }

        prop_assert_eq!(store.get(&key), None);
        prop_assert!(store.is_empty());
    }

    #[test]
    fn prop_clear_removes_everything(
        entries in prop::collection::vec((key_strategy(), any::<u32>()), 0..30)
    ) {
        let store = InMemoryCache::new();
        for (key, value) in &entries {
            store.set(key.clone(), *value);
        }

        store.clear();

        prop_assert!(store.is_empty());
        for (key, _) in &entries {
            prop_assert_eq!(store.get(key), None);
        }
    }
}

// Separate proptest block with fewer cases for time-sensitive TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // An entry set with a TTL is readable before the TTL elapses and gone,
    // both logically and physically, after it.
    #[test]
    fn prop_ttl_expiration_behavior(key in key_strategy(), value in any::<u32>()) {
        let store = InMemoryCache::new();

        store.set(key.clone(), value.wrapping_add(1));
        store.set_with_ttl(key.clone(), value, Duration::from_millis(50));

        prop_assert_eq!(store.get(&key), Some(value), "Entry should exist before TTL expires");

        sleep(Duration::from_millis(80));

        prop_assert_eq!(store.get(&key), None, "Entry should not be found after TTL expires");
        prop_assert!(store.is_empty(), "Expired entry should be removed by the read");
    }
}
