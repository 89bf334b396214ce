// ==============================================
// CROSS-POLICY CONTRACT TESTS (integration)
// ==============================================
//
// Properties every engine must satisfy regardless of eviction policy:
// bounded occupancy, index/list agreement, put-then-get round trips,
// idempotent clears, and no-op double removes. Exercised through the
// policy-erased builder so each assertion runs against all five engines.

use hotset::builder::{CacheBuilder, EvictionPolicy};
use hotset::traits::PolicyCache;

fn policies() -> Vec<EvictionPolicy> {
    vec![
        EvictionPolicy::Lru,
        EvictionPolicy::Lfu,
        EvictionPolicy::LfuAging { limit: 10.0 },
        EvictionPolicy::LruK {
            k: 1,
            history_capacity: 32,
        },
        EvictionPolicy::Arc,
    ]
}

/// Tiny deterministic generator so the mixed-operation runs are repeatable.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

#[test]
fn occupancy_never_exceeds_capacity() {
    for policy in policies() {
        let mut cache = CacheBuilder::new(8).build::<u64, u64>(policy.clone());
        let mut rng = Lcg(42);
        for _ in 0..2000 {
            let key = rng.next() % 32;
            match rng.next() % 4 {
                0 => {
                    let _ = cache.get(&key);
                },
                1 => cache.remove(&key),
                _ => cache.put(key, key),
            }
            assert!(cache.len() <= cache.capacity(), "{policy:?} overshot");
        }
    }
}

#[test]
fn put_then_get_round_trips() {
    for policy in policies() {
        let mut cache = CacheBuilder::new(8).build::<u64, u64>(policy.clone());
        cache.put(7, 700);
        let mut out = 0;
        assert!(cache.get_into(&7, &mut out), "{policy:?}");
        assert_eq!(out, 700, "{policy:?}");
    }
}

#[test]
fn get_into_reports_residency_exactly() {
    for policy in policies() {
        let mut cache = CacheBuilder::new(4).build::<u64, u64>(policy.clone());
        let mut out = 99;

        // Never inserted → miss, out untouched.
        assert!(!cache.get_into(&1, &mut out), "{policy:?}");
        assert_eq!(out, 99, "{policy:?}");

        // Inserted → hit.
        cache.put(1, 10);
        assert!(cache.get_into(&1, &mut out), "{policy:?}");
        assert_eq!(out, 10, "{policy:?}");

        // Removed → miss again.
        cache.remove(&1);
        out = 99;
        assert!(!cache.get_into(&1, &mut out), "{policy:?}");
        assert_eq!(out, 99, "{policy:?}");
    }
}

#[test]
fn get_or_default_never_fails_on_miss() {
    for policy in policies() {
        let mut cache = CacheBuilder::new(4).build::<u64, String>(policy.clone());
        assert_eq!(cache.get_or_default(&5), String::new(), "{policy:?}");
        cache.put(5, "five".to_string());
        assert_eq!(cache.get_or_default(&5), "five", "{policy:?}");
    }
}

#[test]
fn remove_all_is_idempotent_and_reusable() {
    for policy in policies() {
        let mut cache = CacheBuilder::new(4).build::<u64, u64>(policy.clone());
        for key in 0..4u64 {
            cache.put(key, key);
        }

        cache.remove_all();
        for key in 0..8u64 {
            assert!(!cache.contains(&key), "{policy:?}");
        }
        cache.remove_all(); // second clear is harmless

        // The cache accepts fresh inserts immediately.
        cache.put(1, 11);
        assert_eq!(cache.get(&1), Some(11), "{policy:?}");
    }
}

#[test]
fn double_remove_equals_single_remove() {
    for policy in policies() {
        let mut cache = CacheBuilder::new(4).build::<u64, u64>(policy.clone());
        cache.put(1, 10);
        cache.put(2, 20);

        cache.remove(&1);
        cache.remove(&1);

        assert!(!cache.contains(&1), "{policy:?}");
        assert!(cache.contains(&2), "{policy:?}");
        assert_eq!(cache.len(), 1, "{policy:?}");
    }
}

#[test]
fn overwrite_keeps_one_slot_per_key() {
    for policy in policies() {
        let mut cache = CacheBuilder::new(4).build::<u64, u64>(policy.clone());
        for round in 0..10u64 {
            cache.put(1, round);
        }
        assert_eq!(cache.len(), 1, "{policy:?}");
        assert_eq!(cache.get(&1), Some(9), "{policy:?}");
    }
}

#[test]
fn churn_then_drain_leaves_consistent_state() {
    for policy in policies() {
        let mut cache = CacheBuilder::new(8).build::<u64, u64>(policy.clone());
        let mut rng = Lcg(7);
        for _ in 0..500 {
            cache.put(rng.next() % 16, 1);
        }
        for key in 0..16u64 {
            cache.remove(&key);
        }
        assert!(cache.is_empty(), "{policy:?}");
        assert_eq!(cache.len(), 0, "{policy:?}");
    }
}
