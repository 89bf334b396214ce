//! Deterministic key → shard routing.
//!
//! The sharded wrapper partitions its key space by hashing each key to one of
//! N shards; the mapping must be deterministic so a key always lands on the
//! shard that owns its state.
//!
//! ```text
//!   hash(seed, key) mod N
//!
//!   ┌─────────┬─────────┬─────────┬─────────┐
//!   │ shard 0 │ shard 1 │ shard 2 │ shard 3 │
//!   │  A, E   │  B, F   │  C, G   │  D, H   │
//!   └─────────┴─────────┴─────────┴─────────┘
//! ```
//!
//! A power-of-two shard count lets the modulo compile to a mask, but any
//! count ≥ 1 works.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Seeded, deterministic shard selector.
///
/// The same `(key, seed, shards)` tuple always yields the same shard index in
/// `[0, shards)`.
///
/// # Example
///
/// ```
/// use hotset::ds::ShardSelector;
///
/// let selector = ShardSelector::new(4, 0);
/// let shard = selector.shard_for_key(&"user:alice");
/// assert!(shard < 4);
/// assert_eq!(selector.shard_for_key(&"user:alice"), shard);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardSelector {
    shards: usize,
    seed: u64,
}

impl ShardSelector {
    /// Creates a selector for `shards` shards (clamped to at least 1).
    pub fn new(shards: usize, seed: u64) -> Self {
        Self {
            shards: shards.max(1),
            seed,
        }
    }

    /// Returns the number of shards.
    #[inline]
    pub fn shard_count(&self) -> usize {
        self.shards
    }

    /// Maps a key to a shard index in `[0, shards)`.
    pub fn shard_for_key<K: Hash>(&self, key: &K) -> usize {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.shards
    }
}

impl Default for ShardSelector {
    /// Single-shard selector with seed 0.
    fn default() -> Self {
        Self::new(1, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_same_key() {
        let selector = ShardSelector::new(8, 123);
        let a = selector.shard_for_key(&"key");
        assert_eq!(selector.shard_for_key(&"key"), a);
        assert!(a < selector.shard_count());
    }

    #[test]
    fn zero_shards_clamped_to_one() {
        let selector = ShardSelector::new(0, 0);
        assert_eq!(selector.shard_count(), 1);
        assert_eq!(selector.shard_for_key(&42u64), 0);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Same key always returns the same shard.
        #[test]
        fn prop_deterministic_mapping(
            shard_count in 1usize..64,
            seed in any::<u64>(),
            key in any::<u32>()
        ) {
            let selector = ShardSelector::new(shard_count, seed);
            let first = selector.shard_for_key(&key);
            prop_assert_eq!(selector.shard_for_key(&key), first);
        }

        /// Shard index stays in range for every key.
        #[test]
        fn prop_shard_in_range(
            shard_count in 1usize..128,
            seed in any::<u64>(),
            keys in prop::collection::vec(any::<u64>(), 0..100)
        ) {
            let selector = ShardSelector::new(shard_count, seed);
            for key in keys {
                prop_assert!(selector.shard_for_key(&key) < shard_count);
            }
        }

        /// With enough distinct keys, more than one shard gets used.
        #[test]
        fn prop_keys_spread_across_shards(
            shard_count in 2usize..16,
            seed in any::<u64>(),
        ) {
            let selector = ShardSelector::new(shard_count, seed);
            let mut used = std::collections::HashSet::new();
            for key in 0u64..(shard_count as u64 * 16) {
                used.insert(selector.shard_for_key(&key));
            }
            prop_assert!(used.len() > 1);
        }

        /// A single shard absorbs every key.
        #[test]
        fn prop_single_shard_returns_zero(
            seed in any::<u64>(),
            keys in prop::collection::vec(any::<u32>(), 0..50)
        ) {
            let selector = ShardSelector::new(1, seed);
            for key in keys {
                prop_assert_eq!(selector.shard_for_key(&key), 0);
            }
        }
    }
}
