//! Lock-striped sharded cache wrapper.
//!
//! Partitions any policy engine across N independent shards, each holding its
//! own engine instance behind its own mutex. Every key is owned by exactly
//! one shard (chosen by hash), so operations on keys in different shards
//! proceed in parallel and never contend.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                      ShardedCache<C>                             │
//!   │                                                                  │
//!   │   selector: hash(key) mod N                                      │
//!   │                                                                  │
//!   │   shards: Box<[Shard]>          (fixed storage, never relocated) │
//!   │   ┌──────────────┬──────────────┬──────────────┬──────────────┐  │
//!   │   │ Mutex<C>     │ Mutex<C>     │ Mutex<C>     │ Mutex<C>     │  │
//!   │   │ engine 0     │ engine 1     │ engine 2     │ engine 3     │  │
//!   │   └──────────────┴──────────────┴──────────────┴──────────────┘  │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Capacity split
//!
//! A requested total capacity T over N shards gives every shard ⌊T/N⌋ slots,
//! with the last shard absorbing the remainder. The split is deterministic so
//! identical configurations behave identically.
//!
//! ## Ordering
//!
//! Per shard, operations are linearizable in lock order. Across shards there
//! is no global order: `remove_all` and `len` visit shards one lock at a
//! time and are not point-in-time snapshots.

use std::hash::Hash;

use parking_lot::Mutex;

use crate::ds::shard::ShardSelector;
use crate::error::ConfigError;
use crate::policy::arc::ArcCore;
use crate::policy::lfu::LfuCore;
use crate::policy::lfu_aging::LfuAgingCore;
use crate::policy::lru::LruCore;
use crate::policy::lru_k::LruKCore;
use crate::traits::PolicyCache;

/// A sharded LRU cache.
pub type ShardedLruCache<K, V> = ShardedCache<LruCore<K, V>>;
/// A sharded LFU cache.
pub type ShardedLfuCache<K, V> = ShardedCache<LfuCore<K, V>>;
/// A sharded LFU-Aging cache.
pub type ShardedLfuAgingCache<K, V> = ShardedCache<LfuAgingCore<K, V>>;
/// A sharded LRU-K cache.
pub type ShardedLruKCache<K, V> = ShardedCache<LruKCore<K, V>>;
/// A sharded ARC cache.
pub type ShardedArcCache<K, V> = ShardedCache<ArcCore<K, V>>;

#[derive(Debug)]
struct Shard<C> {
    engine: Mutex<C>,
}

/// N independent engines, each behind its own mutex, keys routed by hash.
///
/// # Example
///
/// ```
/// use hotset::sharded::ShardedCache;
/// use hotset::policy::lru::LruCore;
///
/// // 64 total slots striped over 4 LRU shards of 16.
/// let cache = ShardedCache::try_new(64, 4, |cap| LruCore::new(cap)).unwrap();
/// cache.put(1u64, "one".to_string());
/// assert_eq!(cache.get(&1), Some("one".to_string()));
/// assert_eq!(cache.shard_count(), 4);
/// ```
#[derive(Debug)]
pub struct ShardedCache<C> {
    shards: Box<[Shard<C>]>,
    selector: ShardSelector,
}

impl<C> ShardedCache<C> {
    /// Builds a sharded cache from an engine factory.
    ///
    /// The factory is called once per shard with that shard's capacity share:
    /// ⌊T/N⌋ slots each, remainder to the last shard. Validates
    /// `shard_count >= 1` and `total_capacity >= shard_count` (every shard
    /// must get at least one slot).
    pub fn try_new<F>(
        total_capacity: usize,
        shard_count: usize,
        mut make_engine: F,
    ) -> Result<Self, ConfigError>
    where
        F: FnMut(usize) -> C,
    {
        if shard_count == 0 {
            return Err(ConfigError::new("shard count must be >= 1"));
        }
        if total_capacity < shard_count {
            return Err(ConfigError::new(
                "total capacity must be >= shard count (every shard needs a slot)",
            ));
        }

        let base = total_capacity / shard_count;
        let remainder = total_capacity % shard_count;
        let shards: Vec<Shard<C>> = (0..shard_count)
            .map(|i| {
                let cap = if i + 1 == shard_count { base + remainder } else { base };
                Shard {
                    engine: Mutex::new(make_engine(cap)),
                }
            })
            .collect();

        Ok(Self {
            shards: shards.into_boxed_slice(),
            selector: ShardSelector::new(shard_count, 0),
        })
    }

    /// Returns the number of shards.
    #[inline]
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Returns the shard index that owns `key`.
    #[inline]
    pub fn shard_index_of<K: Hash>(&self, key: &K) -> usize {
        self.selector.shard_for_key(key)
    }

    #[inline]
    fn shard_for<K: Hash>(&self, key: &K) -> &Shard<C> {
        &self.shards[self.selector.shard_for_key(key)]
    }

    /// Inserts or overwrites a key-value pair in the owning shard.
    pub fn put<K, V>(&self, key: K, value: V)
    where
        K: Hash,
        C: PolicyCache<K, V>,
    {
        self.shard_for(&key).engine.lock().put(key, value);
    }

    /// Returns a copy of the value if resident in the owning shard.
    pub fn get<K, V>(&self, key: &K) -> Option<V>
    where
        K: Hash,
        C: PolicyCache<K, V>,
    {
        self.shard_for(key).engine.lock().get(key)
    }

    /// Copies the value into `out` and returns `true` if resident; leaves
    /// `out` unmodified on a miss.
    pub fn get_into<K, V>(&self, key: &K, out: &mut V) -> bool
    where
        K: Hash,
        C: PolicyCache<K, V>,
    {
        self.shard_for(key).engine.lock().get_into(key, out)
    }

    /// Returns a copy of the value if resident, otherwise `V::default()`.
    pub fn get_or_default<K, V>(&self, key: &K) -> V
    where
        K: Hash,
        C: PolicyCache<K, V>,
        V: Default,
    {
        self.shard_for(key).engine.lock().get_or_default(key)
    }

    /// Deletes the entry from the owning shard; no-op when absent.
    pub fn remove<K, V>(&self, key: &K)
    where
        K: Hash,
        C: PolicyCache<K, V>,
    {
        self.shard_for(key).engine.lock().remove(key);
    }

    /// Clears every shard, taking one shard lock at a time. Not a global
    /// snapshot: concurrent writers may repopulate earlier shards before
    /// later ones are cleared.
    pub fn remove_all<K, V>(&self)
    where
        C: PolicyCache<K, V>,
    {
        for shard in self.shards.iter() {
            shard.engine.lock().remove_all();
        }
    }

    /// Returns `true` if the key is resident in its owning shard.
    pub fn contains<K, V>(&self, key: &K) -> bool
    where
        K: Hash,
        C: PolicyCache<K, V>,
    {
        self.shard_for(key).engine.lock().contains(key)
    }

    /// Sums resident entries across shards, one lock at a time.
    pub fn len<K, V>(&self) -> usize
    where
        C: PolicyCache<K, V>,
    {
        self.shards
            .iter()
            .map(|shard| shard.engine.lock().len())
            .sum()
    }

    /// Returns `true` if every shard is empty.
    pub fn is_empty<K, V>(&self) -> bool
    where
        C: PolicyCache<K, V>,
    {
        self.shards
            .iter()
            .all(|shard| shard.engine.lock().is_empty())
    }

    /// Sums shard capacities; equals the requested total capacity.
    pub fn capacity<K, V>(&self) -> usize
    where
        C: PolicyCache<K, V>,
    {
        self.shards
            .iter()
            .map(|shard| shard.engine.lock().capacity())
            .sum()
    }

    /// Runs `f` with one shard's engine locked, for tests and diagnostics.
    pub fn with_shard<R>(&self, index: usize, f: impl FnOnce(&mut C) -> R) -> R {
        f(&mut self.shards[index].engine.lock())
    }
}

impl<K, V> ShardedCache<LfuAgingCore<K, V>>
where
    K: Eq + Hash + Clone,
{
    /// Sharded LFU-Aging with a shared aging limit, total capacity split
    /// across shards.
    pub fn try_lfu_aging(
        total_capacity: usize,
        shard_count: usize,
        limit: f64,
    ) -> Result<Self, ConfigError> {
        // Validate the limit once up front so the factory cannot panic.
        LfuAgingCore::<K, V>::try_with_limit(1, limit)?;
        Self::try_new(total_capacity, shard_count, |cap| {
            match LfuAgingCore::try_with_limit(cap, limit) {
                Ok(engine) => engine,
                Err(err) => panic!("{err}"),
            }
        })
    }
}

impl<K, V> ShardedCache<LruKCore<K, V>>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Sharded LRU-K: the total main capacity is split across shards, and
    /// every shard gets its own history of `history_capacity` slots.
    pub fn try_lru_k(
        total_main_capacity: usize,
        shard_count: usize,
        k: u64,
        history_capacity: usize,
    ) -> Result<Self, ConfigError> {
        LruKCore::<K, V>::try_new(k, history_capacity, 1)?;
        Self::try_new(total_main_capacity, shard_count, |cap| {
            match LruKCore::try_new(k, history_capacity, cap) {
                Ok(engine) => engine,
                Err(err) => panic!("{err}"),
            }
        })
    }
}
