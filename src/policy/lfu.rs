//! # Least Frequently Used (LFU) eviction engine
//!
//! O(1) LFU: entries are grouped into per-frequency recency lists, with a
//! tracked `min_freq` pointing at the lowest non-empty bucket so the next
//! eviction victim is always one hash lookup away.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          LfuCore<K, V>                               │
//!   │                                                                      │
//!   │   index: FxHashMap<K, EntryPos { freq, node }>                       │
//!   │                                                                      │
//!   │   buckets: FxHashMap<u64, RecencyList<Entry>>        min_freq = 1    │
//!   │                                                                      │
//!   │   freq 1:  head ──► [e] ◄──► [d] ◄── tail   ← next eviction victim   │
//!   │   freq 2:  head ──► [c] ◄── tail                                     │
//!   │   freq 5:  head ──► [a] ◄──► [b] ◄── tail                            │
//!   │                                                                      │
//!   │   touch(d): freq 1 list drops [d], freq 2 list gains [d] at MRU      │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## `min_freq` disciplines
//!
//! - **Touch** moves one entry from bucket `f` to bucket `f + 1`. If `f` was
//!   the minimum and its bucket emptied, the touched entry was the sole
//!   occupant and now sits one bucket higher, so `min_freq` becomes `f + 1`
//!   without a scan.
//! - **Explicit removal** (and `pop_lfu`) can make the true minimum jump by
//!   more than one, so the bucket map is rescanned.
//! - **Insertion** always lands in bucket 1, so `min_freq` resets to 1.
//!
//! ## Tie-breaking
//!
//! Within the lowest-frequency bucket the LRU end wins eviction: the oldest
//! access among the least-used cohort.
//!
//! ## Thread Safety
//!
//! Single-threaded; wrap in
//! [`ConcurrentCache`](crate::concurrent::ConcurrentCache) or
//! [`ShardedCache`](crate::sharded::ShardedCache).

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::recency_list::{NodeId, RecencyList};
use crate::error::ConfigError;
#[cfg(feature = "metrics")]
use crate::metrics::{EngineMetrics, MetricsSnapshot};
use crate::traits::PolicyCache;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

#[derive(Debug, Clone, Copy)]
struct EntryPos {
    freq: u64,
    node: NodeId,
}

/// Frequency-bucketed cache core with O(1) promote and evict.
///
/// # Example
///
/// ```
/// use hotset::policy::lfu::LfuCore;
/// use hotset::traits::PolicyCache;
///
/// let mut cache = LfuCore::new(2);
/// cache.put("a", 1);
/// cache.put("b", 2);
/// cache.get(&"a");
/// cache.get(&"a");
///
/// // "b" has the lowest frequency, so it is the victim
/// cache.put("c", 3);
/// assert!(cache.contains(&"a"));
/// assert!(!cache.contains(&"b"));
/// assert!(cache.contains(&"c"));
/// ```
#[derive(Debug)]
pub struct LfuCore<K, V> {
    buckets: FxHashMap<u64, RecencyList<Entry<K, V>>>,
    index: FxHashMap<K, EntryPos>,
    min_freq: u64,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: EngineMetrics,
}

impl<K, V> LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LFU core, validating `capacity >= 1`.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("lfu capacity must be >= 1"));
        }
        Ok(Self {
            buckets: FxHashMap::default(),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            min_freq: 0,
            capacity,
            #[cfg(feature = "metrics")]
            metrics: EngineMetrics::default(),
        })
    }

    /// Creates an LFU core with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0; use [`try_new`](Self::try_new) for a
    /// non-panicking constructor.
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    /// Inserts or overwrites `key`. A hit counts as an access (frequency + 1);
    /// a miss at capacity evicts the LRU entry of the `min_freq` bucket.
    pub fn put(&mut self, key: K, value: V) {
        if let Some(pos) = self.index.get(&key).copied() {
            #[cfg(feature = "metrics")]
            self.metrics.record_put_update();

            if let Some(bucket) = self.buckets.get_mut(&pos.freq) {
                if let Some(entry) = bucket.get_mut(pos.node) {
                    entry.value = value;
                }
            }
            self.touch_key(&key);
            return;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_put_insert();

        if self.index.len() >= self.capacity {
            self.evict_one();
        }

        let node = self
            .buckets
            .entry(1)
            .or_default()
            .push_mru(Entry {
                key: key.clone(),
                value,
            });
        self.index.insert(key, EntryPos { freq: 1, node });
        self.min_freq = 1;
    }

    /// Returns a copy of the value and increments the entry's frequency.
    pub fn get(&mut self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let Some(pos) = self.index.get(key).copied() else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        let value = self
            .buckets
            .get(&pos.freq)
            .and_then(|bucket| bucket.get(pos.node))
            .map(|entry| entry.value.clone());
        self.touch_key(key);
        value
    }

    /// Removes `key` and returns its value, if resident. Rescans `min_freq`
    /// when the minimum bucket empties: removal can make the true minimum
    /// jump by more than one.
    pub fn take(&mut self, key: &K) -> Option<V> {
        let pos = self.index.remove(key)?;
        #[cfg(feature = "metrics")]
        self.metrics.record_removal();

        let bucket = self.buckets.get_mut(&pos.freq)?;
        let entry = bucket.remove(pos.node)?;
        if bucket.is_empty() {
            self.buckets.remove(&pos.freq);
            if pos.freq == self.min_freq {
                self.min_freq = self.rescan_min_freq();
            }
        }
        Some(entry.value)
    }

    /// Removes and returns the eviction victim: the LRU entry of the lowest
    /// non-empty frequency bucket.
    pub fn pop_lfu(&mut self) -> Option<(K, V)> {
        let freq = self.min_freq;
        let bucket = self.buckets.get_mut(&freq)?;
        let entry = bucket.pop_lru()?;
        let emptied = bucket.is_empty();
        if emptied {
            self.buckets.remove(&freq);
        }
        self.index.remove(&entry.key);
        if emptied {
            self.min_freq = self.rescan_min_freq();
        }
        Some((entry.key, entry.value))
    }

    /// Returns the access frequency recorded for `key`.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.index.get(key).map(|pos| pos.freq)
    }

    /// Returns the lowest non-empty bucket frequency, or 0 when empty.
    #[inline]
    pub fn min_freq(&self) -> u64 {
        self.min_freq
    }

    /// Returns `true` if `key` is resident.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the number of resident entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the cache holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the fixed capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Deletes every entry and resets `min_freq`.
    pub fn remove_all(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
        self.buckets.clear();
        self.index.clear();
        self.min_freq = 0;
    }

    /// Moves `key` from bucket `f` to the MRU end of bucket `f + 1`.
    fn touch_key(&mut self, key: &K) {
        let Some(pos) = self.index.get(key).copied() else {
            return;
        };
        let new_freq = pos.freq + 1;

        let (entry, emptied) = {
            let bucket = self
                .buckets
                .get_mut(&pos.freq)
                .expect("lfu bucket missing for indexed entry");
            let entry = bucket
                .remove(pos.node)
                .expect("lfu node missing for indexed entry");
            (entry, bucket.is_empty())
        };

        if emptied {
            self.buckets.remove(&pos.freq);
            if pos.freq == self.min_freq {
                // The touched entry was the sole occupant of the minimum
                // bucket and lands exactly one bucket higher.
                self.min_freq = new_freq;
            }
        }

        let node = self.buckets.entry(new_freq).or_default().push_mru(entry);
        if let Some(pos) = self.index.get_mut(key) {
            *pos = EntryPos {
                freq: new_freq,
                node,
            };
        }
    }

    /// Eviction on the insert path. `min_freq` is left stale on purpose: the
    /// caller installs a fresh freq-1 entry immediately after.
    fn evict_one(&mut self) {
        let freq = self.min_freq;
        let Some(bucket) = self.buckets.get_mut(&freq) else {
            return;
        };
        let Some(entry) = bucket.pop_lru() else {
            return;
        };
        if bucket.is_empty() {
            self.buckets.remove(&freq);
        }
        self.index.remove(&entry.key);
        #[cfg(feature = "metrics")]
        self.metrics.record_eviction();
    }

    fn rescan_min_freq(&self) -> u64 {
        self.buckets.keys().copied().min().unwrap_or(0)
    }

    #[cfg(feature = "metrics")]
    /// Returns a point-in-time copy of this engine's counters.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot(self.len(), self.capacity)
    }

    #[cfg(any(test, debug_assertions))]
    pub(crate) fn iter_keys(&self) -> impl Iterator<Item = &K> {
        self.index.keys()
    }

    #[cfg(any(test, debug_assertions))]
    pub(crate) fn debug_validate(&self) {
        let mut total = 0usize;
        for (freq, bucket) in &self.buckets {
            bucket.debug_validate();
            assert!(!bucket.is_empty(), "empty bucket left behind");
            assert!(*freq >= 1, "bucket frequency must be >= 1");
            total += bucket.len();
            for entry in bucket.iter() {
                let pos = self.index.get(&entry.key).expect("entry missing from index");
                assert_eq!(pos.freq, *freq, "index frequency disagrees with bucket");
            }
        }
        assert_eq!(total, self.index.len());
        assert!(self.index.len() <= self.capacity);
        if self.index.is_empty() {
            assert_eq!(self.min_freq, 0);
        } else {
            assert_eq!(self.min_freq, self.rescan_min_freq());
        }
    }
}

impl<K, V> PolicyCache<K, V> for LfuCore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&mut self, key: K, value: V) {
        LfuCore::put(self, key, value);
    }

    fn get(&mut self, key: &K) -> Option<V> {
        LfuCore::get(self, key)
    }

    fn remove(&mut self, key: &K) {
        let _ = self.take(key);
    }

    fn remove_all(&mut self) {
        LfuCore::remove_all(self);
    }

    fn contains(&self, key: &K) -> bool {
        LfuCore::contains(self, key)
    }

    fn len(&self) -> usize {
        LfuCore::len(self)
    }

    fn capacity(&self) -> usize {
        LfuCore::capacity(self)
    }
}
