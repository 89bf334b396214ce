//! # Least Recently Used (LRU) eviction engine
//!
//! The baseline recency policy and the building block the composite engines
//! (LRU-K, ARC) are assembled from.
//!
//! ## Architecture
//!
//! ```text
//!   ┌────────────────────────────────────────────────────────────────────┐
//!   │                         LruCore<K, V>                              │
//!   │                                                                    │
//!   │   ┌──────────────────────────────────────────────────────────┐     │
//!   │   │  index: FxHashMap<K, NodeId>                             │     │
//!   │   │                                                          │     │
//!   │   │  ┌─────────┬─────────┐                                   │     │
//!   │   │  │   Key   │ NodeId  │──┐                                │     │
//!   │   │  └─────────┴─────────┘  │                                │     │
//!   │   └─────────────────────────┼────────────────────────────────┘     │
//!   │                             ▼                                      │
//!   │   ┌──────────────────────────────────────────────────────────┐     │
//!   │   │  list: RecencyList<Entry { key, value }>                 │     │
//!   │   │                                                          │     │
//!   │   │  head ──► [C] ◄──► [B] ◄──► [A] ◄── tail                 │     │
//!   │   │           MRU                LRU                         │     │
//!   │   └──────────────────────────────────────────────────────────┘     │
//!   └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Method       | Complexity | Description                                |
//! |--------------|------------|--------------------------------------------|
//! | `put`        | O(1)       | insert/overwrite, evicting the LRU entry   |
//! | `get`        | O(1)       | clone value, promote to MRU                |
//! | `peek`       | O(1)       | read without touching the recency order    |
//! | `touch`      | O(1)       | promote without reading                    |
//! | `take`       | O(1)       | remove by key, returning the value         |
//! | `pop_lru`    | O(1)       | remove the eviction victim                 |
//! | `peek_lru`   | O(1)       | inspect the eviction victim                |
//!
//! Eviction is strictly least-recently-used first; the list order *is* the
//! tie-break.
//!
//! ## Thread Safety
//!
//! `LruCore` is single-threaded. Wrap it in
//! [`ConcurrentCache`](crate::concurrent::ConcurrentCache) or shard it with
//! [`ShardedCache`](crate::sharded::ShardedCache) for concurrent use.

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

/// Recency-ordered cache core: hash index + slab-backed doubly linked list.
///
/// # Example
///
/// ```
/// use hotset::policy::lru::LruCore;
/// use hotset::traits::PolicyCache;
///
/// let mut cache = LruCore::new(2);
/// cache.put("a", 1);
/// cache.put("b", 2);
///
/// // Touch "a" so "b" becomes the eviction victim
/// assert_eq!(cache.get(&"a"), Some(1));
/// cache.put("c", 3);
///
/// assert!(cache.contains(&"a"));
/// assert!(!cache.contains(&"b"));
/// assert!(cache.contains(&"c"));
/// ```
#[derive(Debug)]
pub struct LruCore<K, V> {
    list: RecencyList<Entry<K, V>>,
    index: FxHashMap<K, NodeId>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: EngineMetrics,
}

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU core, validating `capacity >= 1`.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("lru capacity must be >= 1"));
        }
        Ok(Self {
            list: RecencyList::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: EngineMetrics::default(),
        })
    }

    /// Creates an LRU core with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0; use [`try_new`](Self::try_new) to handle
    /// invalid configuration without panicking.
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    /// Inserts or overwrites `key`, promoting it to the MRU end. Evicts the
    /// LRU entry when inserting into a full cache.
    pub fn put(&mut self, key: K, value: V) {
        if let Some(&id) = self.index.get(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_put_update();

            if let Some(entry) = self.list.get_mut(id) {
                entry.value = value;
            }
            self.list.move_to_mru(id);
            return;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_put_insert();

        if self.index.len() >= self.capacity {
            self.evict_lru();
        }

        let id = self.list.push_mru(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);
    }

    /// Returns a copy of the value and promotes the entry to the MRU end.
    pub fn get(&mut self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let Some(&id) = self.index.get(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.list.move_to_mru(id);
        self.list.get(id).map(|entry| entry.value.clone())
    }

    /// Reads a value without touching the recency order.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let &id = self.index.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Promotes `key` to the MRU end without reading the value; returns
    /// `true` if the key was resident.
    pub fn touch(&mut self, key: &K) -> bool {
        match self.index.get(key) {
            Some(&id) => self.list.move_to_mru(id),
            None => false,
        }
    }

    /// Removes `key` and returns its value, if resident.
    pub fn take(&mut self, key: &K) -> Option<V> {
        let id = self.index.remove(key)?;
        #[cfg(feature = "metrics")]
        self.metrics.record_removal();
        self.list.remove(id).map(|entry| entry.value)
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let entry = self.list.pop_lru()?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    /// Inspects the least recently used entry without removing it.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.peek_lru().map(|entry| (&entry.key, &entry.value))
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

    /// Deletes every entry.
    pub fn remove_all(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
        self.list.clear();
        self.index.clear();
    }

    fn evict_lru(&mut self) {
        if let Some(entry) = self.list.pop_lru() {
            self.index.remove(&entry.key);
            #[cfg(feature = "metrics")]
            self.metrics.record_eviction();
        }
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
        self.list.debug_validate();
        assert_eq!(self.list.len(), self.index.len());
        assert!(self.index.len() <= self.capacity);
        for (key, &id) in &self.index {
            let entry = self.list.get(id).expect("index points at dead node");
            assert!(&entry.key == key, "index points at wrong entry");
        }
    }
}

impl<K, V> PolicyCache<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&mut self, key: K, value: V) {
        LruCore::put(self, key, value);
    }

    fn get(&mut self, key: &K) -> Option<V> {
        LruCore::get(self, key)
    }

    fn remove(&mut self, key: &K) {
        let _ = self.take(key);
    }

    fn remove_all(&mut self) {
        LruCore::remove_all(self);
    }

    fn contains(&self, key: &K) -> bool {
        LruCore::contains(self, key)
    }

    fn len(&self) -> usize {
        LruCore::len(self)
    }

    fn capacity(&self) -> usize {
        LruCore::capacity(self)
    }
}
