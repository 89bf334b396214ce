//! # LRU-K admission filter
//!
//! A key must earn its cache slot: only after K observed references is it
//! installed into the main LRU cache. One-shot scans never reach the main
//! cache, so they cannot flush the working set.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                        LruKCore<K, V>                            │
//!   │                                                                  │
//!   │   main:    LruCore<K, V>     promoted entries (capacity M)       │
//!   │   history: LruCore<K, u64>   reference counts for keys not yet   │
//!   │                              promoted (capacity H, LRU-bounded)  │
//!   │   staging: FxHashMap<K, V>   most recently offered value per     │
//!   │                              history key, installed on promotion │
//!   └──────────────────────────────────────────────────────────────────┘
//!
//!   reference to non-main key (put, or get with a staged value):
//!     count ← history(key) + 1
//!     count ≥ K → install (key, value) in main; drop history + staging
//!     count < K → history(key) ← count; staging(key) ← value
//!
//!   get of a non-main key with no staged value (the classic first miss):
//!     bump the history count only; report a miss
//! ```
//!
//! The history cache is itself an LRU: when it overflows, the oldest
//! candidate's count is forgotten and its staged value dropped with it, so
//! staging never outgrows the history.
//!
//! ## Thread Safety
//!
//! Single-threaded composition of two [`LruCore`]s under the caller's lock;
//! wrap in [`ConcurrentCache`](crate::concurrent::ConcurrentCache) or
//! [`ShardedCache`](crate::sharded::ShardedCache).

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::error::ConfigError;
#[cfg(feature = "metrics")]
use crate::metrics::MetricsSnapshot;
use crate::policy::lru::LruCore;
use crate::traits::PolicyCache;

/// LRU cache gated by a K-reference admission filter.
///
/// # Example
///
/// ```
/// use hotset::policy::lru_k::LruKCore;
/// use hotset::traits::PolicyCache;
///
/// let mut cache = LruKCore::try_new(2, 8, 4).unwrap();
///
/// // First reference stages the value but does not admit it
/// cache.put("a", 1);
/// assert!(!cache.is_resident(&"a"));
///
/// // Second reference promotes it into the main cache
/// assert_eq!(cache.get(&"a"), Some(1));
/// assert!(cache.is_resident(&"a"));
/// ```
#[derive(Debug)]
pub struct LruKCore<K, V> {
    k: u64,
    main: LruCore<K, V>,
    history: LruCore<K, u64>,
    staging: FxHashMap<K, V>,
}

impl<K, V> LruKCore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an LRU-K core.
    ///
    /// - `k`: references required for admission (≥ 1)
    /// - `history_capacity`: bound on tracked not-yet-admitted keys (≥ 1)
    /// - `main_capacity`: bound on admitted entries (≥ 1)
    pub fn try_new(k: u64, history_capacity: usize, main_capacity: usize) -> Result<Self, ConfigError> {
        if k == 0 {
            return Err(ConfigError::new("lru-k admission threshold must be >= 1"));
        }
        Ok(Self {
            k,
            main: LruCore::try_new(main_capacity)
                .map_err(|_| ConfigError::new("lru-k main capacity must be >= 1"))?,
            history: LruCore::try_new(history_capacity)
                .map_err(|_| ConfigError::new("lru-k history capacity must be >= 1"))?,
            staging: FxHashMap::default(),
        })
    }

    /// Creates an LRU-K core.
    ///
    /// # Panics
    ///
    /// Panics if any parameter is 0; use [`try_new`](Self::try_new) for a
    /// non-panicking constructor.
    pub fn new(k: u64, history_capacity: usize, main_capacity: usize) -> Self {
        match Self::try_new(k, history_capacity, main_capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    /// Records a reference carrying a value. Main-resident keys are updated
    /// in place; others go through the admission filter.
    pub fn put(&mut self, key: K, value: V) {
        if self.main.contains(&key) {
            self.main.put(key, value);
            return;
        }
        self.observe(key, value);
    }

    /// Returns the value for a main-resident key, or drives the admission
    /// filter for a known candidate. A promotion triggered here installs the
    /// most recently offered (staged) value.
    pub fn get(&mut self, key: &K) -> Option<V> {
        if let Some(value) = self.main.get(key) {
            return Some(value);
        }
        if let Some(staged) = self.staging.get(key).cloned() {
            self.observe(key.clone(), staged);
            // Promotion may or may not have happened, depending on K.
            return self.main.get(key);
        }
        // First miss: no value to stage, count the reference only.
        let count = self.history.get(key).unwrap_or(0) + 1;
        self.record_count(key.clone(), count);
        None
    }

    /// Deletes `key` from the main cache, the history, and the staging map.
    pub fn remove(&mut self, key: &K) {
        let _ = self.main.take(key);
        let _ = self.history.take(key);
        self.staging.remove(key);
    }

    /// Clears the main cache, the history, and the staging map.
    pub fn remove_all(&mut self) {
        self.main.remove_all();
        self.history.remove_all();
        self.staging.clear();
    }

    /// Returns `true` if `key` has been admitted to the main cache.
    #[inline]
    pub fn is_resident(&self, key: &K) -> bool {
        self.main.contains(key)
    }

    /// Returns the admission threshold K.
    #[inline]
    pub fn k(&self) -> u64 {
        self.k
    }

    /// Returns the number of admitted entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.main.len()
    }

    /// Returns `true` if no entries have been admitted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.main.is_empty()
    }

    /// Returns the main-cache capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.main.capacity()
    }

    /// Returns the number of keys currently tracked by the history.
    #[inline]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// One observed reference with an offered value: promote at K, otherwise
    /// remember the count and stage the value.
    fn observe(&mut self, key: K, value: V) {
        let count = self.history.get(&key).unwrap_or(0) + 1;
        if count >= self.k {
            self.history.take(&key);
            self.staging.remove(&key);
            self.main.put(key, value);
        } else {
            self.record_count(key.clone(), count);
            self.staging.insert(key, value);
        }
    }

    /// Stores a reference count, dropping the staged value of whichever
    /// candidate the bounded history evicts to make room.
    fn record_count(&mut self, key: K, count: u64) {
        if !self.history.contains(&key) && self.history.len() == self.history.capacity() {
            if let Some((evicted, _)) = self.history.pop_lru() {
                self.staging.remove(&evicted);
            }
        }
        self.history.put(key, count);
    }

    #[cfg(feature = "metrics")]
    /// Counters of the main cache (admissions show up as inserts).
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.main.metrics_snapshot()
    }

    #[cfg(any(test, debug_assertions))]
    pub(crate) fn debug_validate(&self) {
        self.main.debug_validate();
        self.history.debug_validate();
        assert!(self.staging.len() <= self.history.len(), "staging outgrew history");
        for key in self.staging.keys() {
            assert!(!self.main.contains(key), "staged key is already resident");
            assert!(self.history.contains(key), "staged key missing from history");
        }
    }
}

impl<K, V> PolicyCache<K, V> for LruKCore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&mut self, key: K, value: V) {
        LruKCore::put(self, key, value);
    }

    fn get(&mut self, key: &K) -> Option<V> {
        LruKCore::get(self, key)
    }

    fn remove(&mut self, key: &K) {
        LruKCore::remove(self, key);
    }

    fn remove_all(&mut self) {
        LruKCore::remove_all(self);
    }

    fn contains(&self, key: &K) -> bool {
        self.is_resident(key)
    }

    fn len(&self) -> usize {
        LruKCore::len(self)
    }

    fn capacity(&self) -> usize {
        LruKCore::capacity(self)
    }
}
