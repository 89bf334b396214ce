//! # LFU with periodic frequency decay (LFU-Aging)
//!
//! Pure LFU has a pathology: an entry that was popular once accumulates an
//! unbounded frequency and stays pinned long after the workload moved on.
//! LFU-Aging keeps the bucketed LFU structure but tracks the aggregate
//! frequency sum; whenever the resident *average* frequency exceeds a
//! configured `limit`, every frequency decays by `⌊limit / 2⌋` (floored at
//! 1) and the buckets are rebuilt. Relative order survives the decay down to
//! the floor, so newly popular entries can overtake stale winners.
//!
//! ```text
//!   limit = 10, delta = 5
//!
//!   before aging          after aging
//!   ────────────          ───────────
//!   a: freq 27        →   a: freq 22
//!   b: freq 12        →   b: freq  7
//!   c: freq  3        →   c: freq  1   (floored)
//!   d: freq  1        →   d: freq  1   (floored)
//! ```
//!
//! The aggregate `total_freq_sum == Σ entry.freq` is maintained exactly
//! across every mutation; aging never changes the resident set.
//!
//! There is no "disable aging" switch: pass a huge `limit` if decay is
//! unwanted.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::recency_list::{NodeId, RecencyList};
use crate::error::ConfigError;
#[cfg(feature = "metrics")]
use crate::metrics::{EngineMetrics, MetricsSnapshot};
use crate::traits::PolicyCache;

/// Default average-frequency threshold that triggers a decay pass.
pub const DEFAULT_AGING_LIMIT: f64 = 10.0;

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

/// Frequency-bucketed cache with average-triggered frequency decay.
///
/// # Example
///
/// ```
/// use hotset::policy::lfu_aging::LfuAgingCore;
/// use hotset::traits::PolicyCache;
///
/// let mut cache = LfuAgingCore::try_with_limit(3, 2.0).unwrap();
/// cache.put("a", 1);
/// cache.put("b", 2);
/// cache.put("c", 3);
/// for _ in 0..4 {
///     cache.get(&"a");
/// }
///
/// // Aging fired along the way; the aggregate stays exact and the decay
/// // itself evicted nothing.
/// assert_eq!(cache.len(), 3);
/// assert!(cache.frequency(&"a").unwrap() >= 1);
/// ```
#[derive(Debug)]
pub struct LfuAgingCore<K, V> {
    buckets: FxHashMap<u64, RecencyList<Entry<K, V>>>,
    index: FxHashMap<K, EntryPos>,
    min_freq: u64,
    total_freq_sum: u64,
    limit: f64,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: EngineMetrics,
}

impl<K, V> LfuAgingCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an aging LFU core with the default limit of 10.0.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Self::try_with_limit(capacity, DEFAULT_AGING_LIMIT)
    }

    /// Creates an aging LFU core with an explicit average-frequency `limit`.
    ///
    /// `limit` must be positive and finite; the decay amount is
    /// `⌊limit / 2⌋`.
    pub fn try_with_limit(capacity: usize, limit: f64) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("lfu-aging capacity must be >= 1"));
        }
        if !limit.is_finite() || limit <= 0.0 {
            return Err(ConfigError::new(
                "lfu-aging limit must be a positive finite number",
            ));
        }
        Ok(Self {
            buckets: FxHashMap::default(),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            min_freq: 0,
            total_freq_sum: 0,
            limit,
            capacity,
            #[cfg(feature = "metrics")]
            metrics: EngineMetrics::default(),
        })
    }

    /// Creates an aging LFU core with the default limit.
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

    /// Inserts or overwrites `key`. New entries start at frequency 1 and may
    /// trigger an aging pass; hits count as accesses.
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

        let node = self.buckets.entry(1).or_default().push_mru(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, EntryPos { freq: 1, node });
        self.total_freq_sum += 1;
        self.min_freq = 1;
        self.maybe_age();
    }

    /// Returns a copy of the value; the access increments the frequency and
    /// may trigger an aging pass.
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

    /// Removes `key` and returns its value, keeping the aggregate exact.
    pub fn take(&mut self, key: &K) -> Option<V> {
        let pos = self.index.remove(key)?;
        #[cfg(feature = "metrics")]
        self.metrics.record_removal();

        let bucket = self.buckets.get_mut(&pos.freq)?;
        let entry = bucket.remove(pos.node)?;
        if bucket.is_empty() {
            self.buckets.remove(&pos.freq);
        }
        self.total_freq_sum -= pos.freq;
        self.min_freq = self.rescan_min_freq();
        Some(entry.value)
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

    /// Returns the exact sum of all resident frequencies.
    #[inline]
    pub fn total_freq_sum(&self) -> u64 {
        self.total_freq_sum
    }

    /// Returns the configured average-frequency limit.
    #[inline]
    pub fn limit(&self) -> f64 {
        self.limit
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

    /// Deletes every entry and zeroes the aggregate.
    pub fn remove_all(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
        self.buckets.clear();
        self.index.clear();
        self.min_freq = 0;
        self.total_freq_sum = 0;
    }

    fn touch_key(&mut self, key: &K) {
        let Some(pos) = self.index.get(key).copied() else {
            return;
        };
        let new_freq = pos.freq + 1;

        let (entry, emptied) = {
            let bucket = self
                .buckets
                .get_mut(&pos.freq)
                .expect("aging bucket missing for indexed entry");
            let entry = bucket
                .remove(pos.node)
                .expect("aging node missing for indexed entry");
            (entry, bucket.is_empty())
        };

        if emptied {
            self.buckets.remove(&pos.freq);
            if pos.freq == self.min_freq {
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
        self.total_freq_sum += 1;
        self.maybe_age();
    }

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
        self.total_freq_sum -= freq;
        self.min_freq = self.rescan_min_freq();
        #[cfg(feature = "metrics")]
        self.metrics.record_eviction();
    }

    fn maybe_age(&mut self) {
        if self.index.is_empty() {
            return;
        }
        let avg = self.total_freq_sum as f64 / self.index.len() as f64;
        if avg > self.limit {
            self.age_all();
        }
    }

    /// Decays every resident frequency to `max(1, freq − ⌊limit/2⌋)` and
    /// rebuilds the frequency index. The resident set is unchanged.
    fn age_all(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_aging_pass();

        let delta = (self.limit / 2.0).floor() as u64;
        let old_buckets = std::mem::take(&mut self.buckets);
        self.total_freq_sum = 0;

        // Rebuild from the highest old frequency down so previously hotter
        // entries sit nearer the MRU end of any merged bucket. Within one
        // bucket, draining MRU-first into the LRU end keeps relative order.
        let mut drained: Vec<(u64, RecencyList<Entry<K, V>>)> = old_buckets.into_iter().collect();
        drained.sort_unstable_by(|a, b| b.0.cmp(&a.0));

        for (freq, mut list) in drained {
            let new_freq = freq.saturating_sub(delta).max(1);
            while let Some(entry) = list.pop_mru() {
                let key = entry.key.clone();
                let node = self.buckets.entry(new_freq).or_default().push_lru(entry);
                self.index.insert(
                    key,
                    EntryPos {
                        freq: new_freq,
                        node,
                    },
                );
                self.total_freq_sum += new_freq;
            }
        }

        self.min_freq = self.rescan_min_freq();
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
    pub(crate) fn debug_validate(&self) {
        let mut total_entries = 0usize;
        let mut freq_sum = 0u64;
        for (freq, bucket) in &self.buckets {
            bucket.debug_validate();
            assert!(!bucket.is_empty(), "empty bucket left behind");
            assert!(*freq >= 1, "frequencies must stay >= 1");
            total_entries += bucket.len();
            freq_sum += freq * bucket.len() as u64;
            for entry in bucket.iter() {
                let pos = self.index.get(&entry.key).expect("entry missing from index");
                assert_eq!(pos.freq, *freq, "index frequency disagrees with bucket");
            }
        }
        assert_eq!(total_entries, self.index.len());
        assert_eq!(freq_sum, self.total_freq_sum, "aggregate drifted");
        assert!(self.index.len() <= self.capacity);
        if self.index.is_empty() {
            assert_eq!(self.min_freq, 0);
        } else {
            assert_eq!(self.min_freq, self.rescan_min_freq());
        }
    }
}

impl<K, V> PolicyCache<K, V> for LfuAgingCore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&mut self, key: K, value: V) {
        LfuAgingCore::put(self, key, value);
    }

    fn get(&mut self, key: &K) -> Option<V> {
        LfuAgingCore::get(self, key)
    }

    fn remove(&mut self, key: &K) {
        let _ = self.take(key);
    }

    fn remove_all(&mut self) {
        LfuAgingCore::remove_all(self);
    }

    fn contains(&self, key: &K) -> bool {
        LfuAgingCore::contains(self, key)
    }

    fn len(&self) -> usize {
        LfuAgingCore::len(self)
    }

    fn capacity(&self) -> usize {
        LfuAgingCore::capacity(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod construction {
        use super::*;

        #[test]
        fn validates_capacity_and_limit() {
            assert!(LfuAgingCore::<u32, u32>::try_new(0).is_err());
            assert!(LfuAgingCore::<u32, u32>::try_with_limit(4, 0.0).is_err());
            assert!(LfuAgingCore::<u32, u32>::try_with_limit(4, -1.0).is_err());
            assert!(LfuAgingCore::<u32, u32>::try_with_limit(4, f64::NAN).is_err());
            assert!(LfuAgingCore::<u32, u32>::try_with_limit(4, f64::INFINITY).is_err());
            assert!(LfuAgingCore::<u32, u32>::try_with_limit(4, 2.5).is_ok());
        }

        #[test]
        fn default_limit_applies() {
            let cache: LfuAgingCore<u32, u32> = LfuAgingCore::new(4);
            assert_eq!(cache.limit(), DEFAULT_AGING_LIMIT);
        }
    }

    mod aggregate {
        use super::*;

        #[test]
        fn sum_tracks_inserts_and_touches() {
            let mut cache = LfuAgingCore::try_with_limit(4, 100.0).unwrap();
            cache.put(1, 10);
            cache.put(2, 20);
            assert_eq!(cache.total_freq_sum(), 2);

            cache.get(&1);
            cache.get(&1);
            assert_eq!(cache.total_freq_sum(), 4);
            assert_eq!(cache.frequency(&1), Some(3));
            cache.debug_validate();
        }

        #[test]
        fn sum_tracks_removals_and_evictions() {
            let mut cache = LfuAgingCore::try_with_limit(2, 100.0).unwrap();
            cache.put(1, 10);
            cache.get(&1); // freq 2
            cache.put(2, 20);
            assert_eq!(cache.total_freq_sum(), 3);

            cache.take(&1);
            assert_eq!(cache.total_freq_sum(), 1);

            cache.put(3, 30);
            cache.put(4, 40); // evicts the freq-1 LRU entry
            assert_eq!(cache.len(), 2);
            cache.debug_validate();
        }
    }

    mod aging {
        use super::*;

        #[test]
        fn fires_when_average_exceeds_limit() {
            // limit 2.0 → delta 1
            let mut cache = LfuAgingCore::try_with_limit(3, 2.0).unwrap();
            cache.put("a", 1);
            cache.put("b", 2);
            cache.put("c", 3);
            cache.get(&"a");
            cache.get(&"a");
            cache.get(&"a"); // avg 6/3 = 2.0, not above yet
            assert_eq!(cache.frequency(&"a"), Some(4));

            cache.get(&"b"); // avg 7/3 > 2 → age with delta 1
            cache.debug_validate();

            // a: 4→3, b: 2 (already decayed from the same pass) …every
            // resident frequency is >= 1 and nothing was evicted.
            assert_eq!(cache.len(), 3);
            assert!(cache.frequency(&"a").unwrap() >= 1);
            assert!(cache.frequency(&"b").unwrap() >= 1);
            assert_eq!(cache.frequency(&"c"), Some(1));
            let sum: u64 = [&"a", &"b", &"c"]
                .iter()
                .map(|k| cache.frequency(k).unwrap())
                .sum();
            assert_eq!(sum, cache.total_freq_sum());
        }

        #[test]
        fn decay_floors_at_one() {
            // limit 4.0 → delta 2
            let mut cache = LfuAgingCore::try_with_limit(2, 4.0).unwrap();
            cache.put(1, 1);
            cache.put(2, 2);
            for _ in 0..7 {
                cache.get(&1);
            }
            // freq(1)=8, freq(2)=1 → avg 4.5 > 4 → aged: 8→6, 1→1
            assert_eq!(cache.frequency(&1), Some(6));
            assert_eq!(cache.frequency(&2), Some(1));
            cache.debug_validate();
        }

        #[test]
        fn aging_preserves_relative_order() {
            let mut cache = LfuAgingCore::try_with_limit(2, 4.0).unwrap();
            cache.put(1, 1);
            cache.put(2, 2);
            for _ in 0..7 {
                cache.get(&1);
            }
            // After aging, key 1 still outranks key 2; key 2 is the victim.
            cache.put(3, 3);
            assert!(cache.contains(&1));
            assert!(!cache.contains(&2));
            assert!(cache.contains(&3));
            cache.debug_validate();
        }

        #[cfg(feature = "metrics")]
        #[test]
        fn aging_passes_are_counted() {
            let mut cache = LfuAgingCore::try_with_limit(2, 2.0).unwrap();
            cache.put(1, 1);
            for _ in 0..4 {
                cache.get(&1);
            }
            assert!(cache.metrics_snapshot().aging_passes >= 1);
        }
    }

    mod interface {
        use super::*;

        #[test]
        fn remove_all_resets_aggregate() {
            let mut cache = LfuAgingCore::try_with_limit(4, 100.0).unwrap();
            cache.put(1, 1);
            cache.get(&1);
            cache.remove_all();
            assert!(cache.is_empty());
            assert_eq!(cache.total_freq_sum(), 0);
            assert_eq!(cache.min_freq(), 0);
            cache.put(2, 2);
            assert_eq!(cache.total_freq_sum(), 1);
            cache.debug_validate();
        }

        #[test]
        fn double_remove_is_noop() {
            let mut cache = LfuAgingCore::try_with_limit(4, 100.0).unwrap();
            cache.put(1, 1);
            assert_eq!(cache.take(&1), Some(1));
            assert_eq!(cache.take(&1), None);
            cache.debug_validate();
        }
    }
}
