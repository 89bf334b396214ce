//! # Adaptive Replacement Cache (ARC)
//!
//! ARC splits its resident set between a recency list and a frequency list
//! and continuously re-learns the right split from the workload. Two ghost
//! lists remember recently evicted keys; a hit on a ghost is the signal that
//! the corresponding resident list was too small.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │                             ArcCore<K, V>                                │
//! │                                                                          │
//! │   T1: LruCore<K, V>            T2: LfuCore<K, V>                         │
//! │   seen once, recency order     seen again, frequency order               │
//! │   ┌──────────────────────┐     ┌──────────────────────┐                  │
//! │   │ MRU ──────────► LRU  │     │ buckets + min_freq   │                  │
//! │   └──────────┬───────────┘     └──────────┬───────────┘                  │
//! │              │ evict                      │ evict                        │
//! │              ▼                            ▼                              │
//! │   B1: GhostList<K>             B2: GhostList<K>                          │
//! │   keys evicted from T1         keys evicted from T2                      │
//! │                                                                          │
//! │   p ∈ [0, C]: target share of C devoted to T1                            │
//! │     hit in B1 → p grows  ("evicted from T1 too soon")                    │
//! │     hit in B2 → p shrinks ("evicted from T2 too soon")                   │
//! └──────────────────────────────────────────────────────────────────────────┘
//!
//! put(key, value) case analysis
//! ─────────────────────────────
//!   hit in T1      migrate to T2 with the new value; p untouched
//!   hit in T2      overwrite + frequency touch
//!   hit in B1      p ← min(C, p + max(⌊|B2|/|B1|⌋, 1)); replace; install in T2
//!   hit in B2      p ← max(0, p − max(⌊|B1|/|B2|⌋, 1)); replace; install in T2
//!   full miss      bound L1 = T1 ∪ B1 and the total footprint, replace as
//!                  needed, install in T1
//!
//! replace(in_b2)
//! ──────────────
//!   if |T1| ≥ 1 and (|T1| > p, or the incoming key is a B2 ghost with
//!   |T1| = p):  evict T1's LRU → B1
//!   else:       evict T2's victim → B2
//! ```
//!
//! `get` never resurrects ghosts: the value was discarded at eviction, so a
//! ghost hit on read is still a miss.
//!
//! ## Invariants (checked by `debug_validate` in test/debug builds)
//!
//! - `|T1| + |T2| ≤ C` and `|B1| + |B2| ≤ C` at every return
//! - T1, T2, B1, B2 are pairwise disjoint
//! - `p ∈ [0, C]`
//!
//! ## Thread Safety
//!
//! Single-threaded. The embedded T1/T2 are plain cores under the one outer
//! lock supplied by [`ConcurrentCache`](crate::concurrent::ConcurrentCache)
//! or [`ShardedCache`](crate::sharded::ShardedCache); there are no nested
//! locks and no reentrancy.
//!
//! ## References
//!
//! - Megiddo & Modha, "ARC: A Self-Tuning, Low Overhead Replacement Cache",
//!   FAST 2003

use std::hash::Hash;

use crate::ds::ghost_list::GhostList;
use crate::error::ConfigError;
#[cfg(feature = "metrics")]
use crate::metrics::{EngineMetrics, MetricsSnapshot};
use crate::policy::lfu::LfuCore;
use crate::policy::lru::LruCore;
use crate::traits::PolicyCache;

/// Adaptive replacement cache: LRU (T1) + LFU (T2) residents with ghost
/// feedback.
///
/// # Example
///
/// ```
/// use hotset::policy::arc::ArcCore;
/// use hotset::traits::PolicyCache;
///
/// let mut cache = ArcCore::new(2);
/// cache.put("a", 1);
/// cache.put("b", 2);
/// cache.put("c", 3); // "a" falls off T1 into the B1 ghost list
///
/// assert!(!cache.contains(&"a"));
///
/// // Re-offering "a" is a ghost hit: p grows and "a" lands in T2
/// cache.put("a", 9);
/// assert_eq!(cache.p(), 1);
/// assert_eq!(cache.get(&"a"), Some(9));
/// ```
#[derive(Debug)]
pub struct ArcCore<K, V> {
    t1: LruCore<K, V>,
    t2: LfuCore<K, V>,
    b1: GhostList<K>,
    b2: GhostList<K>,
    p: usize,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: EngineMetrics,
}

impl<K, V> ArcCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an ARC core, validating `capacity >= 1`.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("arc capacity must be >= 1"));
        }
        Ok(Self {
            t1: LruCore::try_new(capacity)?,
            t2: LfuCore::try_new(capacity)?,
            b1: GhostList::new(capacity),
            b2: GhostList::new(capacity),
            p: 0,
            capacity,
            #[cfg(feature = "metrics")]
            metrics: EngineMetrics::default(),
        })
    }

    /// Creates an ARC core with the given capacity.
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

    /// Inserts or overwrites `key` according to the ARC case analysis.
    pub fn put(&mut self, key: K, value: V) {
        // Hit in T1: one re-reference proves reuse; move to T2.
        if self.t1.contains(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_put_update();
            let _ = self.t1.take(&key);
            self.t2.put(key, value);
            return;
        }
        // Hit in T2: overwrite and refresh.
        if self.t2.contains(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_put_update();
            self.t2.put(key, value);
            return;
        }

        // Ghost hit in B1: the recency side was starved; grow p.
        if self.b1.contains(&key) {
            let delta = (self.b2.len() / self.b1.len()).max(1);
            self.p = (self.p + delta).min(self.capacity);
            self.replace(false);
            self.b1.remove(&key);
            self.install_t2(key, value);
            self.trim_ghosts();
            return;
        }
        // Ghost hit in B2: the frequency side was starved; shrink p.
        if self.b2.contains(&key) {
            let delta = (self.b1.len() / self.b2.len()).max(1);
            self.p = self.p.saturating_sub(delta);
            self.replace(true);
            self.b2.remove(&key);
            self.install_t2(key, value);
            self.trim_ghosts();
            return;
        }

        // Full miss.
        #[cfg(feature = "metrics")]
        self.metrics.record_put_insert();

        let l1 = self.t1.len() + self.b1.len();
        if l1 == self.capacity {
            if self.t1.len() < self.capacity {
                self.b1.pop_lru();
                self.replace(false);
            } else if let Some((victim, _)) = self.t1.pop_lru() {
                #[cfg(feature = "metrics")]
                self.metrics.record_eviction();
                self.b1.record(victim);
            }
        } else {
            let total = self.t1.len() + self.t2.len() + self.b1.len() + self.b2.len();
            if total >= self.capacity {
                if total == 2 * self.capacity {
                    self.b2.pop_lru();
                }
                self.replace(false);
            }
        }

        self.t1.put(key, value);
        self.trim_ghosts();
    }

    /// Returns the value for a resident key. A T1 hit migrates the entry to
    /// T2; a T2 hit refreshes it. Ghost entries never hit on read.
    pub fn get(&mut self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        if let Some(value) = self.t1.take(key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_hit();
            self.t2.put(key.clone(), value.clone());
            return Some(value);
        }
        let hit = self.t2.get(key);
        #[cfg(feature = "metrics")]
        if hit.is_some() {
            self.metrics.record_get_hit();
        } else {
            self.metrics.record_get_miss();
        }
        hit
    }

    /// Deletes `key` from whichever of T1, T2, B1, B2 holds it.
    pub fn remove(&mut self, key: &K) {
        if self.t1.take(key).is_some() || self.t2.take(key).is_some() {
            #[cfg(feature = "metrics")]
            self.metrics.record_removal();
            return;
        }
        if self.b1.remove(key) {
            return;
        }
        let _ = self.b2.remove(key);
    }

    /// Clears T1, T2, B1, B2 and resets `p` to 0.
    pub fn remove_all(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
        self.t1.remove_all();
        self.t2.remove_all();
        self.b1.clear();
        self.b2.clear();
        self.p = 0;
    }

    /// Returns `true` if `key` is resident (in T1 or T2).
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.t1.contains(key) || self.t2.contains(key)
    }

    /// Returns the number of resident entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.t1.len() + self.t2.len()
    }

    /// Returns `true` if nothing is resident.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the total resident capacity C.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the adaptive split target for `|T1|`.
    #[inline]
    pub fn p(&self) -> usize {
        self.p
    }

    /// Returns the number of entries in the recency list T1.
    #[inline]
    pub fn t1_len(&self) -> usize {
        self.t1.len()
    }

    /// Returns the number of entries in the frequency list T2.
    #[inline]
    pub fn t2_len(&self) -> usize {
        self.t2.len()
    }

    /// Returns the number of B1 ghost keys.
    #[inline]
    pub fn b1_len(&self) -> usize {
        self.b1.len()
    }

    /// Returns the number of B2 ghost keys.
    #[inline]
    pub fn b2_len(&self) -> usize {
        self.b2.len()
    }

    /// Installs a proven-reuse key at T2, fresh.
    fn install_t2(&mut self, key: K, value: V) {
        self.t2.put(key, value);
    }

    /// The ARC replacement subroutine: evict one resident entry into the
    /// matching ghost list, steered by `p`.
    fn replace(&mut self, in_b2: bool) {
        let t1_len = self.t1.len();
        if t1_len >= 1 && (t1_len > self.p || (in_b2 && t1_len == self.p)) {
            if let Some((victim, _)) = self.t1.pop_lru() {
                #[cfg(feature = "metrics")]
                self.metrics.record_eviction();
                self.b1.record(victim);
            }
        } else if let Some((victim, _)) = self.t2.pop_lfu() {
            #[cfg(feature = "metrics")]
            self.metrics.record_eviction();
            self.b2.record(victim);
        } else if let Some((victim, _)) = self.t1.pop_lru() {
            // T2 empty: fall back to T1 so the caller's insert has room.
            #[cfg(feature = "metrics")]
            self.metrics.record_eviction();
            self.b1.record(victim);
        }
    }

    /// Keeps `|B1| + |B2| ≤ C` at every return. Drops from B1 while the L1
    /// side is oversized, otherwise from B2.
    fn trim_ghosts(&mut self) {
        while self.b1.len() + self.b2.len() > self.capacity {
            let l1_over = self.t1.len() + self.b1.len() > self.capacity;
            let dropped = if (l1_over && !self.b1.is_empty()) || self.b2.is_empty() {
                self.b1.pop_lru()
            } else {
                self.b2.pop_lru()
            };
            if dropped.is_none() {
                break;
            }
        }
    }

    #[cfg(feature = "metrics")]
    /// Returns a point-in-time copy of this engine's counters.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot(self.len(), self.capacity)
    }

    #[cfg(any(test, debug_assertions))]
    pub(crate) fn debug_validate(&self)
    where
        K: std::fmt::Debug,
    {
        self.t1.debug_validate();
        self.t2.debug_validate();
        self.b1.debug_validate();
        self.b2.debug_validate();

        assert!(
            self.t1.len() + self.t2.len() <= self.capacity,
            "resident set exceeds capacity"
        );
        assert!(
            self.b1.len() + self.b2.len() <= self.capacity,
            "ghost lists exceed capacity"
        );
        assert!(self.p <= self.capacity, "p out of range");

        // The four sets are pairwise disjoint; residents never shadow ghosts.
        for key in self.t1.iter_keys() {
            assert!(!self.t2.contains(key), "key {key:?} in both T1 and T2");
            assert!(!self.b1.contains(key), "key {key:?} in both T1 and B1");
            assert!(!self.b2.contains(key), "key {key:?} in both T1 and B2");
        }
        for key in self.t2.iter_keys() {
            assert!(!self.b1.contains(key), "key {key:?} in both T2 and B1");
            assert!(!self.b2.contains(key), "key {key:?} in both T2 and B2");
        }
    }
}

impl<K, V> PolicyCache<K, V> for ArcCore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&mut self, key: K, value: V) {
        ArcCore::put(self, key, value);
    }

    fn get(&mut self, key: &K) -> Option<V> {
        ArcCore::get(self, key)
    }

    fn remove(&mut self, key: &K) {
        ArcCore::remove(self, key);
    }

    fn remove_all(&mut self) {
        ArcCore::remove_all(self);
    }

    fn contains(&self, key: &K) -> bool {
        ArcCore::contains(self, key)
    }

    fn len(&self) -> usize {
        ArcCore::len(self)
    }

    fn capacity(&self) -> usize {
        ArcCore::capacity(self)
    }
}
