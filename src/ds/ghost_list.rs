//! Bounded recency list of evicted keys.
//!
//! Adaptive policies remember *which* keys they recently evicted without
//! keeping the values around. A hit on such a ghost entry is the feedback
//! signal ARC uses to retune its recency/frequency split. Implemented as a
//! [`RecencyList`] of keys plus a hash index for O(1) membership.
//!
//! ```text
//!   record("d") with capacity 3 and list [c, b, a]:
//!     1. not tracked, at capacity → drop LRU key "a"
//!     2. push "d" at the MRU end → [d, c, b]
//!
//!   record("c") when already tracked:
//!     move to MRU → [c, d, b]
//! ```
//!
//! Ghost entries own only the key; the value was discarded at eviction time,
//! so a ghost hit on read is still a miss.

use rustc_hash::FxHashMap;
use std::hash::Hash;

use crate::ds::recency_list::{NodeId, RecencyList};

/// Bounded key-only recency tracker (ARC's B1/B2).
///
/// # Example
///
/// ```
/// use hotset::ds::GhostList;
///
/// let mut ghost = GhostList::new(2);
/// ghost.record("a");
/// ghost.record("b");
/// ghost.record("c"); // capacity 2: "a" falls off the LRU end
///
/// assert!(!ghost.contains(&"a"));
/// assert!(ghost.contains(&"b"));
/// assert!(ghost.contains(&"c"));
/// ```
#[derive(Debug)]
pub struct GhostList<K> {
    list: RecencyList<K>,
    index: FxHashMap<K, NodeId>,
    capacity: usize,
}

impl<K> GhostList<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates a ghost list tracking at most `capacity` keys.
    pub fn new(capacity: usize) -> Self {
        Self {
            list: RecencyList::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            capacity,
        }
    }

    /// Returns the maximum number of tracked keys.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of keys currently tracked.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if no keys are tracked.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns `true` if `key` is tracked.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Records an eviction: inserts `key` at the MRU end, promoting it if
    /// already tracked and dropping the LRU key when at capacity.
    pub fn record(&mut self, key: K) {
        if self.capacity == 0 {
            return;
        }
        if let Some(&id) = self.index.get(&key) {
            self.list.move_to_mru(id);
            return;
        }
        if self.index.len() >= self.capacity {
            self.pop_lru();
        }
        let id = self.list.push_mru(key.clone());
        self.index.insert(key, id);
    }

    /// Removes `key` from the tracker; returns `true` if it was present.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.index.remove(key) {
            Some(id) => {
                self.list.remove(id);
                true
            },
            None => false,
        }
    }

    /// Drops and returns the LRU-end (oldest) tracked key.
    pub fn pop_lru(&mut self) -> Option<K> {
        let key = self.list.pop_lru()?;
        self.index.remove(&key);
        Some(key)
    }

    /// Forgets every tracked key.
    pub fn clear(&mut self) {
        self.list.clear();
        self.index.clear();
    }

    #[cfg(any(test, debug_assertions))]
    pub(crate) fn debug_validate(&self) {
        self.list.debug_validate();
        assert_eq!(self.list.len(), self.index.len());
        assert!(self.index.len() <= self.capacity);
        for (key, &id) in &self.index {
            assert!(self.list.get(id) == Some(key), "index points at wrong node");
        }
    }
}
