//! # The Policy Interface
//!
//! This module defines [`PolicyCache`], the one polymorphic interface every
//! eviction engine in this crate implements. Embedding programs (benchmark
//! harnesses, demo programs, applications) talk to caches exclusively through
//! this interface; everything policy-specific (frequencies, ghost lists,
//! adaptation parameters) stays behind it as inherent methods on the concrete
//! cores.
//!
//! ## Architecture
//!
//! ```text
//!                  ┌────────────────────────────────────────────┐
//!                  │            PolicyCache<K, V>               │
//!                  │                                            │
//!                  │  put(&mut, K, V)                           │
//!                  │  get(&mut, &K) → Option<V>                 │
//!                  │  get_into(&mut, &K, &mut V) → bool         │
//!                  │  get_or_default(&mut, &K) → V              │
//!                  │  remove(&mut, &K)                          │
//!                  │  remove_all(&mut)                          │
//!                  │  contains(&, &K) / len / capacity          │
//!                  └─────────────────────┬──────────────────────┘
//!                                        │
//!          ┌─────────────┬───────────────┼───────────────┬─────────────┐
//!          ▼             ▼               ▼               ▼             ▼
//!      LruCore       LfuCore      LfuAgingCore      LruKCore       ArcCore
//!     (recency)    (frequency)   (freq + decay)   (K-admission)  (adaptive)
//! ```
//!
//! ## Operation Contracts
//!
//! | Operation        | Hit                                       | Miss            |
//! |------------------|-------------------------------------------|-----------------|
//! | `put`            | overwrite value + access side effect      | insert, evict ≤ 1 entry |
//! | `get`            | access side effect, return cloned value   | `None`          |
//! | `get_into`       | copy into `out`, return `true`            | `out` untouched, `false` |
//! | `get_or_default` | same as `get`                             | `V::default()`  |
//! | `remove`         | delete entry and every reference to it    | no-op           |
//! | `remove_all`     | reset to the post-construction state      | -               |
//!
//! The "access side effect" is policy-specific: LRU moves the entry to the
//! MRU end, the LFU family increments its frequency and reseats it, LRU-K
//! records a reference, ARC promotes between its resident lists.
//!
//! `contains`, `len`, `is_empty`, and `capacity` are read-only and apply no
//! access side effect.
//!
//! ## Failure Model
//!
//! None of these operations can fail. A `get` miss and a legitimately stored
//! default value are distinguished by `get_into`'s boolean (or by `get`'s
//! `Option`); `get_or_default` deliberately collapses the two. The only
//! fallible surface in the crate is construction (see
//! [`ConfigError`](crate::error::ConfigError)).
//!
//! ## Dynamic Dispatch
//!
//! `PolicyCache` is object safe. Use `Box<dyn PolicyCache<K, V>>` (or the
//! enum-dispatching [`Cache`](crate::builder::Cache)) at the embedding
//! boundary; internal compositions (ARC owning its T1/T2, LRU-K owning main
//! and history) use the concrete core types so the hot paths inline.
//!
//! ## Thread Safety
//!
//! Core implementations are single-threaded (`&mut self`). Thread safety is
//! layered on top by [`ConcurrentCache`](crate::concurrent::ConcurrentCache)
//! (one engine, one mutex) and [`ShardedCache`](crate::sharded::ShardedCache)
//! (lock striping), never inside an engine.

/// The polymorphic cache interface implemented by every eviction engine.
///
/// # Type Parameters
///
/// - `K`: Key type; engines require `Eq + Hash + Clone`
/// - `V`: Value type; engines require `Clone` (values are copied out, never
///   borrowed across the cache boundary)
///
/// # Example
///
/// ```
/// use hotset::traits::PolicyCache;
/// use hotset::policy::lru::LruCore;
///
/// fn warm<C: PolicyCache<u64, String>>(cache: &mut C, data: &[(u64, String)]) {
///     for (key, value) in data {
///         cache.put(*key, value.clone());
///     }
/// }
///
/// let mut cache = LruCore::new(16);
/// warm(&mut cache, &[(1, "one".into()), (2, "two".into())]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait PolicyCache<K, V> {
    /// Inserts or overwrites a key-value pair.
    ///
    /// On a hit the value is overwritten and the engine's access side effect
    /// is applied. On a miss with the resident set at capacity, exactly one
    /// entry is evicted first. Never fails for a cache of capacity ≥ 1.
    ///
    /// # Example
    ///
    /// ```
    /// use hotset::traits::PolicyCache;
    /// use hotset::policy::lru::LruCore;
    ///
    /// let mut cache = LruCore::new(8);
    /// cache.put(1, "first");
    /// cache.put(1, "second"); // overwrite, same slot
    /// assert_eq!(cache.len(), 1);
    /// ```
    fn put(&mut self, key: K, value: V);

    /// Returns a copy of the value if resident, applying the access side
    /// effect; `None` on a miss.
    ///
    /// # Example
    ///
    /// ```
    /// use hotset::traits::PolicyCache;
    /// use hotset::policy::lru::LruCore;
    ///
    /// let mut cache = LruCore::new(8);
    /// cache.put(1, 100);
    /// assert_eq!(cache.get(&1), Some(100));
    /// assert_eq!(cache.get(&2), None);
    /// ```
    fn get(&mut self, key: &K) -> Option<V>;

    /// Copies the value into `out` and returns `true` if resident; otherwise
    /// returns `false` and leaves `out` unmodified.
    ///
    /// This is the variant that disambiguates a miss from a stored default
    /// value.
    ///
    /// # Example
    ///
    /// ```
    /// use hotset::traits::PolicyCache;
    /// use hotset::policy::lru::LruCore;
    ///
    /// let mut cache = LruCore::new(8);
    /// cache.put(1, 7i32);
    ///
    /// let mut out = -1;
    /// assert!(cache.get_into(&1, &mut out));
    /// assert_eq!(out, 7);
    ///
    /// assert!(!cache.get_into(&2, &mut out));
    /// assert_eq!(out, 7); // untouched on miss
    /// ```
    fn get_into(&mut self, key: &K, out: &mut V) -> bool {
        match self.get(key) {
            Some(value) => {
                *out = value;
                true
            },
            None => false,
        }
    }

    /// Returns a copy of the value if resident, otherwise `V::default()`.
    ///
    /// Must never signal an error for a miss; use [`get_into`](Self::get_into)
    /// when the caller needs to tell the two apart.
    ///
    /// # Example
    ///
    /// ```
    /// use hotset::traits::PolicyCache;
    /// use hotset::policy::lru::LruCore;
    ///
    /// let mut cache = LruCore::new(8);
    /// cache.put(1, 42u32);
    /// assert_eq!(cache.get_or_default(&1), 42);
    /// assert_eq!(cache.get_or_default(&9), 0);
    /// ```
    fn get_or_default(&mut self, key: &K) -> V
    where
        V: Default,
    {
        self.get(key).unwrap_or_default()
    }

    /// Deletes the entry and every auxiliary reference to it; no-op when the
    /// key is not resident.
    fn remove(&mut self, key: &K);

    /// Deletes every entry and resets all auxiliary state (ghost lists,
    /// adaptation parameters, frequency floors, aggregates) to the
    /// post-construction state.
    fn remove_all(&mut self);

    /// Returns `true` if the key is resident. Read-only: no access side
    /// effect is applied.
    fn contains(&self, key: &K) -> bool;

    /// Returns the number of resident entries.
    fn len(&self) -> usize;

    /// Returns `true` if the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the fixed capacity configured at construction.
    fn capacity(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::lru::LruCore;

    fn exercise(cache: &mut dyn PolicyCache<u32, u32>) {
        cache.put(1, 10);
        cache.put(2, 20);
        assert_eq!(cache.get(&1), Some(10));

        let mut out = 0;
        assert!(cache.get_into(&2, &mut out));
        assert_eq!(out, 20);
        assert!(!cache.get_into(&3, &mut out));
        assert_eq!(out, 20);

        assert_eq!(cache.get_or_default(&3), 0);

        cache.remove(&1);
        assert!(!cache.contains(&1));
        cache.remove(&1); // double remove is a no-op

        cache.remove_all();
        assert!(cache.is_empty());
    }

    #[test]
    fn interface_is_object_safe() {
        let mut cache: Box<dyn PolicyCache<u32, u32>> = Box::new(LruCore::new(4));
        exercise(cache.as_mut());
    }

    #[test]
    fn default_get_into_leaves_out_untouched_on_miss() {
        let mut cache: LruCore<u32, String> = LruCore::new(2);
        let mut out = String::from("sentinel");
        assert!(!cache.get_into(&1, &mut out));
        assert_eq!(out, "sentinel");
    }
}
