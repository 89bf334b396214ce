//! Thread-safe wrapper: one engine behind one mutex.
//!
//! Policy cores are deliberately single-threaded; [`ConcurrentCache`] gives
//! any of them the crate's concurrency contract: every operation acquires the
//! engine's single [`parking_lot::Mutex`], so all operations on one engine
//! are linearizable in lock-acquisition order. The lock is the only
//! suspension point; nothing blocks on I/O or waits on a condition.
//!
//! The wrapper is `Clone` and internally `Arc`-shared, so handles can be
//! passed to worker threads directly.
//!
//! ```text
//!   thread 1          thread 2          thread 3
//!      │ put              │ get              │ remove
//!      ▼                  ▼                  ▼
//!   ┌───────────────── Mutex<C> ─────────────────┐
//!   │        exactly one operation at a time     │
//!   └───────────────────┬────────────────────────┘
//!                       ▼
//!              single-threaded core
//! ```
//!
//! For workloads where one lock becomes the bottleneck, use
//! [`ShardedCache`](crate::sharded::ShardedCache) instead.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::traits::PolicyCache;

/// Shareable cache handle serializing one engine behind one mutex.
///
/// # Example
///
/// ```
/// use hotset::concurrent::ConcurrentCache;
/// use hotset::policy::lru::LruCore;
///
/// let cache = ConcurrentCache::new(LruCore::new(64));
///
/// let writer = cache.clone();
/// std::thread::spawn(move || {
///     writer.put(1u64, "from another thread".to_string());
/// })
/// .join()
/// .unwrap();
///
/// assert_eq!(cache.get(&1), Some("from another thread".to_string()));
/// ```
#[derive(Debug)]
pub struct ConcurrentCache<C> {
    inner: Arc<Mutex<C>>,
}

impl<C> Clone for ConcurrentCache<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> ConcurrentCache<C> {
    /// Wraps an already constructed engine.
    pub fn new(engine: C) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Inserts or overwrites a key-value pair.
    pub fn put<K, V>(&self, key: K, value: V)
    where
        C: PolicyCache<K, V>,
    {
        self.inner.lock().put(key, value);
    }

    /// Returns a copy of the value if resident, applying the engine's access
    /// side effect.
    pub fn get<K, V>(&self, key: &K) -> Option<V>
    where
        C: PolicyCache<K, V>,
    {
        self.inner.lock().get(key)
    }

    /// Copies the value into `out` and returns `true` if resident; leaves
    /// `out` unmodified on a miss.
    pub fn get_into<K, V>(&self, key: &K, out: &mut V) -> bool
    where
        C: PolicyCache<K, V>,
    {
        self.inner.lock().get_into(key, out)
    }

    /// Returns a copy of the value if resident, otherwise `V::default()`.
    pub fn get_or_default<K, V>(&self, key: &K) -> V
    where
        C: PolicyCache<K, V>,
        V: Default,
    {
        self.inner.lock().get_or_default(key)
    }

    /// Deletes the entry; no-op when absent.
    pub fn remove<K, V>(&self, key: &K)
    where
        C: PolicyCache<K, V>,
    {
        self.inner.lock().remove(key);
    }

    /// Deletes every entry and resets auxiliary state.
    pub fn remove_all<K, V>(&self)
    where
        C: PolicyCache<K, V>,
    {
        self.inner.lock().remove_all();
    }

    /// Returns `true` if the key is resident.
    pub fn contains<K, V>(&self, key: &K) -> bool
    where
        C: PolicyCache<K, V>,
    {
        self.inner.lock().contains(key)
    }

    /// Returns the number of resident entries.
    pub fn len<K, V>(&self) -> usize
    where
        C: PolicyCache<K, V>,
    {
        self.inner.lock().len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty<K, V>(&self) -> bool
    where
        C: PolicyCache<K, V>,
    {
        self.inner.lock().is_empty()
    }

    /// Returns the fixed capacity.
    pub fn capacity<K, V>(&self) -> usize
    where
        C: PolicyCache<K, V>,
    {
        self.inner.lock().capacity()
    }

    /// Runs `f` with the engine locked, for policy-specific inspection that
    /// the uniform interface does not cover.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::arc::ArcCore;
    use crate::policy::lru::LruCore;
    use std::thread;

    #[test]
    fn shared_across_threads() {
        let cache = ConcurrentCache::new(LruCore::new(128));

        let mut handles = Vec::new();
        for t in 0..4u64 {
            let cache = cache.clone();
            handles.push(thread::spawn(move || {
                for i in 0..32u64 {
                    cache.put(t * 100 + i, i);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 128);
        assert_eq!(cache.get(&5), Some(5));
    }

    #[test]
    fn interface_parity_with_core() {
        let cache = ConcurrentCache::new(ArcCore::new(4));
        cache.put("a", 1);
        assert!(cache.contains(&"a"));

        let mut out = 0;
        assert!(cache.get_into(&"a", &mut out));
        assert_eq!(out, 1);
        assert_eq!(cache.get_or_default(&"missing"), 0);

        cache.remove(&"a");
        assert!(cache.is_empty::<&str, i32>());
        cache.remove_all::<&str, i32>();
        assert_eq!(cache.capacity::<&str, i32>(), 4);
    }

    #[test]
    fn with_engine_reaches_policy_internals() {
        let cache = ConcurrentCache::new(ArcCore::new(4));
        cache.put(1u32, 1u32);
        let (t1, t2) = cache.with_engine(|engine| (engine.t1_len(), engine.t2_len()));
        assert_eq!((t1, t2), (1, 0));
    }
}
