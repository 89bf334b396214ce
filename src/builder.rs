//! Runtime policy selection behind a uniform cache type.
//!
//! Embedding programs often pick the eviction policy from configuration. The
//! builder hides the concrete core types behind [`Cache`], an enum-dispatched
//! wrapper that implements [`PolicyCache`] itself, so call sites stay
//! monomorphic and allocation-free.
//!
//! ## Example
//!
//! ```
//! use hotset::builder::{CacheBuilder, EvictionPolicy};
//! use hotset::traits::PolicyCache;
//!
//! let mut cache = CacheBuilder::new(100)
//!     .build::<u64, String>(EvictionPolicy::Lru);
//! cache.put(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some("hello".to_string()));
//! ```

use std::hash::Hash;

use crate::error::ConfigError;
use crate::policy::arc::ArcCore;
use crate::policy::lfu::LfuCore;
use crate::policy::lfu_aging::LfuAgingCore;
use crate::policy::lru::LruCore;
use crate::policy::lru_k::LruKCore;
use crate::traits::PolicyCache;

/// Available eviction policies.
#[derive(Debug, Clone, PartialEq)]
pub enum EvictionPolicy {
    /// Least Recently Used.
    Lru,
    /// Least Frequently Used (bucketed, O(1)).
    Lfu,
    /// LFU with average-triggered frequency decay.
    LfuAging {
        /// Average-frequency threshold; decay amount is `⌊limit/2⌋`.
        limit: f64,
    },
    /// LRU with a K-reference admission filter.
    LruK {
        /// References required for admission.
        k: u64,
        /// Bound on tracked not-yet-admitted keys.
        history_capacity: usize,
    },
    /// Adaptive Replacement Cache.
    Arc,
}

/// Policy-erased cache produced by [`CacheBuilder`].
#[derive(Debug)]
pub struct Cache<K, V> {
    inner: CacheInner<K, V>,
}

#[derive(Debug)]
enum CacheInner<K, V> {
    Lru(LruCore<K, V>),
    Lfu(LfuCore<K, V>),
    LfuAging(LfuAgingCore<K, V>),
    LruK(LruKCore<K, V>),
    Arc(ArcCore<K, V>),
}

macro_rules! dispatch {
    ($self:expr, $engine:ident => $body:expr) => {
        match $self {
            CacheInner::Lru($engine) => $body,
            CacheInner::Lfu($engine) => $body,
            CacheInner::LfuAging($engine) => $body,
            CacheInner::LruK($engine) => $body,
            CacheInner::Arc($engine) => $body,
        }
    };
}

impl<K, V> PolicyCache<K, V> for Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&mut self, key: K, value: V) {
        dispatch!(&mut self.inner, engine => engine.put(key, value))
    }

    fn get(&mut self, key: &K) -> Option<V> {
        dispatch!(&mut self.inner, engine => engine.get(key))
    }

    fn remove(&mut self, key: &K) {
        dispatch!(&mut self.inner, engine => engine.remove(key))
    }

    fn remove_all(&mut self) {
        dispatch!(&mut self.inner, engine => engine.remove_all())
    }

    fn contains(&self, key: &K) -> bool {
        dispatch!(&self.inner, engine => engine.contains(key))
    }

    fn len(&self) -> usize {
        dispatch!(&self.inner, engine => engine.len())
    }

    fn capacity(&self) -> usize {
        dispatch!(&self.inner, engine => engine.capacity())
    }
}

/// Builder for policy-erased caches.
#[derive(Debug, Clone)]
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    /// Starts a builder for a cache of `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Builds a cache with the chosen policy, validating all parameters.
    pub fn try_build<K, V>(self, policy: EvictionPolicy) -> Result<Cache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone,
        V: Clone,
    {
        let inner = match policy {
            EvictionPolicy::Lru => CacheInner::Lru(LruCore::try_new(self.capacity)?),
            EvictionPolicy::Lfu => CacheInner::Lfu(LfuCore::try_new(self.capacity)?),
            EvictionPolicy::LfuAging { limit } => {
                CacheInner::LfuAging(LfuAgingCore::try_with_limit(self.capacity, limit)?)
            },
            EvictionPolicy::LruK { k, history_capacity } => {
                CacheInner::LruK(LruKCore::try_new(k, history_capacity, self.capacity)?)
            },
            EvictionPolicy::Arc => CacheInner::Arc(ArcCore::try_new(self.capacity)?),
        };
        Ok(Cache { inner })
    }

    /// Builds a cache with the chosen policy.
    ///
    /// # Panics
    ///
    /// Panics on invalid parameters; use [`try_build`](Self::try_build) to
    /// handle configuration errors.
    pub fn build<K, V>(self, policy: EvictionPolicy) -> Cache<K, V>
    where
        K: Eq + Hash + Clone,
        V: Clone,
    {
        match self.try_build(policy) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_policies() -> Vec<EvictionPolicy> {
        vec![
            EvictionPolicy::Lru,
            EvictionPolicy::Lfu,
            EvictionPolicy::LfuAging { limit: 10.0 },
            EvictionPolicy::LruK {
                k: 1,
                history_capacity: 8,
            },
            EvictionPolicy::Arc,
        ]
    }

    #[test]
    fn every_policy_supports_the_interface() {
        for policy in all_policies() {
            let mut cache = CacheBuilder::new(10).build::<u64, String>(policy.clone());

            cache.put(1, "one".to_string());
            cache.put(2, "two".to_string());
            assert_eq!(cache.get(&1), Some("one".to_string()), "{policy:?}");
            assert_eq!(cache.get(&3), None, "{policy:?}");
            assert!(cache.contains(&1), "{policy:?}");
            assert_eq!(cache.len(), 2, "{policy:?}");
            assert_eq!(cache.capacity(), 10, "{policy:?}");

            cache.put(1, "ONE".to_string());
            assert_eq!(cache.get(&1), Some("ONE".to_string()), "{policy:?}");

            cache.remove(&2);
            assert!(!cache.contains(&2), "{policy:?}");

            cache.remove_all();
            assert!(cache.is_empty(), "{policy:?}");
        }
    }

    #[test]
    fn invalid_parameters_surface_as_errors() {
        assert!(CacheBuilder::new(0)
            .try_build::<u64, u64>(EvictionPolicy::Lru)
            .is_err());
        assert!(CacheBuilder::new(10)
            .try_build::<u64, u64>(EvictionPolicy::LfuAging { limit: -1.0 })
            .is_err());
        assert!(CacheBuilder::new(10)
            .try_build::<u64, u64>(EvictionPolicy::LruK {
                k: 0,
                history_capacity: 8
            })
            .is_err());
    }

    #[test]
    fn capacity_is_enforced_across_policies() {
        for policy in all_policies() {
            let mut cache = CacheBuilder::new(2).build::<u64, u64>(policy.clone());
            for key in 0..8u64 {
                cache.put(key, key);
                // LRU-K admits through its filter, so occupancy may lag, but
                // no policy overshoots.
                assert!(cache.len() <= 2, "{policy:?}");
            }
        }
    }
}
