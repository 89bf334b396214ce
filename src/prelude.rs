pub use crate::builder::{Cache, CacheBuilder, EvictionPolicy};
pub use crate::ds::{GhostList, NodeId, RecencyList, ShardSelector};
pub use crate::error::ConfigError;
pub use crate::policy::arc::ArcCore;
pub use crate::policy::lfu::LfuCore;
pub use crate::policy::lfu_aging::LfuAgingCore;
pub use crate::policy::lru::LruCore;
pub use crate::policy::lru_k::LruKCore;
pub use crate::traits::PolicyCache;

#[cfg(feature = "concurrency")]
pub use crate::concurrent::ConcurrentCache;
#[cfg(feature = "concurrency")]
pub use crate::sharded::{
    ShardedArcCache, ShardedCache, ShardedLfuAgingCache, ShardedLfuCache, ShardedLruCache,
    ShardedLruKCache,
};

#[cfg(feature = "metrics")]
pub use crate::metrics::MetricsSnapshot;
