//! hotset: bounded in-memory key→value caches with classical eviction policies.
//!
//! Every policy core implements the [`traits::PolicyCache`] interface; the
//! `concurrency` feature adds the [`concurrent::ConcurrentCache`] and
//! [`sharded::ShardedCache`] wrappers for multi-threaded embedders.

pub mod ds;
pub mod policy;

#[cfg(feature = "metrics")]
pub mod metrics;

#[cfg(feature = "concurrency")]
pub mod concurrent;
#[cfg(feature = "concurrency")]
pub mod sharded;

pub mod builder;
pub mod error;
pub mod prelude;
pub mod traits;
