pub mod ghost_list;
pub mod recency_list;
pub mod shard;

pub use ghost_list::GhostList;
pub use recency_list::{NodeId, RecencyList};
pub use shard::ShardSelector;
