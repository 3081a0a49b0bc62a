//! Stock key builders.

pub mod shard;

pub use shard::ShardKeyBuilder;
