//! Hash-sharded routing keys.

use dsrouter_core::{KeyBuilder, RoutingKey};
use std::hash::{DefaultHasher, Hash, Hasher};

/// Spreads string parameters over `shards` keys named `<prefix><index>`.
///
/// The index is `hash(param) % shards` using the standard library's
/// `DefaultHasher`, which is stable within one build of the program but not
/// guaranteed across Rust releases.
#[derive(Debug, Clone)]
pub struct ShardKeyBuilder {
    prefix: String,
    shards: u32,
}

impl ShardKeyBuilder {
    /// Create a builder for keys `prefix0 .. prefix{shards - 1}`.
    pub fn new(prefix: impl Into<String>, shards: u32) -> Self {
        Self {
            prefix: prefix.into(),
            shards,
        }
    }

    /// Number of shards.
    pub fn shards(&self) -> u32 {
        self.shards
    }

    /// Shard index for `param`, or `None` when there are no shards.
    pub fn shard_of(&self, param: &str) -> Option<u32> {
        if self.shards == 0 {
            return None;
        }
        let mut hasher = DefaultHasher::new();
        param.hash(&mut hasher);
        Some((hasher.finish() % u64::from(self.shards)) as u32)
    }

    fn key_for(&self, shard: u32) -> RoutingKey {
        RoutingKey::from(format!("{}{}", self.prefix, shard))
    }
}

impl KeyBuilder for ShardKeyBuilder {
    type Param = str;

    fn derive_key(&self, param: &str) -> Option<RoutingKey> {
        self.shard_of(param).map(|shard| self.key_for(shard))
    }

    fn all_keys(&self) -> Vec<RoutingKey> {
        (0..self.shards).map(|shard| self.key_for(shard)).collect()
    }
}
