#![allow(dead_code)]

use dsrouter::{KeyBuilder, Router, RoutingContext, RoutingKey};

// ============================================================================
// Test Key Builders
// ============================================================================

/// Customers spread over three regional databases by id.
#[derive(Debug, Default)]
pub struct Regions;

impl Regions {
    pub const KEYS: [&'static str; 3] = ["eu", "us", "ap"];
}

impl KeyBuilder for Regions {
    type Param = u32;

    fn derive_key(&self, customer: &u32) -> Option<RoutingKey> {
        let index = (*customer % Self::KEYS.len() as u32) as usize;
        Some(RoutingKey::from(Self::KEYS[index]))
    }

    fn all_keys(&self) -> Vec<RoutingKey> {
        Self::KEYS.iter().map(|key| RoutingKey::from(*key)).collect()
    }
}

/// Two archive shards that never derive a key from a parameter.
#[derive(Debug, Default)]
pub struct Archives;

impl KeyBuilder for Archives {
    type Param = str;

    fn derive_key(&self, _param: &str) -> Option<RoutingKey> {
        None
    }

    fn all_keys(&self) -> Vec<RoutingKey> {
        vec!["archive_a".into(), "archive_b".into()]
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// A router with `Regions` and `Archives` registered.
pub fn router(workers: usize) -> Router {
    Router::builder()
        .concurrent_workers(workers)
        .register_default::<Regions>()
        .register_default::<Archives>()
        .build()
}

/// The key bound in `ctx`, or the empty key.
pub fn key_of(ctx: &RoutingContext) -> RoutingKey {
    ctx.current_key().unwrap_or_else(|| RoutingKey::from(""))
}
