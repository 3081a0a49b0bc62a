//! Key-to-target selection.
//!
//! A [`TargetMap`] is the consumer side of routing: whatever opens physical
//! connections asks it which target serves the key bound in the current
//! [`RoutingContext`].

use dsrouter_core::{RoutingContext, RoutingKey};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while building or querying a [`TargetMap`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    /// No key is bound and no default target exists.
    #[error("no routing key is bound and no default target is configured")]
    Unbound,

    /// The bound key has no target and lenient fallback is disabled.
    #[error("no target registered for routing key `{0}`")]
    UnknownKey(RoutingKey),

    /// A key was inserted twice.
    #[error("target already registered for routing key `{0}`")]
    DuplicateKey(RoutingKey),
}

/// Maps routing keys to physical targets.
///
/// | bound key          | result                                        |
/// |--------------------|-----------------------------------------------|
/// | none               | default target, else [`TargetError::Unbound`] |
/// | key with a target  | that target                                   |
/// | key without target | default if lenient, else [`TargetError::UnknownKey`] |
#[derive(Debug)]
pub struct TargetMap<S> {
    targets: HashMap<RoutingKey, S>,
    default: Option<S>,
    lenient: bool,
}

impl<S> TargetMap<S> {
    /// Start building a map.
    pub fn builder() -> TargetMapBuilder<S> {
        TargetMapBuilder::default()
    }

    /// The target for the key bound in `ctx`.
    pub fn select(&self, ctx: &RoutingContext) -> Result<&S, TargetError> {
        let Some(key) = ctx.current_key() else {
            return self.default.as_ref().ok_or(TargetError::Unbound);
        };

        if let Some(target) = self.targets.get(&key) {
            return Ok(target);
        }
        match &self.default {
            Some(default) if self.lenient => {
                tracing::debug!(%key, "no target for routing key, using default");
                Ok(default)
            }
            _ => Err(TargetError::UnknownKey(key)),
        }
    }

    /// The target registered for `key`, ignoring the default.
    pub fn get(&self, key: &str) -> Option<&S> {
        self.targets.get(key)
    }

    /// The default target.
    pub fn default_target(&self) -> Option<&S> {
        self.default.as_ref()
    }

    /// Registered keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &RoutingKey> {
        self.targets.keys()
    }

    /// Number of keyed targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether no keyed target is registered.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Builder for [`TargetMap`].
#[derive(Debug)]
pub struct TargetMapBuilder<S> {
    targets: HashMap<RoutingKey, S>,
    default: Option<S>,
    lenient: bool,
    allow_duplicates: bool,
}

impl<S> Default for TargetMapBuilder<S> {
    fn default() -> Self {
        Self {
            targets: HashMap::new(),
            default: None,
            lenient: true,
            allow_duplicates: false,
        }
    }
}

impl<S> TargetMapBuilder<S> {
    /// Allow duplicate keys (later insertions override earlier ones).
    pub fn allow_duplicates(mut self) -> Self {
        self.allow_duplicates = true;
        self
    }

    /// Target used when no key is bound, and for unknown keys when lenient.
    pub fn default_target(mut self, target: S) -> Self {
        self.default = Some(target);
        self
    }

    /// Whether unknown keys fall back to the default target (default `true`).
    pub fn lenient_fallback(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Register `target` for `key`.
    pub fn insert(&mut self, key: impl Into<RoutingKey>, target: S) -> Result<(), TargetError> {
        let key = key.into();
        if !self.allow_duplicates && self.targets.contains_key(&key) {
            return Err(TargetError::DuplicateKey(key));
        }
        self.targets.insert(key, target);
        Ok(())
    }

    /// Build the map.
    pub fn build(self) -> TargetMap<S> {
        TargetMap {
            targets: self.targets,
            default: self.default,
            lenient: self.lenient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TargetError, TargetMap};
    use dsrouter_core::{RoutingContext, RoutingKey};

    fn targets(lenient: bool) -> TargetMap<&'static str> {
        let mut builder = TargetMap::builder()
            .default_target("primary")
            .lenient_fallback(lenient);
        builder.insert("east", "db-east:5432").unwrap();
        builder.insert("west", "db-west:5432").unwrap();
        builder.build()
    }

    #[test]
    fn test_select_bound_key() {
        let map = targets(true);
        let ctx = RoutingContext::new();
        let _guard = ctx.bind(&RoutingKey::from("west")).unwrap();

        assert_eq!(map.select(&ctx), Ok(&"db-west:5432"));
    }

    #[test]
    fn test_unbound_uses_default() {
        let map = targets(false);
        assert_eq!(map.select(&RoutingContext::new()), Ok(&"primary"));

        let empty: TargetMap<&str> = TargetMap::builder().build();
        assert_eq!(empty.select(&RoutingContext::new()), Err(TargetError::Unbound));
    }

    #[test]
    fn test_unknown_key_lenient_and_strict() {
        let ctx = RoutingContext::new();
        let _guard = ctx.bind(&RoutingKey::from("north")).unwrap();

        assert_eq!(targets(true).select(&ctx), Ok(&"primary"));
        assert_eq!(
            targets(false).select(&ctx),
            Err(TargetError::UnknownKey("north".into()))
        );
    }

    #[test]
    fn test_duplicate_key_error() {
        let mut builder = TargetMap::builder();
        builder.insert("east", 1).unwrap();
        assert_eq!(
            builder.insert("east", 2),
            Err(TargetError::DuplicateKey("east".into()))
        );

        let mut builder = TargetMap::builder().allow_duplicates();
        builder.insert("east", 1).unwrap();
        builder.insert("east", 2).unwrap();
        assert_eq!(builder.build().get("east"), Some(&2));
    }
}
