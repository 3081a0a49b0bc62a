//! Routing keys.

use std::{borrow::Borrow, fmt, sync::Arc};

/// Identifier of a logical data source.
///
/// Keys are opaque to the router and cheap to clone. An empty key is treated
/// as "no key" by every routed operation.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoutingKey(Arc<str>);

impl RoutingKey {
    /// Create a key from any string-like value.
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key is empty (and therefore unusable for routing).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for RoutingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for RoutingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoutingKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for RoutingKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

impl From<&String> for RoutingKey {
    fn from(key: &String) -> Self {
        Self::new(key.as_str())
    }
}

impl From<&RoutingKey> for RoutingKey {
    fn from(key: &RoutingKey) -> Self {
        key.clone()
    }
}

impl AsRef<str> for RoutingKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RoutingKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for RoutingKey {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for RoutingKey {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}
