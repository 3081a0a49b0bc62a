//! Key builder strategy trait.

use crate::key::RoutingKey;

/// Strategy that turns a parameter into a routing key and enumerates every
/// key it knows about.
///
/// Builders are identified by their Rust type. A router caches one instance
/// per builder type for its whole lifetime, so implementations must not keep
/// per-call state.
///
/// # Example
///
/// ```rust,ignore
/// struct ByTenant;
///
/// impl KeyBuilder for ByTenant {
///     type Param = u64;
///
///     fn derive_key(&self, tenant: &u64) -> Option<RoutingKey> {
///         Some(format!("tenant_db_{}", tenant % 2).into())
///     }
///
///     fn all_keys(&self) -> Vec<RoutingKey> {
///         vec!["tenant_db_0".into(), "tenant_db_1".into()]
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `KeyBuilder`",
    label = "missing `KeyBuilder` implementation",
    note = "Key builders must implement `derive_key` and `all_keys`."
)]
pub trait KeyBuilder: Send + Sync + 'static {
    /// Input accepted by [`KeyBuilder::derive_key`].
    type Param: ?Sized;

    /// Derive the routing key for `param`, or `None` if it maps to no source.
    fn derive_key(&self, param: &Self::Param) -> Option<RoutingKey>;

    /// Every key this builder can produce, in fan-out order.
    fn all_keys(&self) -> Vec<RoutingKey>;
}
