//! # Unit of Work
//!
//! The caller-supplied computation a router runs under a routing key.
//!
//! A unit of work receives the [`RoutingContext`] of the execution unit it
//! runs in. Passing that handle on is how nested routed calls re-enter the
//! same binding and how target selection learns the active key.
//!
//! # Usage Patterns
//!
//! 1. **Direct closure**: `|ctx: RoutingContext| async move { ... }`
//! 2. **Struct implementation**: `impl Work<Rows> for LoadOrders`

use crate::{context::RoutingContext, error::BoxError};
use std::future::Future;

/// A unit of work executed under a routing key.
///
/// A fan-out calls the same work once per key, so `run` takes `&self`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be routed as a unit of work producing `{T}`",
    label = "missing `Work<{T}>` implementation",
    note = "Use a closure taking a `RoutingContext` and returning a future of `Result<{T}, E>`."
)]
pub trait Work<T>: Send + Sync {
    /// Error returned by the work; surfaced as a dispatch error.
    type Error: Into<BoxError>;

    /// Run once under the binding held by `ctx`.
    fn run(&self, ctx: RoutingContext) -> impl Future<Output = Result<T, Self::Error>> + Send;
}

// Blanket impl for closures
impl<F, Fut, T, E> Work<T> for F
where
    F: Fn(RoutingContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, E>> + Send,
    E: Into<BoxError>,
{
    type Error = E;

    fn run(&self, ctx: RoutingContext) -> impl Future<Output = Result<T, Self::Error>> + Send {
        (self)(ctx)
    }
}
