//! # Router
//!
//! Runs units of work under routing keys.
//!
//! | operation                      | keys                        | result                       |
//! |--------------------------------|-----------------------------|------------------------------|
//! | [`Router::access_single`]      | the given key               | the work's value             |
//! | [`Router::access_by_param`]    | `B::derive_key(param)`      | the work's value             |
//! | [`Router::access_any_result`]  | `B::all_keys()`             | first non-empty value        |
//! | [`Router::access_all_merged`]  | `B::all_keys()`             | every value, merged in order |
//!
//! Fan-out runs serially on the caller's [`RoutingContext`] unless the router
//! has a [`WorkerPool`], in which case every key runs as its own pooled task
//! with a fresh context.

mod config;
mod fanout;

pub use config::{RouterBuilder, RouterConfig};

use crate::{pool::WorkerPool, registry::KeyBuilderRegistry};
use dsrouter_core::{DispatchError, KeyBuilder, RouterError, RoutingContext, RoutingKey, Work};
use std::fmt;
use tracing::Instrument;

/// How fan-out operations execute their per-key work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Execution {
    /// One key after another on the caller's execution unit.
    Serial,
    /// One pooled task per key.
    Concurrent,
}

impl fmt::Display for Execution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Execution::Serial => "serial",
            Execution::Concurrent => "concurrent",
        })
    }
}

/// Dispatches units of work to logical data sources.
///
/// # Example
///
/// ```rust,ignore
/// let router = Router::builder()
///     .concurrent_workers(4)
///     .register_default::<ByTenant>()
///     .build();
///
/// let ctx = RoutingContext::new();
/// let orders = router
///     .access_by_param::<ByTenant, _, _>(&ctx, &tenant_id, |ctx: RoutingContext| async move {
///         load_orders(ctx).await
///     })
///     .await?;
/// ```
#[derive(Debug, Default)]
pub struct Router {
    registry: KeyBuilderRegistry,
    pool: Option<WorkerPool>,
}

impl Router {
    /// A serial router with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start configuring a router.
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Build a router from configuration and an already built registry.
    pub fn from_config(config: &RouterConfig, registry: KeyBuilderRegistry) -> Self {
        Self {
            registry,
            pool: WorkerPool::new(config.concurrent_workers),
        }
    }

    /// The key builder registry.
    pub fn registry(&self) -> &KeyBuilderRegistry {
        &self.registry
    }

    /// The worker pool, if concurrent fan-out is enabled.
    pub fn worker_pool(&self) -> Option<&WorkerPool> {
        self.pool.as_ref()
    }

    /// How fan-out operations execute.
    pub fn execution(&self) -> Execution {
        if self.pool.is_some() {
            Execution::Concurrent
        } else {
            Execution::Serial
        }
    }

    /// Whether fan-out operations run on the worker pool.
    pub fn is_concurrent(&self) -> bool {
        self.execution() == Execution::Concurrent
    }

    /// Run `work` under `key`.
    ///
    /// Fails with [`RouterError::MissingKey`] for an empty key without
    /// running the work, and with [`RouterError::Conflict`] if `ctx` already
    /// has a different key bound. The key is released when the call ends,
    /// whatever the outcome.
    pub async fn access_single<T, W>(
        &self,
        ctx: &RoutingContext,
        key: impl Into<RoutingKey>,
        work: W,
    ) -> Result<T, RouterError>
    where
        W: Work<T>,
    {
        run_bound(ctx, key.into(), &work).await
    }

    /// Run `work` under the key `B` derives from `param`.
    pub async fn access_by_param<B, T, W>(
        &self,
        ctx: &RoutingContext,
        param: &B::Param,
        work: W,
    ) -> Result<T, RouterError>
    where
        B: KeyBuilder,
        W: Work<T>,
    {
        let key = self
            .registry
            .resolve::<B>()?
            .derive_key(param)
            .ok_or(RouterError::MissingKey)?;
        run_bound(ctx, key, &work).await
    }
}

/// Bind `key` on `ctx`, run `work`, release.
pub(crate) async fn run_bound<T, W>(
    ctx: &RoutingContext,
    key: RoutingKey,
    work: &W,
) -> Result<T, RouterError>
where
    W: Work<T>,
{
    if key.is_empty() {
        return Err(RouterError::MissingKey);
    }

    let guard = ctx.bind(&key)?;
    tracing::trace!(%key, reentrant = guard.is_reentrant(), "routing key bound");

    let span = tracing::debug_span!("routed", %key);
    let result = work.run(ctx.clone()).instrument(span).await;

    drop(guard);
    tracing::trace!(%key, "routing key released");

    result.map_err(|source| {
        DispatchError::Work {
            key,
            source: source.into(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::{Execution, Router};
    use crate::testing::{FixedKeys, KeyRecorder};
    use dsrouter_core::{BoxError, DispatchError, RouterError, RoutingContext, RoutingKey};
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    fn router() -> Router {
        Router::builder()
            .register_instance(FixedKeys::new(["east", "west"]))
            .build()
    }

    #[tokio::test]
    async fn test_access_single_binds_key() {
        let router = router();
        let ctx = RoutingContext::new();

        let seen = router
            .access_single(&ctx, "east", |ctx: RoutingContext| async move {
                Ok::<_, BoxError>(ctx.current_key())
            })
            .await
            .unwrap();

        assert_eq!(seen.unwrap(), "east");
        assert!(ctx.current_key().is_none());
        assert_eq!(router.execution(), Execution::Serial);
    }

    #[tokio::test]
    async fn test_access_single_missing_key() {
        let router = router();
        let ctx = RoutingContext::new();
        let calls = AtomicUsize::new(0);

        let result = router
            .access_single(&ctx, "", |_ctx: RoutingContext| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, BoxError>(()) }
            })
            .await;

        assert!(matches!(result, Err(RouterError::MissingKey)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_releases_key() {
        let router = router();
        let ctx = RoutingContext::new();

        let result = router
            .access_single(&ctx, "east", |_ctx: RoutingContext| async {
                Err::<(), BoxError>("disk full".into())
            })
            .await;

        match result {
            Err(RouterError::Dispatch(DispatchError::Work { key, source })) => {
                assert_eq!(key, "east");
                assert_eq!(source.to_string(), "disk full");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(ctx.current_key().is_none());
    }

    #[tokio::test]
    async fn test_access_by_param() {
        let router = router();
        let ctx = RoutingContext::new();
        let recorder = KeyRecorder::new();

        let probe = recorder.clone();
        router
            .access_by_param::<FixedKeys, _, _>(&ctx, "west", move |ctx: RoutingContext| {
                probe.record(&ctx);
                async { Ok::<_, BoxError>(()) }
            })
            .await
            .unwrap();

        assert_eq!(recorder.keys(), [RoutingKey::from("west")]);
    }

    #[tokio::test]
    async fn test_access_by_param_unknown_param() {
        let router = router();
        let ctx = RoutingContext::new();

        let result = router
            .access_by_param::<FixedKeys, _, _>(&ctx, "north", |_ctx: RoutingContext| async {
                Ok::<_, BoxError>(())
            })
            .await;

        assert!(matches!(result, Err(RouterError::MissingKey)));
    }

    #[tokio::test]
    async fn test_nested_calls() {
        let router = Arc::new(router());
        let ctx = RoutingContext::new();

        let inner = Arc::clone(&router);
        let nested = router
            .access_single(&ctx, "east", move |ctx: RoutingContext| {
                let router = Arc::clone(&inner);
                async move {
                    let same = router
                        .access_single(&ctx, "east", |ctx: RoutingContext| async move {
                            Ok::<_, std::convert::Infallible>(ctx.current_key())
                        })
                        .await?;
                    let other = router
                        .access_single(&ctx, "west", |_ctx: RoutingContext| async {
                            Ok::<_, std::convert::Infallible>(())
                        })
                        .await;
                    Ok::<_, BoxError>((same, other.map_err(|e| e.is_conflict())))
                }
            })
            .await
            .unwrap();

        assert_eq!(nested.0.unwrap(), "east");
        assert_eq!(nested.1, Err(true));
        assert!(ctx.current_key().is_none());
    }
}
