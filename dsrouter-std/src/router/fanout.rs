//! Fan-out over every key a builder knows.
//!
//! Both policies pick their strategy from the router: serial on the caller's
//! context, or one pooled task per key with a fresh context.
//!
//! - **First non-empty** consumes pooled results in completion order and
//!   returns on the first non-empty one. The remaining tasks are detached,
//!   not cancelled; whatever they produce is discarded.
//! - **Merge** awaits pooled results in key order so the merged list always
//!   follows `B::all_keys()`.
//!
//! Any failure aborts the call; there is no fallback to the remaining keys and
//! no partial result.

use super::{Router, run_bound};
use crate::pool::WorkerPool;
use dsrouter_core::{
    DispatchError, KeyBuilder, MergeInto, Presence, RouterError, RoutingContext, RoutingKey, Work,
};
use futures::{
    FutureExt, StreamExt,
    future::try_join_all,
    stream::FuturesUnordered,
};
use std::{any::type_name, sync::Arc};
use tokio::task::{JoinError, JoinHandle};

impl Router {
    /// Run `work` for each of `B`'s keys and return the first non-empty
    /// result, or `None` if every key yields an empty result.
    ///
    /// Serial fan-out stops at the first non-empty result; later keys are
    /// never visited. Concurrent fan-out returns the first non-empty result
    /// to *complete*.
    ///
    /// # Bounds
    ///
    /// Whether the work is spawned onto the worker pool is decided at run
    /// time, so `work` and its result must be `'static` even on a serial
    /// router. Share caller state through owned values such as an `Arc`
    /// moved into the closure rather than borrowed locals.
    pub async fn access_any_result<B, R, W>(
        &self,
        ctx: &RoutingContext,
        work: W,
    ) -> Result<Option<R::Found>, RouterError>
    where
        B: KeyBuilder,
        R: Presence + Send + 'static,
        W: Work<R> + 'static,
    {
        let keys = self.registry().resolve::<B>()?.all_keys();
        tracing::debug!(
            builder = type_name::<B>(),
            keys = keys.len(),
            execution = %self.execution(),
            "probing sources for a non-empty result"
        );

        match self.worker_pool() {
            None => first_found_serial(ctx, keys, &work).await,
            Some(pool) => first_found_concurrent(pool, keys, Arc::new(work)).await,
        }
    }

    /// Run `work` for every one of `B`'s keys and merge the results.
    ///
    /// The merged list follows the order of `B::all_keys()` in both
    /// execution modes, with list results flattened in place.
    ///
    /// `work` and its result must be `'static` for the same reason as in
    /// [`Router::access_any_result`].
    pub async fn access_all_merged<B, R, W>(
        &self,
        ctx: &RoutingContext,
        work: W,
    ) -> Result<Vec<R::Item>, RouterError>
    where
        B: KeyBuilder,
        R: MergeInto + Send + 'static,
        W: Work<R> + 'static,
    {
        let keys = self.registry().resolve::<B>()?.all_keys();
        tracing::debug!(
            builder = type_name::<B>(),
            keys = keys.len(),
            execution = %self.execution(),
            "merging results from all sources"
        );

        let results = match self.worker_pool() {
            None => {
                let mut results = Vec::with_capacity(keys.len());
                for key in keys {
                    results.push(run_bound(ctx, key, &work).await?);
                }
                results
            }
            Some(pool) => all_concurrent(pool, keys, Arc::new(work)).await?,
        };

        let mut merged = Vec::new();
        for result in results {
            result.merge_into(&mut merged);
        }
        Ok(merged)
    }
}

async fn first_found_serial<R, W>(
    ctx: &RoutingContext,
    keys: Vec<RoutingKey>,
    work: &W,
) -> Result<Option<R::Found>, RouterError>
where
    R: Presence,
    W: Work<R>,
{
    for key in keys {
        if let Some(found) = run_bound(ctx, key, work).await?.into_found() {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

async fn first_found_concurrent<R, W>(
    pool: &WorkerPool,
    keys: Vec<RoutingKey>,
    work: Arc<W>,
) -> Result<Option<R::Found>, RouterError>
where
    R: Presence + Send + 'static,
    W: Work<R> + 'static,
{
    let mut pending = FuturesUnordered::new();
    for key in keys {
        let handle = spawn_keyed(pool, key.clone(), Arc::clone(&work))?;
        pending.push(handle.map(move |joined| flatten_join(key, joined)));
    }

    while let Some(result) = pending.next().await {
        if let Some(found) = result?.into_found() {
            if !pending.is_empty() {
                tracing::debug!(
                    detached = pending.len(),
                    "non-empty result found, leaving remaining sources to finish"
                );
            }
            return Ok(Some(found));
        }
    }
    Ok(None)
}

async fn all_concurrent<R, W>(
    pool: &WorkerPool,
    keys: Vec<RoutingKey>,
    work: Arc<W>,
) -> Result<Vec<R>, RouterError>
where
    R: Send + 'static,
    W: Work<R> + 'static,
{
    let mut handles = Vec::with_capacity(keys.len());
    for key in keys {
        let handle = spawn_keyed(pool, key.clone(), Arc::clone(&work))?;
        handles.push(handle.map(move |joined| flatten_join(key, joined)));
    }

    // Key order, not completion order.
    try_join_all(handles).await
}

/// Spawn `work` under `key` as its own execution unit.
fn spawn_keyed<R, W>(
    pool: &WorkerPool,
    key: RoutingKey,
    work: Arc<W>,
) -> Result<JoinHandle<Result<R, RouterError>>, RouterError>
where
    R: Send + 'static,
    W: Work<R> + 'static,
{
    let handle = pool.spawn(async move {
        let ctx = RoutingContext::new();
        run_bound(&ctx, key, &*work).await
    })?;
    Ok(handle)
}

fn flatten_join<R>(
    key: RoutingKey,
    joined: Result<Result<R, RouterError>, JoinError>,
) -> Result<R, RouterError> {
    match joined {
        Ok(result) => result,
        Err(err) if err.is_panic() => {
            let payload = err.into_panic();
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_owned());
            tracing::warn!(%key, %message, "pooled unit of work panicked");
            Err(DispatchError::Panicked { key, message }.into())
        }
        Err(err) => Err(DispatchError::Unavailable(err.to_string()).into()),
    }
}
