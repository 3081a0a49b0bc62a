//! Timeout wrapper for time-limited units of work.

use dsrouter_core::{BoxError, RoutingContext, Work};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

/// Error returned when a unit of work exceeds its time limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unit of work timed out after {0:?}")]
pub struct WorkTimeout(pub Duration);

/// A unit of work wrapped with a time limit.
///
/// Routed operations have no built-in timeout; wrap the work to bound its
/// latency. On timeout the inner future is dropped, which also releases the
/// routing key it was bound under.
pub struct TimeoutWork<W> {
    inner: W,
    duration: Duration,
}

impl<W> TimeoutWork<W> {
    /// Wrap `inner` with a time limit of `duration`.
    pub fn new(inner: W, duration: Duration) -> Self {
        Self { inner, duration }
    }

    /// The configured time limit.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl<T, W> Work<T> for TimeoutWork<W>
where
    W: Work<T>,
{
    type Error = BoxError;

    async fn run(&self, ctx: RoutingContext) -> Result<T, BoxError> {
        match timeout(self.duration, self.inner.run(ctx)).await {
            Ok(result) => result.map_err(Into::into),
            Err(_) => Err(Box::new(WorkTimeout(self.duration))),
        }
    }
}
