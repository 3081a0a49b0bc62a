//! Bounded worker pool for concurrent fan-out.

use dsrouter_core::DispatchError;
use std::{future::Future, sync::Arc};
use tokio::{runtime::Handle, sync::Semaphore, task::JoinHandle};

/// A fixed number of execution slots on the ambient Tokio runtime.
///
/// Every submitted task is spawned immediately but waits for a slot before
/// running, so at most [`WorkerPool::size`] tasks execute at once. Tasks are
/// detached when their [`JoinHandle`] is dropped and never hold up runtime
/// shutdown.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    slots: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    /// Create a pool with `size` slots. Returns `None` for `size == 0`.
    pub fn new(size: usize) -> Option<Self> {
        (size > 0).then(|| Self {
            slots: Arc::new(Semaphore::new(size)),
            size,
        })
    }

    /// Number of slots.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Slots not currently running a task.
    pub fn idle_slots(&self) -> usize {
        self.slots.available_permits()
    }

    /// Submit a task.
    ///
    /// Fails with [`DispatchError::Unavailable`] when called outside a Tokio
    /// runtime.
    pub fn spawn<F>(&self, task: F) -> Result<JoinHandle<F::Output>, DispatchError>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let runtime =
            Handle::try_current().map_err(|err| DispatchError::Unavailable(err.to_string()))?;
        let slots = Arc::clone(&self.slots);

        Ok(runtime.spawn(async move {
            // The semaphore is never closed, so acquisition only waits.
            let _permit = slots.acquire_owned().await;
            task.await
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::WorkerPool;
    use dsrouter_core::DispatchError;
    use std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    #[test]
    fn test_zero_size_means_no_pool() {
        assert!(WorkerPool::new(0).is_none());
        assert_eq!(WorkerPool::new(3).unwrap().size(), 3);
    }

    #[test]
    fn test_spawn_outside_runtime() {
        let pool = WorkerPool::new(1).unwrap();
        let result = pool.spawn(async {});
        assert!(matches!(result, Err(DispatchError::Unavailable(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_pool_bounds_concurrency() {
        let pool = WorkerPool::new(2).unwrap();
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let running = Arc::clone(&running);
                let peak = Arc::clone(&peak);
                pool.spawn(async move {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                })
                .unwrap()
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(pool.idle_slots(), 2);
    }
}
