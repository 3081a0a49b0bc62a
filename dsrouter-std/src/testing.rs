//! Testing utilities for dsrouter.
//!
//! This module provides utilities to make testing routed code easier.
//!
//! # Features
//!
//! - [`FixedKeys`]: A key builder over a fixed, ordered key list
//! - [`KeyRecorder`]: Records the key active in each unit of work it observes
//! - [`CountingFactory`]: Wraps key builder factories and counts constructions

use dsrouter_core::{BoxError, KeyBuilder, RoutingContext, RoutingKey};
use std::{
    convert::Infallible,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};

// ============================================================================
// Fixed Keys
// ============================================================================

/// A key builder over a fixed, ordered list of keys.
///
/// `derive_key` returns its parameter when it is one of the known keys.
///
/// # Example
///
/// ```rust,ignore
/// let router = Router::builder()
///     .register_instance(FixedKeys::new(["east", "west"]))
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixedKeys {
    keys: Vec<RoutingKey>,
}

impl FixedKeys {
    /// Create a builder over `keys`, kept in the given order.
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<RoutingKey>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

impl KeyBuilder for FixedKeys {
    type Param = str;

    fn derive_key(&self, param: &str) -> Option<RoutingKey> {
        self.keys.iter().find(|key| *key == param).cloned()
    }

    fn all_keys(&self) -> Vec<RoutingKey> {
        self.keys.clone()
    }
}

// ============================================================================
// Key Recorder
// ============================================================================

/// Records which key was active each time a unit of work ran.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = KeyRecorder::new();
/// let probe = recorder.clone();
///
/// router
///     .access_all_merged::<FixedKeys, _, _>(&ctx, move |ctx: RoutingContext| {
///         probe.record(&ctx);
///         async { Ok::<_, BoxError>(None::<u8>) }
///     })
///     .await?;
///
/// assert_eq!(recorder.keys().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeyRecorder {
    keys: Arc<Mutex<Vec<RoutingKey>>>,
}

impl KeyRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the key active in `ctx` and return it.
    ///
    /// An unbound context is recorded as the empty key.
    pub fn record(&self, ctx: &RoutingContext) -> RoutingKey {
        let key = ctx.current_key().unwrap_or_else(|| RoutingKey::from(""));
        self.lock().push(key.clone());
        key
    }

    /// Keys recorded so far, in recording order.
    pub fn keys(&self) -> Vec<RoutingKey> {
        self.lock().clone()
    }

    /// Number of recorded runs.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Forget every recorded key.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<RoutingKey>> {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// Counting Factory
// ============================================================================

/// Counts how often key builder factories run.
///
/// # Example
///
/// ```rust,ignore
/// let counter = CountingFactory::new();
/// let registry = KeyBuilderRegistry::builder()
///     .register(counter.factory(FixedKeys::default))
///     .build();
///
/// registry.resolve::<FixedKeys>()?;
/// registry.resolve::<FixedKeys>()?;
/// assert_eq!(counter.count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CountingFactory {
    count: Arc<AtomicUsize>,
}

impl CountingFactory {
    /// Create a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of factory runs so far.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// A factory building `B` with `make`, counting each run.
    pub fn factory<B, F>(
        &self,
        make: F,
    ) -> impl Fn() -> Result<B, Infallible> + Send + Sync + use<B, F>
    where
        B: 'static,
        F: Fn() -> B + Send + Sync + 'static,
    {
        let count = Arc::clone(&self.count);
        move || {
            count.fetch_add(1, Ordering::SeqCst);
            Ok(make())
        }
    }

    /// A factory that always fails with `reason`, counting each run.
    pub fn failing<B: 'static>(
        &self,
        reason: &'static str,
    ) -> impl Fn() -> Result<B, BoxError> + Send + Sync + use<B> {
        let count = Arc::clone(&self.count);
        move || {
            count.fetch_add(1, Ordering::SeqCst);
            Err(reason.into())
        }
    }
}
