//! Error types for dsrouter.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`RouterError`] - Top-level error type for every routed operation
//! - [`DispatchError`] - Failures of a unit of work or of a background task

use crate::key::RoutingKey;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all routed operations.
#[derive(Error, Debug)]
pub enum RouterError {
    /// A single-key access was requested but no usable key was resolved.
    #[error("routing key is required but none was resolved")]
    MissingKey,

    /// A nested routed call tried to bind a different key than the active one.
    #[error("routing key `{active}` is already bound, refusing to bind `{requested}`")]
    Conflict {
        /// The key bound in the current execution context.
        active: RoutingKey,
        /// The key the nested call asked for.
        requested: RoutingKey,
    },

    /// A key builder could not be constructed.
    #[error("failed to instantiate key builder `{builder}`")]
    BuilderInstantiation {
        /// Type name of the key builder.
        builder: &'static str,
        /// Why construction failed.
        #[source]
        source: BoxError,
    },

    /// The unit of work or a background task failed.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

impl RouterError {
    /// Whether this error is a [`RouterError::Conflict`].
    pub fn is_conflict(&self) -> bool {
        matches!(self, RouterError::Conflict { .. })
    }

    /// Whether this error wraps a [`DispatchError`].
    pub fn is_dispatch(&self) -> bool {
        matches!(self, RouterError::Dispatch(_))
    }
}

/// Errors raised while running a unit of work under a routing key.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The unit of work returned an error.
    #[error("unit of work failed under key `{key}`")]
    Work {
        /// Key the work was running under.
        key: RoutingKey,
        /// The error returned by the work.
        #[source]
        source: BoxError,
    },

    /// A pooled unit of work panicked.
    #[error("unit of work panicked under key `{key}`: {message}")]
    Panicked {
        /// Key the work was running under.
        key: RoutingKey,
        /// Panic payload rendered as text.
        message: String,
    },

    /// The worker pool could not run the task.
    #[error("worker pool unavailable: {0}")]
    Unavailable(String),
}

impl DispatchError {
    /// The routing key the failure happened under, if known.
    pub fn key(&self) -> Option<&RoutingKey> {
        match self {
            DispatchError::Work { key, .. } | DispatchError::Panicked { key, .. } => Some(key),
            DispatchError::Unavailable(_) => None,
        }
    }
}
