//! # dsrouter-core
//!
//! Core traits for the dsrouter data source routing framework.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! key builder implementations and target selectors that don't need the full
//! `dsrouter-std` router.
//!
//! # Building Blocks
//!
//! ## Routing Context ([`RoutingContext`])
//!
//! Per execution unit storage for the active [`RoutingKey`]. Binding is
//! scoped through a [`BindGuard`]: the same key re-enters, a different key
//! conflicts, and the key is always released when the guard drops.
//!
//! ## Key Builders ([`KeyBuilder`])
//!
//! Strategies that derive a key from a parameter and enumerate every known
//! key for fan-out.
//!
//! ## Units of Work ([`Work`])
//!
//! The caller's computation, run once per routed key. Closures taking a
//! [`RoutingContext`] implement it automatically.
//!
//! ## Outcomes ([`Presence`], [`MergeInto`])
//!
//! How fan-out operations interpret per-key results: "is this answer
//! non-empty?" and "how is it appended to a merged list?".
//!
//! # Error Types
//!
//! - [`RouterError`] - Top-level error type
//! - [`DispatchError`] - Work and background task failures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod context;
mod error;
mod key;
mod key_builder;
mod outcome;
mod work;

// Re-exports
pub use context::{BindGuard, RoutingContext};
pub use error::{BoxError, DispatchError, RouterError};
pub use key::RoutingKey;
pub use key_builder::KeyBuilder;
pub use outcome::{MergeInto, Outcome, Presence};
pub use work::Work;
