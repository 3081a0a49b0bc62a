//! # dsrouter-std
//!
//! Standard implementations for the dsrouter data source routing framework.
//!
//! This crate provides:
//! - **Dispatch**: [`Router`] with single-key, first-non-empty and merge access
//! - **Registry**: [`KeyBuilderRegistry`], the per-router key builder cache
//! - **Concurrency**: [`WorkerPool`], bounded slots for concurrent fan-out
//! - **Target selection**: [`TargetMap`]
//! - **Stock builders and wrappers**: [`ShardKeyBuilder`], [`TimeoutWork`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use dsrouter_core;

// Modules
pub mod builders;
pub mod pool;
pub mod registry;
pub mod router;
pub mod targets;
pub mod testing;
pub mod work;

pub use builders::ShardKeyBuilder;
pub use pool::WorkerPool;
pub use registry::{KeyBuilderRegistry, RegistryBuilder};
pub use router::{Execution, Router, RouterBuilder, RouterConfig};
pub use targets::{TargetError, TargetMap, TargetMapBuilder};
pub use work::{TimeoutWork, WorkTimeout};
