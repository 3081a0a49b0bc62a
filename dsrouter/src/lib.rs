//! # dsrouter - Data Source Routing
//!
//! `dsrouter` runs a unit of work against one of several logical data
//! sources, chosen at call time by a routing key. Calling code never names
//! the physical source; whatever opens connections reads the key bound in the
//! current [`RoutingContext`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dsrouter::prelude::*;
//!
//! let router = Router::builder()
//!     .concurrent_workers(4)
//!     .register_instance(ShardKeyBuilder::new("user_db_", 8))
//!     .build();
//!
//! let ctx = RoutingContext::new();
//!
//! // One source, chosen from a parameter.
//! let profile = router
//!     .access_by_param::<ShardKeyBuilder, _, _>(&ctx, user_id, |ctx: RoutingContext| async move {
//!         load_profile(&ctx).await
//!     })
//!     .await?;
//!
//! // Every source, merged in key order.
//! let sessions = router
//!     .access_all_merged::<ShardKeyBuilder, _, _>(&ctx, |ctx: RoutingContext| async move {
//!         list_sessions(&ctx).await
//!     })
//!     .await?;
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use dsrouter_core::{
    // Context
    BindGuard,
    // Error types
    BoxError,
    DispatchError,
    // Key builders
    KeyBuilder,
    // Outcomes
    MergeInto,
    Outcome,
    Presence,
    RouterError,
    RoutingContext,
    RoutingKey,
    // Work
    Work,
};

pub use dsrouter_std::{
    // Dispatch
    Execution,
    // Registry
    KeyBuilderRegistry,
    RegistryBuilder,
    Router,
    RouterBuilder,
    RouterConfig,
    // Stock builders
    ShardKeyBuilder,
    // Targets
    TargetError,
    TargetMap,
    TargetMapBuilder,
    // Work wrappers
    TimeoutWork,
    WorkTimeout,
    // Concurrency
    WorkerPool,
};

/// Testing utilities.
pub mod testing {
    pub use dsrouter_std::testing::{CountingFactory, FixedKeys, KeyRecorder};
}

/// Prelude module - common imports for dsrouter.
///
/// # Usage
///
/// ```rust,ignore
/// use dsrouter::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BoxError, DispatchError, KeyBuilder, MergeInto, Outcome, Presence, Router, RouterConfig,
        RouterError, RoutingContext, RoutingKey, ShardKeyBuilder, TargetMap, TimeoutWork, Work,
    };
}
