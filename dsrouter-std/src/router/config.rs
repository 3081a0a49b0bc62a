//! Router configuration and construction.

use super::Router;
use crate::registry::{KeyBuilderRegistry, RegistryBuilder};
use dsrouter_core::{BoxError, KeyBuilder};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Router settings.
///
/// `concurrent_workers == 0` disables the worker pool and makes every
/// fan-out serial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RouterConfig {
    /// Number of worker pool slots used by concurrent fan-out.
    pub concurrent_workers: usize,
}

impl RouterConfig {
    /// Serial-only configuration.
    pub const fn serial() -> Self {
        Self {
            concurrent_workers: 0,
        }
    }

    /// Configuration with a worker pool of `workers` slots.
    pub const fn concurrent(workers: usize) -> Self {
        Self {
            concurrent_workers: workers,
        }
    }

    /// Whether this configuration enables the worker pool.
    pub const fn is_concurrent(&self) -> bool {
        self.concurrent_workers > 0
    }
}

/// Builder for [`Router`].
#[derive(Default)]
pub struct RouterBuilder {
    config: RouterConfig,
    registry: RegistryBuilder,
}

impl RouterBuilder {
    /// Create a builder for a serial router with no key builders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the configuration.
    pub fn config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the worker pool size; `0` means serial fan-out.
    pub fn concurrent_workers(mut self, workers: usize) -> Self {
        self.config.concurrent_workers = workers;
        self
    }

    /// Register key builder `B` with a fallible factory.
    pub fn register<B, F, E>(mut self, factory: F) -> Self
    where
        B: KeyBuilder,
        F: Fn() -> Result<B, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.registry = self.registry.register(factory);
        self
    }

    /// Register key builder `B`, constructed through [`Default`].
    pub fn register_default<B: KeyBuilder + Default>(mut self) -> Self {
        self.registry = self.registry.register_default::<B>();
        self
    }

    /// Register an already constructed key builder.
    pub fn register_instance<B: KeyBuilder>(mut self, builder: B) -> Self {
        self.registry = self.registry.register_instance(builder);
        self
    }

    /// Build the router.
    pub fn build(self) -> Router {
        let registry: KeyBuilderRegistry = self.registry.build();
        Router::from_config(&self.config, registry)
    }
}

#[cfg(test)]
mod tests {
    use super::{RouterBuilder, RouterConfig};
    use crate::router::Execution;

    #[test]
    fn test_default_config_is_serial() {
        let config = RouterConfig::default();
        assert_eq!(config, RouterConfig::serial());
        assert!(!config.is_concurrent());
        assert!(RouterConfig::concurrent(4).is_concurrent());
    }

    #[test]
    fn test_builder_applies_pool_size() {
        let router = RouterBuilder::new().concurrent_workers(3).build();
        assert_eq!(router.execution(), Execution::Concurrent);
        assert_eq!(router.worker_pool().map(|pool| pool.size()), Some(3));

        let router = RouterBuilder::new()
            .config(RouterConfig::concurrent(2))
            .concurrent_workers(0)
            .build();
        assert!(!router.is_concurrent());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_from_json() {
        let config: RouterConfig = serde_json::from_str(r#"{"concurrent_workers": 8}"#).unwrap();
        assert_eq!(config, RouterConfig::concurrent(8));

        let config: RouterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RouterConfig::serial());
    }
}
