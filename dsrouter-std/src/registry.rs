//! Key builder registry.
//!
//! Builders are registered by type at startup through [`RegistryBuilder`] and
//! instantiated lazily on first [`KeyBuilderRegistry::resolve`]. The cached
//! instance lives as long as the registry.

use dsrouter_core::{BoxError, KeyBuilder, RouterError};
use std::{
    any::{Any, TypeId, type_name},
    collections::HashMap,
    fmt,
    sync::{Arc, OnceLock},
};

type Instance = Arc<dyn Any + Send + Sync>;
type Factory = Box<dyn Fn() -> Result<Instance, BoxError> + Send + Sync>;

struct Slot {
    name: &'static str,
    factory: Option<Factory>,
    instance: OnceLock<Instance>,
}

/// A registry of key builders keyed by builder type.
pub struct KeyBuilderRegistry {
    slots: HashMap<TypeId, Slot>,
}

impl KeyBuilderRegistry {
    /// Start registering builders.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Return the cached `B`, constructing it on first request.
    ///
    /// Concurrent first requests may each run the factory, but only one
    /// instance is stored and every caller receives that one.
    pub fn resolve<B: KeyBuilder>(&self) -> Result<Arc<B>, RouterError> {
        let slot = self
            .slots
            .get(&TypeId::of::<B>())
            .ok_or_else(|| RouterError::BuilderInstantiation {
                builder: type_name::<B>(),
                source: "key builder is not registered".into(),
            })?;

        let instance = match slot.instance.get() {
            Some(instance) => Arc::clone(instance),
            None => {
                let built = slot.construct()?;
                Arc::clone(slot.instance.get_or_init(|| built))
            }
        };

        instance
            .downcast::<B>()
            .map_err(|_| RouterError::BuilderInstantiation {
                builder: slot.name,
                source: "registered instance has a different type".into(),
            })
    }

    /// Whether `B` has been registered.
    pub fn contains<B: KeyBuilder>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<B>())
    }

    /// Whether an instance of `B` has been constructed and cached.
    pub fn is_cached<B: KeyBuilder>(&self) -> bool {
        self.slots
            .get(&TypeId::of::<B>())
            .is_some_and(|slot| slot.instance.get().is_some())
    }

    /// Number of registered builder types.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no builder type is registered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for KeyBuilderRegistry {
    fn default() -> Self {
        RegistryBuilder::new().build()
    }
}

impl fmt::Debug for KeyBuilderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.slots.values().map(|slot| slot.name))
            .finish()
    }
}

impl Slot {
    fn construct(&self) -> Result<Instance, RouterError> {
        let factory = self
            .factory
            .as_ref()
            .ok_or_else(|| RouterError::BuilderInstantiation {
                builder: self.name,
                source: "no factory registered".into(),
            })?;

        let instance = factory().map_err(|source| RouterError::BuilderInstantiation {
            builder: self.name,
            source,
        })?;
        tracing::trace!(builder = self.name, "key builder constructed");
        Ok(instance)
    }
}

/// Builder for constructing a [`KeyBuilderRegistry`].
///
/// Registering the same builder type twice keeps the later registration.
pub struct RegistryBuilder {
    slots: HashMap<TypeId, Slot>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    /// Create a new empty registry builder.
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Register `B` with a fallible factory, run on first resolve.
    pub fn register<B, F, E>(mut self, factory: F) -> Self
    where
        B: KeyBuilder,
        F: Fn() -> Result<B, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        let factory: Factory = Box::new(move || {
            factory()
                .map(|builder| Arc::new(builder) as Instance)
                .map_err(Into::into)
        });
        self.slots.insert(
            TypeId::of::<B>(),
            Slot {
                name: type_name::<B>(),
                factory: Some(factory),
                instance: OnceLock::new(),
            },
        );
        self
    }

    /// Register `B`, constructed through [`Default`] on first resolve.
    pub fn register_default<B: KeyBuilder + Default>(self) -> Self {
        self.register(|| Ok::<B, std::convert::Infallible>(B::default()))
    }

    /// Register an already constructed builder.
    pub fn register_instance<B: KeyBuilder>(mut self, builder: B) -> Self {
        self.slots.insert(
            TypeId::of::<B>(),
            Slot {
                name: type_name::<B>(),
                factory: None,
                instance: OnceLock::from(Arc::new(builder) as Instance),
            },
        );
        self
    }

    /// Build the registry.
    pub fn build(self) -> KeyBuilderRegistry {
        KeyBuilderRegistry { slots: self.slots }
    }
}
