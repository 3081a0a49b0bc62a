//! # Routing Context
//!
//! Execution-unit scoped storage for the active routing key.
//!
//! A [`RoutingContext`] is a handle to exactly one execution unit's slot.
//! Cloning the handle passes the *same* slot further down the call chain,
//! which is how nested routed calls and the component selecting a physical
//! target observe the active key. A fresh unit (e.g. a pooled task) starts
//! from [`RoutingContext::new`].
//!
//! # Binding Rules
//!
//! | slot        | `bind(k)`                                  |
//! |-------------|--------------------------------------------|
//! | empty       | binds `k` with one holder                  |
//! | holds `k`   | reentrant guard, adds a holder             |
//! | holds `j`   | [`RouterError::Conflict`]                  |
//!
//! Every [`BindGuard`] removes its holder on drop and the slot is cleared
//! when the last holder goes, so overlapping same-key calls on one context
//! keep the key until all of them finish. Unwinding and cancelled futures
//! release just like a normal return.

use crate::{error::RouterError, key::RoutingKey};
use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// Handle to one execution unit's routing slot.
#[derive(Clone, Default)]
pub struct RoutingContext {
    slot: Arc<Mutex<Option<Binding>>>,
}

/// The bound key and the number of live guards holding it.
#[derive(Debug)]
struct Binding {
    key: RoutingKey,
    holders: usize,
}

impl RoutingContext {
    /// Create a context for a new execution unit with no key bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// The key bound in this execution unit, if any.
    pub fn current_key(&self) -> Option<RoutingKey> {
        self.lock().as_ref().map(|binding| binding.key.clone())
    }

    /// Whether a key is currently bound.
    pub fn is_bound(&self) -> bool {
        self.lock().is_some()
    }

    /// Bind `key` for the lifetime of the returned guard.
    ///
    /// Binding the key that is already active returns a reentrant guard;
    /// the key stays bound until every guard holding it has dropped. Binding
    /// any other key while one is active fails with
    /// [`RouterError::Conflict`]; the active key is never overridden.
    pub fn bind(&self, key: &RoutingKey) -> Result<BindGuard, RouterError> {
        let mut slot = self.lock();
        let reentrant = match slot.as_mut() {
            Some(binding) if binding.key == *key => {
                binding.holders += 1;
                true
            }
            Some(binding) => {
                return Err(RouterError::Conflict {
                    active: binding.key.clone(),
                    requested: key.clone(),
                });
            }
            None => {
                *slot = Some(Binding {
                    key: key.clone(),
                    holders: 1,
                });
                false
            }
        };
        drop(slot);

        Ok(BindGuard {
            ctx: self.clone(),
            reentrant,
        })
    }

    /// Whether both handles refer to the same execution unit.
    pub fn same_unit(&self, other: &RoutingContext) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }

    fn lock(&self) -> MutexGuard<'_, Option<Binding>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for RoutingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingContext")
            .field("current_key", &self.current_key())
            .finish()
    }
}

/// Scoped binding returned by [`RoutingContext::bind`].
#[must_use = "the routing key is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct BindGuard {
    ctx: RoutingContext,
    reentrant: bool,
}

impl BindGuard {
    /// Whether this guard re-entered an existing binding of the same key.
    pub fn is_reentrant(&self) -> bool {
        self.reentrant
    }
}

impl Drop for BindGuard {
    fn drop(&mut self) {
        let mut slot = self.ctx.lock();
        let released = match slot.as_mut() {
            Some(binding) => {
                binding.holders = binding.holders.saturating_sub(1);
                binding.holders == 0
            }
            None => false,
        };
        if released {
            *slot = None;
        }
    }
}
