//! Priority-ordered storage for registered event sets.
//!
//! `list_event_sets` hands the resolver a pre-sorted slice: descending
//! priority, registration order for ties. The resolver never re-sorts.

use crate::Result;
use crate::sets::EventSet;

use anyhow::bail;
use std::sync::{Arc, RwLock};

/// Handle shared between registration code and resolvers. Guarded so sets
/// can be registered (or hot-reloaded) after resolvers exist.
pub type SharedRegistry = Arc<RwLock<Registry>>;

#[derive(Debug, Default)]
pub struct Registry {
    /// Kept sorted: descending priority, stable for equal priorities.
    sets: Vec<EventSet>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedRegistry {
        Arc::new(RwLock::new(self))
    }

    /// Register an event set. Set names are unique; registering a second
    /// set under an existing name is an error (hot reload goes through
    /// `clear` + re-register).
    pub fn register(&mut self, set: EventSet) -> Result<()> {
        if self.sets.iter().any(|s| s.name == set.name) {
            bail!("event set '{}' is already registered", set.name);
        }

        // Insert before the first strictly-lower priority, so equal
        // priorities keep registration order.
        let pos = self
            .sets
            .iter()
            .position(|s| s.priority < set.priority)
            .unwrap_or(self.sets.len());
        self.sets.insert(pos, set);
        Ok(())
    }

    pub fn register_all(&mut self, sets: Vec<EventSet>) -> Result<()> {
        for set in sets {
            self.register(set)?;
        }
        Ok(())
    }

    /// All registered sets, ordered by descending priority.
    pub fn list_event_sets(&self) -> &[EventSet] {
        &self.sets
    }

    pub fn clear(&mut self) {
        self.sets.clear();
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
