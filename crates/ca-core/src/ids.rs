//! Identifier generation

use serde::{Deserialize, Serialize};

/// Identifier shared by every entity kind
pub type EntityId = u64;

/// Monotonic id source
///
/// Ids are never recycled: deleting an entity does not return its id to the
/// generator, and every collection draws from the same counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdGenerator {
    next: EntityId,
}

impl IdGenerator {
    /// Create a generator whose first id is 1
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Create a generator that starts after `highest`
    pub fn starting_after(highest: EntityId) -> Self {
        Self {
            next: highest.saturating_add(1),
        }
    }

    /// Hand out the next id
    pub fn next_id(&mut self) -> EntityId {
        let id = self.next;
        self.next += 1;
        id
    }

}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
