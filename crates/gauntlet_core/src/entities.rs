//! Arena of combat entities addressed by stable integer handles.
//!
//! Removal is always deferred: systems call [`EntityStore::mark_for_removal`]
//! and the world applies the batch once every system has run.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::components::{ActorId, Combatant, EntityId, Projectile, Role};
use crate::math::Vec2;

/// An entity with optional components.
///
/// A combatant has `combatant` set; a projectile has `projectile` set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier for this entity.
    pub id: EntityId,
    /// World position.
    pub position: Vec2,
    /// Hero or enemy data.
    pub combatant: Option<Combatant>,
    /// Projectile data.
    pub projectile: Option<Projectile>,
}

impl Entity {
    /// Whether this entity is a living combatant.
    #[must_use]
    pub fn is_living_combatant(&self) -> bool {
        self.combatant.as_ref().is_some_and(Combatant::is_alive)
    }

    /// Whether this entity is a living enemy.
    #[must_use]
    pub fn is_living_enemy(&self) -> bool {
        self.combatant
            .as_ref()
            .is_some_and(Combatant::is_living_enemy)
    }
}

/// Storage for all combat entities.
///
/// Uses a `HashMap` for O(1) lookup by id, with deterministic iteration via
/// sorted keys when systems run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore {
    entities: HashMap<EntityId, Entity>,
    next_id: EntityId,
    next_actor_id: ActorId,
    pending_removal: Vec<EntityId>,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: HashMap::new(),
            next_id: 1,
            next_actor_id: 0,
            pending_removal: Vec::new(),
        }
    }

    /// Insert a combatant. Its actor id is assigned here.
    pub fn spawn_combatant(&mut self, position: Vec2, mut combatant: Combatant) -> EntityId {
        combatant.actor_id = self.next_actor_id;
        self.next_actor_id += 1;
        self.insert(position, Some(combatant), None)
    }

    /// Insert a projectile.
    pub fn spawn_projectile(&mut self, position: Vec2, projectile: Projectile) -> EntityId {
        self.insert(position, None, Some(projectile))
    }

    fn insert(
        &mut self,
        position: Vec2,
        combatant: Option<Combatant>,
        projectile: Option<Projectile>,
    ) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        self.entities.insert(
            id,
            Entity {
                id,
                position,
                combatant,
                projectile,
            },
        );
        id
    }

    /// Get an entity by id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Get a mutable reference to an entity by id.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Check if an entity exists.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Number of entities, including any awaiting removal.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Sorted entity ids for deterministic iteration.
    #[must_use]
    pub fn sorted_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Iterate over all entities (not in deterministic order).
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// The first hero by creation order, dead or alive.
    #[must_use]
    pub fn hero_id(&self) -> Option<EntityId> {
        self.entities
            .values()
            .filter(|e| e.combatant.as_ref().is_some_and(|c| c.role == Role::Hero))
            .map(|e| e.id)
            .min()
    }

    /// Number of enemies not flagged dead.
    #[must_use]
    pub fn alive_enemy_count(&self) -> usize {
        self.entities.values().filter(|e| e.is_living_enemy()).count()
    }

    /// Number of projectiles still in the store.
    #[must_use]
    pub fn projectile_count(&self) -> usize {
        self.entities
            .values()
            .filter(|e| e.projectile.is_some())
            .count()
    }

    /// Stage an entity for removal at the end of the tick.
    pub fn mark_for_removal(&mut self, id: EntityId) {
        if let Some(projectile) = self
            .entities
            .get_mut(&id)
            .and_then(|e| e.projectile.as_mut())
        {
            projectile.spent = true;
        }
        if !self.pending_removal.contains(&id) {
            self.pending_removal.push(id);
        }
    }

    /// Ids staged for removal.
    #[must_use]
    pub fn pending_removals(&self) -> &[EntityId] {
        &self.pending_removal
    }

    /// Remove every staged entity and return them in staging order.
    pub fn apply_removals(&mut self) -> Vec<Entity> {
        let pending = std::mem::take(&mut self.pending_removal);
        pending
            .into_iter()
            .filter_map(|id| self.entities.remove(&id))
            .collect()
    }
}
