/// Scene: a collection of SceneEntities feeding a SceneIndex.
///
/// Uses a SlotMap for O(1) insert/remove with stable keys.
/// Changes are tracked, not applied: the Updater drains them into the
/// index once per frame (removals, then new entities, then moved ones).

use rustc_hash::FxHashSet;
use slotmap::SlotMap;
use glam::Mat4;
use super::aabb::AABB;
use super::scene_entity::{EntityFlags, EntityKey, SceneEntity};

/// A scene containing SceneEntities.
///
/// Entities are managed via stable keys (EntityKey).
/// Keys remain valid even after other entities are removed.
pub struct Scene {
    /// Entities stored in a slot map for O(1) insert/remove
    entities: SlotMap<EntityKey, SceneEntity>,
    /// Entities whose world bounds changed since last take_dirty_bounds()
    dirty_bounds: FxHashSet<EntityKey>,
    /// Newly created entities not yet inserted into the index
    new_entities: FxHashSet<EntityKey>,
    /// Entities marked for deferred removal (processed by Updater)
    removed_entities: FxHashSet<EntityKey>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
            dirty_bounds: FxHashSet::default(),
            new_entities: FxHashSet::default(),
            removed_entities: FxHashSet::default(),
        }
    }

    /// Iterate over all entity keys.
    pub fn entity_keys(&self) -> impl Iterator<Item = EntityKey> + '_ {
        self.entities.keys()
    }

    /// Create an entity and add it to the scene.
    ///
    /// Returns a stable key that remains valid until the entity is removed.
    ///
    /// # Arguments
    ///
    /// * `local_bounds` - AABB in local space
    /// * `world_matrix` - World transform matrix
    /// * `flags` - Render flags (visibility, shadows)
    pub fn create_entity(
        &mut self,
        local_bounds: AABB,
        world_matrix: Mat4,
        flags: EntityFlags,
    ) -> EntityKey {
        let key = self.entities.insert(SceneEntity::new(local_bounds, world_matrix, flags));
        self.new_entities.insert(key);
        key
    }

    /// Mark an entity for deferred removal.
    ///
    /// The entity stays in the scene until the Updater processes it
    /// (via `take_removed_entities` + `commit_removals`). Entities the
    /// Updater has not inserted yet are dropped immediately.
    /// Returns false if the key is invalid.
    pub fn remove_entity(&mut self, key: EntityKey) -> bool {
        if !self.entities.contains_key(key) {
            return false;
        }

        self.dirty_bounds.remove(&key);
        if self.new_entities.remove(&key) {
            self.entities.remove(key);
        } else {
            self.removed_entities.insert(key);
        }
        true
    }

    /// Get an entity by key
    pub fn entity(&self, key: EntityKey) -> Option<&SceneEntity> {
        self.entities.get(key)
    }

    /// Set the world matrix of an entity. Returns false if key is invalid.
    pub fn set_world_matrix(&mut self, key: EntityKey, matrix: Mat4) -> bool {
        if let Some(entity) = self.entities.get_mut(key) {
            entity.set_world_matrix(matrix);
            self.mark_dirty(key);
            true
        } else {
            false
        }
    }

    /// Replace the local bounds of an entity. Returns false if key is invalid.
    pub fn set_local_bounds(&mut self, key: EntityKey, bounds: AABB) -> bool {
        if let Some(entity) = self.entities.get_mut(key) {
            entity.set_local_bounds(bounds);
            self.mark_dirty(key);
            true
        } else {
            false
        }
    }

    /// Replace the render flags of an entity. Returns false if key is invalid.
    ///
    /// Flags do not affect placement, so the entity is not marked dirty.
    pub fn set_flags(&mut self, key: EntityKey, flags: EntityFlags) -> bool {
        match self.entities.get_mut(key) {
            Some(entity) => {
                entity.set_flags(flags);
                true
            }
            None => false,
        }
    }

    /// New entities get their bounds on insertion, no need to track them twice.
    fn mark_dirty(&mut self, key: EntityKey) {
        if !self.new_entities.contains(&key) {
            self.dirty_bounds.insert(key);
        }
    }

    /// Get the set of entities with pending bounds changes.
    pub fn dirty_bounds(&self) -> &FxHashSet<EntityKey> {
        &self.dirty_bounds
    }

    /// Take and clear the dirty bounds set.
    pub fn take_dirty_bounds(&mut self) -> FxHashSet<EntityKey> {
        std::mem::take(&mut self.dirty_bounds)
    }

    /// Get the set of newly created entities pending insertion.
    pub fn new_entities(&self) -> &FxHashSet<EntityKey> {
        &self.new_entities
    }

    /// Take and clear the new entities set.
    pub fn take_new_entities(&mut self) -> FxHashSet<EntityKey> {
        std::mem::take(&mut self.new_entities)
    }

    /// Take and clear the set of entities marked for removal.
    pub fn take_removed_entities(&mut self) -> FxHashSet<EntityKey> {
        std::mem::take(&mut self.removed_entities)
    }

    /// Actually remove entities from the SlotMap.
    ///
    /// Called by the Updater after draining removed_entities and
    /// cleaning up the SceneIndex.
    pub(crate) fn commit_removals(&mut self, keys: &FxHashSet<EntityKey>) {
        for &key in keys {
            self.entities.remove(key);
        }
    }

    /// Iterate over all entities (key, entity)
    pub fn entities(&self) -> impl Iterator<Item = (EntityKey, &SceneEntity)> {
        self.entities.iter()
    }

    /// Get the number of entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Remove all entities and pending changes.
    ///
    /// The caller is responsible for clearing any SceneIndex fed by this scene.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.dirty_bounds.clear();
        self.new_entities.clear();
        self.removed_entities.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
