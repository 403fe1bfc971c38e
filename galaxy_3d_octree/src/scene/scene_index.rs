/// Spatial acceleration structures for scene queries.
///
/// A SceneIndex indexes entities by their world-space AABB
/// for efficient frustum culling and spatial queries.
///
/// Ownership: the caller creates and owns the SceneIndex.
/// It is passed by reference to Updater and CameraCuller.

use crate::camera::Frustum;
use crate::error::Result;
use super::aabb::{Region, AABB};
use super::scene_entity::{BoundedEntity, EntityKey};
use super::visibility_walk::{VisibilityCollector, WalkStats};

/// Trait for spatial indexing of scene entities.
///
/// Mutation (`insert`, `update`, `remove`, `resize`, `clear`) happens in a
/// single-writer phase. Queries take `&self` and may run concurrently
/// once that phase is over.
pub trait SceneIndex: Send + Sync {
    /// Insert an entity with its world-space AABB.
    ///
    /// # Panics
    ///
    /// If the entity is already indexed or the bounds are degenerate.
    fn insert(&mut self, key: EntityKey, world_aabb: &AABB);

    /// Remove an entity from the index.
    ///
    /// # Panics
    ///
    /// If the entity is not known to the index.
    fn remove(&mut self, key: EntityKey);

    /// Update an entity's world-space AABB (e.g. after transform change).
    ///
    /// Unknown entities are inserted. Degenerate bounds detach the entity
    /// until it gets valid bounds again.
    fn update(&mut self, key: EntityKey, world_aabb: &AABB);

    /// Rebuild the index over new world bounds, re-inserting every entity.
    fn resize(&mut self, world_bounds: AABB) -> Result<()>;

    /// Stream every entity visible in `frustum` to `collector`.
    fn walk(&self, frustum: &Frustum, collector: &mut dyn VisibilityCollector) -> WalkStats;

    /// Query all entities whose world AABB intersects the frustum.
    /// Results are appended to `results`.
    fn query_frustum(&self, frustum: &Frustum, results: &mut Vec<EntityKey>) {
        self.walk(frustum, results);
    }

    /// Append every entity whose world AABB overlaps `region`, except `exclude`.
    fn find_in_region(
        &self,
        region: &Region,
        exclude: Option<EntityKey>,
        results: &mut Vec<EntityKey>,
    );

    /// Number of entities currently placed in the index.
    fn len(&self) -> usize;

    /// True if no entity is placed.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all entities from the index.
    fn clear(&mut self);

    /// Insert any `BoundedEntity` using its current world bounds.
    fn insert_entity<E: BoundedEntity>(&mut self, key: EntityKey, entity: &E)
    where
        Self: Sized,
    {
        self.insert(key, &entity.world_bounds());
    }

    /// Re-home any `BoundedEntity` after its bounds changed.
    fn update_entity<E: BoundedEntity>(&mut self, key: EntityKey, entity: &E)
    where
        Self: Sized,
    {
        self.update(key, &entity.world_bounds());
    }
}
