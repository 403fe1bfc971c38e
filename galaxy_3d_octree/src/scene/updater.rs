/// Update strategies.
///
/// An Updater synchronizes scene changes into a SceneIndex each frame.
/// This is the single-writer phase: every insert/update/remove on the
/// index happens here, before any culling.

use crate::error::Result;
use super::scene::Scene;
use super::scene_entity::BoundedEntity;
use super::scene_index::SceneIndex;

/// Strategy for synchronizing scene changes into a spatial index.
///
/// Called once per frame before culling. `&mut self` allows
/// stateful implementations to track their own bookkeeping.
pub trait Updater: Send + Sync {
    /// Drain the scene's pending changes.
    ///
    /// Processes removed, new, and dirty entities:
    /// - Removed: cleans up SceneIndex + commits removal from Scene
    /// - New: inserts into SceneIndex
    /// - Dirty: updates SceneIndex with the new world bounds
    fn update_index(
        &mut self,
        scene: &mut Scene,
        scene_index: Option<&mut dyn SceneIndex>,
    ) -> Result<()>;
}

/// No-op updater: does nothing.
///
/// Placeholder for scenes culled without an index. Pending changes are
/// left in the scene.
pub struct NoOpUpdater;

impl NoOpUpdater {
    pub fn new() -> Self {
        Self
    }
}

impl Updater for NoOpUpdater {
    fn update_index(
        &mut self,
        _scene: &mut Scene,
        _scene_index: Option<&mut dyn SceneIndex>,
    ) -> Result<()> {
        Ok(())
    }
}

/// Default updater: keeps a SceneIndex in sync with a Scene.
///
/// New entities with degenerate world bounds (e.g. `AABB::NULL`) go
/// through `update` instead of `insert`: the index records them detached
/// until they receive valid bounds.
///
/// Running without an index commits removals only. Once an index has
/// received entities it must be passed to every later run, otherwise the
/// removals committed in between never reach it.
pub struct IndexUpdater;

impl IndexUpdater {
    pub fn new() -> Self {
        Self
    }
}

impl Updater for IndexUpdater {
    fn update_index(
        &mut self,
        scene: &mut Scene,
        scene_index: Option<&mut dyn SceneIndex>,
    ) -> Result<()> {
        // Without an index only removals are committed. New and dirty
        // entities stay pending until a run that has an index to feed.
        let Some(idx) = scene_index else {
            let removed_keys = scene.take_removed_entities();
            scene.commit_removals(&removed_keys);
            return Ok(());
        };

        // Phase 0: removals. Clean SceneIndex then commit removal from Scene
        let removed_keys = scene.take_removed_entities();
        for key in &removed_keys {
            idx.remove(*key);
        }
        scene.commit_removals(&removed_keys);

        // Phase 1: new entities. Insert into SceneIndex
        for key in &scene.take_new_entities() {
            let Some(entity) = scene.entity(*key) else {
                continue;
            };
            let world_aabb = entity.world_bounds();
            if world_aabb.is_degenerate() {
                idx.update(*key, &world_aabb);
            } else {
                idx.insert(*key, &world_aabb);
            }
        }

        // Phase 2: dirty bounds. Re-home in SceneIndex
        for key in &scene.take_dirty_bounds() {
            if let Some(entity) = scene.entity(*key) {
                idx.update(*key, &entity.world_bounds());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "updater_tests.rs"]
mod tests;
