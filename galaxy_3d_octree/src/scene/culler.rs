/// Camera culling strategies.
///
/// A CameraCuller determines which SceneEntities are visible
/// from a given frustum. Implementations range from brute-force
/// (return all) to the loose octree walk.

use crate::camera::{Frustum, FrustumTest};
use super::render_view::RenderView;
use super::scene::Scene;
use super::scene_entity::{BoundedEntity, EntityKey, Renderable};
use super::scene_index::SceneIndex;
use super::visibility_walk::WalkStats;

/// Which entities a pass is interested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullPass {
    /// Main camera: entities flagged `VISIBLE`
    Camera,
    /// Shadow map: entities flagged `CAST_SHADOW`
    ShadowCasters,
}

impl CullPass {
    fn accepts<R: Renderable>(self, entity: &R) -> bool {
        match self {
            CullPass::Camera => entity.is_visible(),
            CullPass::ShadowCasters => entity.casts_shadows(),
        }
    }
}

/// Strategy for determining visible entities from a frustum.
///
/// Called once per frame and per view, after the Updater. The returned
/// RenderView is ephemeral.
///
/// `&mut self` allows stateful implementations (e.g. caching)
/// to maintain state across frames.
pub trait CameraCuller: Send + Sync {
    /// Cull the scene against the frustum and return visible entities.
    fn cull(
        &mut self,
        scene: &Scene,
        frustum: &Frustum,
        scene_index: Option<&dyn SceneIndex>,
    ) -> RenderView;
}

/// Brute-force culler: returns ALL entities (no actual culling).
///
/// Suitable for small scenes or as a baseline for comparison.
/// Ignores the SceneIndex entirely.
pub struct BruteForceCuller;

impl BruteForceCuller {
    pub fn new() -> Self {
        Self
    }
}

impl CameraCuller for BruteForceCuller {
    fn cull(
        &mut self,
        scene: &Scene,
        frustum: &Frustum,
        _scene_index: Option<&dyn SceneIndex>,
    ) -> RenderView {
        let visible: Vec<EntityKey> = scene.entity_keys().collect();
        RenderView::new(*frustum, visible, WalkStats::default())
    }
}

/// Frustum culler: tests entity AABBs against the frustum.
///
/// With a SceneIndex: hierarchical walk of the index.
/// Without: brute-force frustum test on all entities (O(n), still
/// culls invisible objects unlike BruteForceCuller).
///
/// Results are filtered by the pass's render flag.
pub struct FrustumCuller {
    pass: CullPass,
}

impl FrustumCuller {
    /// Culler for the main camera pass.
    pub fn new() -> Self {
        Self { pass: CullPass::Camera }
    }

    pub fn for_pass(pass: CullPass) -> Self {
        Self { pass }
    }

    pub fn pass(&self) -> CullPass {
        self.pass
    }
}

impl CameraCuller for FrustumCuller {
    fn cull(
        &mut self,
        scene: &Scene,
        frustum: &Frustum,
        scene_index: Option<&dyn SceneIndex>,
    ) -> RenderView {
        let pass = self.pass;

        let (visible, stats) = match scene_index {
            Some(idx) => {
                let mut results: Vec<EntityKey> = Vec::new();
                let stats = idx.walk(frustum, &mut results);
                let emitted = results.len();
                let mut stale = 0;
                results.retain(|key| match scene.entity(*key) {
                    Some(entity) => pass.accepts(entity),
                    None => {
                        stale += 1;
                        false
                    }
                });
                if stale > 0 {
                    crate::octree_warn!(
                        "galaxy3d::FrustumCuller",
                        "{} of {} entities returned by the index are unknown to the scene",
                        stale,
                        emitted
                    );
                }
                (results, stats)
            }
            None => {
                let mut stats = WalkStats::default();
                let visible = scene.entities()
                    .filter(|(_, entity)| pass.accepts(*entity))
                    .filter_map(|(key, entity)| {
                        stats.entity_tests += 1;
                        let test = frustum.classify_aabb_counted(
                            &entity.world_bounds(),
                            &mut stats.plane_tests,
                        );
                        if test != FrustumTest::Outside {
                            Some(key)
                        } else {
                            None
                        }
                    })
                    .collect::<Vec<_>>();
                stats.entities_emitted = visible.len() as u64;
                (visible, stats)
            }
        };

        RenderView::new(*frustum, visible, stats)
    }
}

#[cfg(test)]
#[path = "culler_tests.rs"]
mod tests;
