/// RenderView: result of culling.
///
/// Created by a `CameraCuller`. Contains a snapshot of the frustum
/// at culling time, the list of visible entity keys and the walk
/// statistics.
///
/// Ephemeral: lives for one frame. No Arc, no Mutex.
/// Shareable: the caller can pass the same RenderView to multiple passes.

use crate::camera::Frustum;
use super::scene_entity::EntityKey;
use super::visibility_walk::WalkStats;

/// Result of culling. Ephemeral, lives for one frame.
#[derive(Debug, Clone)]
pub struct RenderView {
    frustum: Frustum,
    visible_entities: Vec<EntityKey>,
    stats: WalkStats,
}

impl RenderView {
    /// Create a new RenderView (crate-internal: only cullers create these).
    pub(crate) fn new(frustum: Frustum, visible_entities: Vec<EntityKey>, stats: WalkStats) -> Self {
        Self {
            frustum,
            visible_entities,
            stats,
        }
    }

    /// Frustum snapshot at the time of culling.
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// Keys of visible entities in the Scene.
    pub fn visible_entities(&self) -> &[EntityKey] {
        &self.visible_entities
    }

    /// Number of visible entities.
    pub fn visible_count(&self) -> usize {
        self.visible_entities.len()
    }

    /// Counters gathered while culling.
    pub fn stats(&self) -> &WalkStats {
        &self.stats
    }
}

#[cfg(test)]
#[path = "render_view_tests.rs"]
mod tests;
