/// Scene entities and the capability traits the index depends on.
///
/// The index never owns entities. It identifies them by `EntityKey`
/// and only asks for their world-space bounds (`BoundedEntity`).
/// What happens to a visible entity afterwards (mesh submission,
/// shadow casting) is expressed through `Renderable`.

use bitflags::bitflags;
use glam::Mat4;
use slotmap::new_key_type;
use super::aabb::AABB;

new_key_type! {
    /// Stable key identifying an entity placed in a scene index.
    pub struct EntityKey;
}

/// Anything with a world-space axis-aligned bounding box.
pub trait BoundedEntity {
    /// Current world-space bounds. May be `AABB::NULL` for entities that
    /// are not (yet) placeable.
    fn world_bounds(&self) -> AABB;
}

impl BoundedEntity for AABB {
    fn world_bounds(&self) -> AABB {
        *self
    }
}

/// Render-side behaviour of a culled entity.
pub trait Renderable: BoundedEntity {
    /// Submitted to camera passes.
    fn is_visible(&self) -> bool;

    /// Submitted to shadow-caster passes.
    fn casts_shadows(&self) -> bool;
}

bitflags! {
    /// Per-entity render flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EntityFlags: u32 {
        const VISIBLE        = 1 << 0;
        const CAST_SHADOW    = 1 << 1;
        const RECEIVE_SHADOW = 1 << 2;
    }
}

impl Default for EntityFlags {
    fn default() -> Self {
        EntityFlags::VISIBLE | EntityFlags::CAST_SHADOW | EntityFlags::RECEIVE_SHADOW
    }
}

/// A movable, bounded object stored in a `Scene`.
///
/// Bounds are kept in local space together with a world matrix; the
/// world-space AABB is recomputed whenever either changes.
#[derive(Debug, Clone)]
pub struct SceneEntity {
    local_bounds: AABB,
    world_matrix: Mat4,
    world_bounds: AABB,
    flags: EntityFlags,
}

impl SceneEntity {
    pub fn new(local_bounds: AABB, world_matrix: Mat4, flags: EntityFlags) -> Self {
        Self {
            local_bounds,
            world_matrix,
            world_bounds: local_bounds.transformed(&world_matrix),
            flags,
        }
    }

    /// Entity whose local space is world space.
    pub fn from_world_bounds(world_bounds: AABB) -> Self {
        Self::new(world_bounds, Mat4::IDENTITY, EntityFlags::default())
    }

    pub fn local_bounds(&self) -> &AABB {
        &self.local_bounds
    }

    pub fn world_matrix(&self) -> &Mat4 {
        &self.world_matrix
    }

    pub fn flags(&self) -> EntityFlags {
        self.flags
    }

    pub(crate) fn set_world_matrix(&mut self, matrix: Mat4) {
        self.world_matrix = matrix;
        self.world_bounds = self.local_bounds.transformed(&matrix);
    }

    pub(crate) fn set_local_bounds(&mut self, bounds: AABB) {
        self.local_bounds = bounds;
        self.world_bounds = bounds.transformed(&self.world_matrix);
    }

    pub(crate) fn set_flags(&mut self, flags: EntityFlags) {
        self.flags = flags;
    }
}

impl BoundedEntity for SceneEntity {
    fn world_bounds(&self) -> AABB {
        self.world_bounds
    }
}

impl Renderable for SceneEntity {
    fn is_visible(&self) -> bool {
        self.flags.contains(EntityFlags::VISIBLE)
    }

    fn casts_shadows(&self) -> bool {
        self.flags.contains(EntityFlags::CAST_SHADOW)
    }
}

#[cfg(test)]
#[path = "scene_entity_tests.rs"]
mod tests;
