/// Octant: one node of the loose octree.
///
/// Octants live in an arena owned by `OctreeSceneIndex` and refer to
/// each other through `OctantId` indices. The parent link is only used
/// to walk up when propagating entity counts.

use glam::Vec3;
use super::aabb::AABB;
use super::scene_entity::EntityKey;

/// Index of an octant in the index's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OctantId(pub(crate) u32);

impl OctantId {
    /// The root octant. Always present.
    pub const ROOT: OctantId = OctantId(0);

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node of the loose octree.
#[derive(Debug, Clone)]
pub struct Octant {
    /// Tight spatial extent
    bounds: AABB,
    /// Margin added on both sides of `bounds` to get the culling bounds
    loose_half_size: Vec3,
    /// Lazily created children. Child index bit layout: bit0 = X, bit1 = Y,
    /// bit2 = Z (0 = low half, 1 = high half)
    children: [Option<OctantId>; 8],
    /// Entities owned directly by this octant
    entities: Vec<EntityKey>,
    /// Entities owned by this octant and all of its descendants
    entity_count: usize,
    parent: Option<OctantId>,
    depth: u32,
}

impl Octant {
    /// Create a root octant covering `bounds`.
    pub(crate) fn root(bounds: AABB) -> Self {
        Self {
            bounds,
            loose_half_size: bounds.size(),
            children: [None; 8],
            entities: Vec::new(),
            entity_count: 0,
            parent: None,
            depth: 0,
        }
    }

    /// Create child `child_index` of `parent`.
    ///
    /// The child's bounds are the chosen half of the parent on every axis;
    /// its loose half-size is exactly half of the parent's.
    pub(crate) fn child(parent: &Octant, parent_id: OctantId, child_index: usize) -> Self {
        let mid = parent.bounds.center();
        let bounds = AABB {
            min: Vec3::new(
                if child_index & 1 == 0 { parent.bounds.min.x } else { mid.x },
                if child_index & 2 == 0 { parent.bounds.min.y } else { mid.y },
                if child_index & 4 == 0 { parent.bounds.min.z } else { mid.z },
            ),
            max: Vec3::new(
                if child_index & 1 == 0 { mid.x } else { parent.bounds.max.x },
                if child_index & 2 == 0 { mid.y } else { parent.bounds.max.y },
                if child_index & 4 == 0 { mid.z } else { parent.bounds.max.z },
            ),
        };

        Self {
            bounds,
            loose_half_size: parent.loose_half_size * 0.5,
            children: [None; 8],
            entities: Vec::new(),
            entity_count: 0,
            parent: Some(parent_id),
            depth: parent.depth + 1,
        }
    }

    // ===== GETTERS =====

    /// Tight bounds.
    pub fn bounds(&self) -> &AABB {
        &self.bounds
    }

    pub fn loose_half_size(&self) -> Vec3 {
        self.loose_half_size
    }

    /// Tight bounds grown by the loose half-size on both sides.
    ///
    /// This is the box tested against frustums and query regions.
    pub fn cull_bounds(&self) -> AABB {
        self.bounds.expanded(self.loose_half_size)
    }

    /// Child at `child_index` (0–7), if it has been created.
    pub fn child_at(&self, child_index: usize) -> Option<OctantId> {
        self.children.get(child_index).copied().flatten()
    }

    /// All created children.
    pub fn children(&self) -> impl Iterator<Item = OctantId> + '_ {
        self.children.iter().filter_map(|c| *c)
    }

    /// Entities owned directly by this octant.
    pub fn entities(&self) -> &[EntityKey] {
        &self.entities
    }

    /// Entities owned by this octant and all of its descendants.
    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    pub fn parent(&self) -> Option<OctantId> {
        self.parent
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    // ===== PLACEMENT HELPERS =====

    /// True if `aabb` is at most half this octant's size on every axis,
    /// i.e. it would still fit a child of this octant.
    pub fn is_twice_size(&self, aabb: &AABB) -> bool {
        let half = self.bounds.half_size();
        let size = aabb.size();
        size.x <= half.x && size.y <= half.y && size.z <= half.z
    }

    /// Child index routing `aabb`: its midpoint against this octant's midpoint.
    ///
    /// The comparison is `>`, so a midpoint exactly on the split plane goes
    /// to the low half.
    pub fn child_index_for(&self, aabb: &AABB) -> usize {
        let box_mid = aabb.center();
        let mid = self.bounds.center();
        (box_mid.x > mid.x) as usize
            | (((box_mid.y > mid.y) as usize) << 1)
            | (((box_mid.z > mid.z) as usize) << 2)
    }

    /// True if the center of `aabb` lies strictly inside the tight bounds.
    pub fn is_in_box(&self, aabb: &AABB) -> bool {
        self.bounds.contains_point_strict(aabb.center())
    }

    // ===== MUTATION (arena-internal) =====

    pub(crate) fn set_child(&mut self, child_index: usize, id: OctantId) {
        self.children[child_index] = Some(id);
    }

    pub(crate) fn push_entity(&mut self, key: EntityKey) {
        self.entities.push(key);
    }

    /// Remove `key` from the directly owned entities. Returns false if absent.
    pub(crate) fn take_entity(&mut self, key: EntityKey) -> bool {
        match self.entities.iter().position(|&k| k == key) {
            Some(pos) => {
                self.entities.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    pub(crate) fn increment_count(&mut self) {
        self.entity_count += 1;
    }

    pub(crate) fn decrement_count(&mut self) {
        debug_assert!(self.entity_count > 0, "octant entity count underflow");
        self.entity_count -= 1;
    }

    /// Drop every owned entity and zero the subtree count. Children stay.
    pub(crate) fn vacate(&mut self) {
        self.entities.clear();
        self.entity_count = 0;
    }
}

#[cfg(test)]
#[path = "octant_tests.rs"]
mod tests;
