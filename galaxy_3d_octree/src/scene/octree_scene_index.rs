/// OctreeSceneIndex: dynamic loose octree spatial index.
///
/// Each entity is stored in exactly one octant: the deepest one whose
/// would-be child is still at least twice the entity's size, up to
/// `max_depth`. Children are routed by comparing midpoints, so an entity
/// does not have to fit a child's tight bounds to go there; the loose
/// culling bounds (tight bounds grown by their full side length on every
/// side) always contain it.
///
/// Octants are created lazily and never deleted, only vacated. Every
/// octant keeps the number of entities in its subtree, updated in
/// O(depth) on insert and remove, which lets the visibility walk skip
/// empty subtrees in O(1).
///
/// Moving entities are re-homed only when their center leaves the
/// owning octant's tight bounds (or they grow too large for it), so
/// small movements cost a single hash lookup.

use glam::Vec3;
use rustc_hash::FxHashMap;
use crate::camera::Frustum;
use crate::error::{precondition_violation, Error, Result};
use super::aabb::{Intersection, Region, AABB};
use super::octant::{Octant, OctantId};
use super::scene_entity::EntityKey;
use super::scene_index::SceneIndex;
use super::visibility_walk::{VisibilityCollector, VisibilityWalk, WalkStats};

const SOURCE: &str = "galaxy3d::Octree";

/// Deepest `max_depth` accepted by `OctreeConfig`.
pub const MAX_SUPPORTED_DEPTH: u32 = 20;

// ===== CONFIG =====

/// Construction parameters of an `OctreeSceneIndex`.
#[derive(Debug, Clone, PartialEq)]
pub struct OctreeConfig {
    /// World-space extent of the root octant
    pub world_bounds: AABB,
    /// Maximum subdivision depth (root = 0)
    pub max_depth: u32,
    /// Report non-culled octants to `VisibilityCollector::visible_octant`
    pub show_octants: bool,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            world_bounds: AABB::new(Vec3::splat(-10000.0), Vec3::splat(10000.0)),
            max_depth: 8,
            show_octants: false,
        }
    }
}

impl OctreeConfig {
    pub fn new(world_bounds: AABB, max_depth: u32) -> Self {
        Self {
            world_bounds,
            max_depth,
            show_octants: false,
        }
    }

    pub fn with_world_bounds(mut self, world_bounds: AABB) -> Self {
        self.world_bounds = world_bounds;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_show_octants(mut self, show_octants: bool) -> Self {
        self.show_octants = show_octants;
        self
    }

    /// Check that the configuration describes a usable tree.
    pub fn validate(&self) -> Result<()> {
        validate_world_bounds(&self.world_bounds)?;
        if self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(Error::InvalidConfig(format!(
                "max_depth {} exceeds the supported maximum of {}",
                self.max_depth, MAX_SUPPORTED_DEPTH
            )));
        }
        Ok(())
    }
}

fn validate_world_bounds(bounds: &AABB) -> Result<()> {
    let size = bounds.size();
    if bounds.is_degenerate() || size.x <= 0.0 || size.y <= 0.0 || size.z <= 0.0 {
        return Err(Error::InvalidConfig(format!(
            "world bounds {:?} must be finite with a positive extent on every axis",
            bounds
        )));
    }
    Ok(())
}

// ===== INDEX =====

/// What the index knows about one entity.
#[derive(Debug, Clone, Copy)]
struct EntityRecord {
    /// Last world bounds handed to insert/update
    bounds: AABB,
    /// Octant whose entity list holds the entity (None = detached)
    octant: Option<OctantId>,
}

/// Dynamic loose octree.
pub struct OctreeSceneIndex {
    /// Octant arena, `OctantId::ROOT` first
    octants: Vec<Octant>,
    config: OctreeConfig,
    /// Reverse lookup: entity key → bounds and owning octant.
    /// Needed for O(1) update and remove without tree traversal.
    entities: FxHashMap<EntityKey, EntityRecord>,
}

impl OctreeSceneIndex {
    /// Create an empty index.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` for degenerate world bounds or an
    /// unsupported depth.
    pub fn new(config: OctreeConfig) -> Result<Self> {
        config.validate()?;

        crate::octree_info!(
            SOURCE,
            "Created octree over {:?}..{:?} with max depth {}",
            config.world_bounds.min,
            config.world_bounds.max,
            config.max_depth
        );

        Ok(Self {
            octants: vec![Octant::root(config.world_bounds)],
            config,
            entities: FxHashMap::default(),
        })
    }

    // ===== GETTERS =====

    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    pub fn world_bounds(&self) -> &AABB {
        self.octants[OctantId::ROOT.index()].bounds()
    }

    pub fn max_depth(&self) -> u32 {
        self.config.max_depth
    }

    /// The root octant id.
    pub fn root(&self) -> OctantId {
        OctantId::ROOT
    }

    /// Octant by id.
    pub fn octant(&self, id: OctantId) -> Option<&Octant> {
        self.octants.get(id.index())
    }

    /// Number of octants created so far (root included).
    pub fn octant_count(&self) -> usize {
        self.octants.len()
    }

    /// Number of entities placed in the tree.
    pub fn entity_count(&self) -> usize {
        self.octants[OctantId::ROOT.index()].entity_count()
    }

    /// True if the index knows the entity (placed or detached).
    pub fn contains(&self, key: EntityKey) -> bool {
        self.entities.contains_key(&key)
    }

    /// Octant currently owning the entity. `None` for unknown or detached
    /// entities.
    pub fn owning_octant(&self, key: EntityKey) -> Option<OctantId> {
        self.entities.get(&key).and_then(|record| record.octant)
    }

    /// Last world bounds recorded for the entity.
    pub fn entity_bounds(&self, key: EntityKey) -> Option<AABB> {
        self.entities.get(&key).map(|record| record.bounds)
    }

    pub(crate) fn octant_ref(&self, id: OctantId) -> &Octant {
        &self.octants[id.index()]
    }

    // ===== PLACEMENT =====

    /// Place an entity starting from the root and return its new owner.
    ///
    /// Entities whose center is not strictly inside the root stay at the
    /// root: descending would route them into a child whose loose bounds
    /// do not contain them.
    fn place(&mut self, key: EntityKey, bounds: &AABB) -> OctantId {
        let root = &self.octants[OctantId::ROOT.index()];
        if !root.is_in_box(bounds) {
            crate::octree_debug!(
                SOURCE,
                "Entity {:?} at {:?} lies outside the world bounds, owned by the root",
                key,
                bounds.center()
            );
            self.attach(OctantId::ROOT, key);
            return OctantId::ROOT;
        }

        let mut id = OctantId::ROOT;
        let mut depth = 0;

        loop {
            let octant = &self.octants[id.index()];
            if depth >= self.config.max_depth || !octant.is_twice_size(bounds) {
                break;
            }

            let child_index = octant.child_index_for(bounds);
            id = match octant.child_at(child_index) {
                Some(child) => child,
                None => self.create_child(id, child_index),
            };
            depth += 1;
        }

        self.attach(id, key);
        id
    }

    fn create_child(&mut self, parent: OctantId, child_index: usize) -> OctantId {
        let child = Octant::child(&self.octants[parent.index()], parent, child_index);
        let id = OctantId(self.octants.len() as u32);
        self.octants.push(child);
        self.octants[parent.index()].set_child(child_index, id);
        id
    }

    /// Add `key` to the octant's entity list and bump counts up to the root.
    fn attach(&mut self, id: OctantId, key: EntityKey) {
        self.octants[id.index()].push_entity(key);

        let mut current = Some(id);
        while let Some(octant_id) = current {
            let octant = &mut self.octants[octant_id.index()];
            octant.increment_count();
            current = octant.parent();
        }
    }

    /// Remove `key` from the octant's entity list and drop counts up to the root.
    fn detach(&mut self, id: OctantId, key: EntityKey) {
        if !self.octants[id.index()].take_entity(key) {
            precondition_violation(
                SOURCE,
                "detach",
                Error::InvariantViolation(format!(
                    "entity {:?} is not a member of its recorded octant {:?}",
                    key, id
                )),
            );
        }

        let mut current = Some(id);
        while let Some(octant_id) = current {
            let octant = &mut self.octants[octant_id.index()];
            octant.decrement_count();
            current = octant.parent();
        }
    }

    /// True if an entity with `bounds` can stay where it is.
    ///
    /// The root keeps everything it owns: entities inside the world stay
    /// as long as their center does, and out-of-world entities would be
    /// placed back at the root anyway. Other owners require the center to
    /// stay inside the tight bounds and the size to still pass the
    /// admission test that brought the entity there.
    fn still_fits(&self, owner: OctantId, bounds: &AABB) -> bool {
        if owner == OctantId::ROOT {
            return true;
        }

        let octant = &self.octants[owner.index()];
        let size = bounds.size();
        let limit = octant.bounds().size();
        octant.is_in_box(bounds) && size.x <= limit.x && size.y <= limit.y && size.z <= limit.z
    }

    // ===== PUBLIC MUTATION =====

    /// Insert an entity.
    ///
    /// # Panics
    ///
    /// If the bounds are degenerate or the entity is already known.
    #[track_caller]
    pub fn insert(&mut self, key: EntityKey, bounds: &AABB) {
        if bounds.is_degenerate() {
            precondition_violation(
                SOURCE,
                "insert",
                Error::DegenerateBounds(format!("entity {:?} has bounds {:?}", key, bounds)),
            );
        }
        if self.entities.contains_key(&key) {
            precondition_violation(
                SOURCE,
                "insert",
                Error::DuplicateEntity(format!("entity {:?} is already indexed", key)),
            );
        }

        let octant = self.place(key, bounds);
        self.entities.insert(key, EntityRecord { bounds: *bounds, octant: Some(octant) });
    }

    /// Record new bounds for an entity and re-home it if needed.
    pub fn update(&mut self, key: EntityKey, bounds: &AABB) {
        let current = self.entities.get(&key).and_then(|record| record.octant);

        if bounds.is_degenerate() {
            if let Some(owner) = current {
                self.detach(owner, key);
            }
            self.entities.insert(key, EntityRecord { bounds: *bounds, octant: None });
            return;
        }

        let octant = match current {
            Some(owner) if self.still_fits(owner, bounds) => owner,
            Some(owner) => {
                self.detach(owner, key);
                self.place(key, bounds)
            }
            None => self.place(key, bounds),
        };

        self.entities.insert(key, EntityRecord { bounds: *bounds, octant: Some(octant) });
    }

    /// Remove an entity.
    ///
    /// # Panics
    ///
    /// If the entity is not known to the index.
    #[track_caller]
    pub fn remove(&mut self, key: EntityKey) {
        let Some(record) = self.entities.remove(&key) else {
            precondition_violation(
                SOURCE,
                "remove",
                Error::UnknownEntity(format!("entity {:?} is not indexed", key)),
            );
        };

        if let Some(owner) = record.octant {
            self.detach(owner, key);
        }
    }

    /// Rebuild the tree over `world_bounds` and re-insert every placed
    /// entity. Detached entities stay detached.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` for degenerate bounds; the index is
    /// left untouched in that case.
    pub fn resize(&mut self, world_bounds: AABB) -> Result<()> {
        validate_world_bounds(&world_bounds)?;

        let placed: Vec<(EntityKey, AABB)> = self
            .entities
            .iter()
            .filter(|(_, record)| record.octant.is_some())
            .map(|(key, record)| (*key, record.bounds))
            .collect();

        self.config.world_bounds = world_bounds;
        self.octants.clear();
        self.octants.push(Octant::root(world_bounds));

        for (key, bounds) in &placed {
            let octant = self.place(*key, bounds);
            if let Some(record) = self.entities.get_mut(key) {
                record.octant = Some(octant);
            }
        }

        crate::octree_info!(
            SOURCE,
            "Resized octree to {:?}..{:?}, re-inserted {} entities into {} octants",
            world_bounds.min,
            world_bounds.max,
            placed.len(),
            self.octants.len()
        );

        Ok(())
    }

    /// Forget every entity. Octants are kept (vacated), like any other
    /// removal.
    pub fn clear(&mut self) {
        for octant in &mut self.octants {
            octant.vacate();
        }
        self.entities.clear();
        crate::octree_debug!(SOURCE, "Cleared octree ({} octants kept)", self.octants.len());
    }

    // ===== QUERIES =====

    /// Stream every visible entity to `collector`.
    pub fn walk(&self, frustum: &Frustum, collector: &mut dyn VisibilityCollector) -> WalkStats {
        VisibilityWalk::new(self, frustum).run(collector)
    }

    /// Every entity overlapping `region`, except `exclude`.
    pub fn find_in_region(&self, region: &Region, exclude: Option<EntityKey>) -> Vec<EntityKey> {
        let mut results = Vec::new();
        self.find_recursive(OctantId::ROOT, region, exclude, false, &mut results);
        results
    }

    /// Region query over one subtree.
    ///
    /// Same pruning as the visibility walk: empty subtrees are skipped,
    /// `Outside` subtrees are pruned, `Inside` subtrees are taken whole.
    /// The root is never trusted whole since it owns out-of-world entities.
    fn find_recursive(
        &self,
        id: OctantId,
        region: &Region,
        exclude: Option<EntityKey>,
        full: bool,
        results: &mut Vec<EntityKey>,
    ) {
        let octant = &self.octants[id.index()];
        if octant.entity_count() == 0 {
            return;
        }

        let full = if full {
            true
        } else if id == OctantId::ROOT {
            false
        } else {
            match region.classify(&octant.cull_bounds()) {
                Intersection::Outside => return,
                Intersection::Inside => true,
                Intersection::Intersect => false,
            }
        };

        for &key in octant.entities() {
            if Some(key) == exclude {
                continue;
            }
            if full {
                results.push(key);
            } else if let Some(record) = self.entities.get(&key) {
                if region.classify(&record.bounds) != Intersection::Outside {
                    results.push(key);
                }
            }
        }

        for child in octant.children() {
            self.find_recursive(child, region, exclude, full, results);
        }
    }

    // ===== DIAGNOSTICS =====

    /// Verify membership and count bookkeeping across the whole tree.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvariantViolation` describing the first problem found.
    pub fn check_invariants(&self) -> Result<()> {
        let mut seen: FxHashMap<EntityKey, OctantId> = FxHashMap::default();

        let root = &self.octants[OctantId::ROOT.index()];
        if root.loose_half_size() != root.bounds().size() {
            return Err(Error::InvariantViolation(
                "root loose half-size is not the root's extent".to_string(),
            ));
        }

        for (i, octant) in self.octants.iter().enumerate() {
            let id = OctantId(i as u32);

            let mut expected = octant.entities().len();
            for child in octant.children() {
                let child_octant = self.octant(child).ok_or_else(|| {
                    Error::InvariantViolation(format!("{:?} has dangling child {:?}", id, child))
                })?;
                if child_octant.parent() != Some(id) {
                    return Err(Error::InvariantViolation(format!(
                        "{:?} is listed under {:?} but its parent is {:?}",
                        child, id, child_octant.parent()
                    )));
                }
                if child_octant.loose_half_size() != octant.loose_half_size() * 0.5 {
                    return Err(Error::InvariantViolation(format!(
                        "{:?} loose half-size is not half of its parent's",
                        child
                    )));
                }
                expected += child_octant.entity_count();
            }
            if octant.entity_count() != expected {
                return Err(Error::InvariantViolation(format!(
                    "{:?} counts {} entities, subtree holds {}",
                    id, octant.entity_count(), expected
                )));
            }

            for &key in octant.entities() {
                if let Some(previous) = seen.insert(key, id) {
                    return Err(Error::InvariantViolation(format!(
                        "entity {:?} is owned by both {:?} and {:?}",
                        key, previous, id
                    )));
                }
                match self.entities.get(&key) {
                    Some(record) if record.octant == Some(id) => {}
                    Some(record) => {
                        return Err(Error::InvariantViolation(format!(
                            "entity {:?} sits in {:?} but is recorded in {:?}",
                            key, id, record.octant
                        )));
                    }
                    None => {
                        return Err(Error::InvariantViolation(format!(
                            "entity {:?} sits in {:?} but is not indexed",
                            key, id
                        )));
                    }
                }
            }
        }

        let placed = self.entities.values().filter(|record| record.octant.is_some()).count();
        if placed != seen.len() {
            return Err(Error::InvariantViolation(format!(
                "{} entities are recorded as placed, {} found in the tree",
                placed,
                seen.len()
            )));
        }

        Ok(())
    }
}

// ===== SCENE INDEX TRAIT =====

impl SceneIndex for OctreeSceneIndex {
    fn insert(&mut self, key: EntityKey, world_aabb: &AABB) {
        OctreeSceneIndex::insert(self, key, world_aabb);
    }

    fn remove(&mut self, key: EntityKey) {
        OctreeSceneIndex::remove(self, key);
    }

    fn update(&mut self, key: EntityKey, world_aabb: &AABB) {
        OctreeSceneIndex::update(self, key, world_aabb);
    }

    fn resize(&mut self, world_bounds: AABB) -> Result<()> {
        OctreeSceneIndex::resize(self, world_bounds)
    }

    fn walk(&self, frustum: &Frustum, collector: &mut dyn VisibilityCollector) -> WalkStats {
        OctreeSceneIndex::walk(self, frustum, collector)
    }

    fn find_in_region(
        &self,
        region: &Region,
        exclude: Option<EntityKey>,
        results: &mut Vec<EntityKey>,
    ) {
        self.find_recursive(OctantId::ROOT, region, exclude, false, results);
    }

    fn len(&self) -> usize {
        self.entity_count()
    }

    fn clear(&mut self) {
        OctreeSceneIndex::clear(self);
    }
}

#[cfg(test)]
#[path = "octree_scene_index_tests.rs"]
mod tests;
