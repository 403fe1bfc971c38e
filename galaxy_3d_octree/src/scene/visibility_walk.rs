/// VisibilityWalk: hierarchical frustum culling over the loose octree.
///
/// 3-way classification at each octant:
/// - `Outside` → skip the entire subtree
/// - `Inside` → emit every entity of the subtree without further testing
/// - `Partial` → test owned entities individually, re-test each child
///
/// Octants are tested through their loose culling bounds, never their
/// tight bounds, because owned entities may poke out of the tight box.
/// The root is always `Partial`: out-of-world entities live there and
/// must be tested one by one.

use crate::camera::{Frustum, FrustumTest};
use super::octant::{Octant, OctantId};
use super::octree_scene_index::OctreeSceneIndex;
use super::scene_entity::EntityKey;

/// Receiver of the walk's output.
pub trait VisibilityCollector {
    /// Called once per visible entity.
    fn visible_entity(&mut self, key: EntityKey);

    /// Called for every non-culled octant when the index was configured
    /// with `show_octants` (debug visualisation).
    fn visible_octant(&mut self, _octant: &Octant) {}
}

impl VisibilityCollector for Vec<EntityKey> {
    fn visible_entity(&mut self, key: EntityKey) {
        self.push(key);
    }
}

/// Counters gathered during one walk.
///
/// Empty subtrees are skipped before any counter is touched, so they
/// contribute nothing here.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkStats {
    /// Octants entered with a non-zero entity count
    pub octants_visited: u64,
    /// Octants classified `Outside`
    pub octants_culled: u64,
    /// Octant cull-bounds classifications performed
    pub octant_tests: u64,
    /// Entity AABB classifications performed
    pub entity_tests: u64,
    /// Individual plane evaluations (octants and entities)
    pub plane_tests: u64,
    /// Entities handed to the collector
    pub entities_emitted: u64,
}

/// One culling pass of an index against a frustum.
pub struct VisibilityWalk<'a> {
    index: &'a OctreeSceneIndex,
    frustum: &'a Frustum,
    show_octants: bool,
    stats: WalkStats,
}

impl<'a> VisibilityWalk<'a> {
    pub fn new(index: &'a OctreeSceneIndex, frustum: &'a Frustum) -> Self {
        Self {
            index,
            frustum,
            show_octants: index.config().show_octants,
            stats: WalkStats::default(),
        }
    }

    /// Override the index's `show_octants` setting for this walk.
    pub fn with_show_octants(mut self, show_octants: bool) -> Self {
        self.show_octants = show_octants;
        self
    }

    /// Walk from the root and return the gathered statistics.
    pub fn run(mut self, collector: &mut dyn VisibilityCollector) -> WalkStats {
        self.walk(OctantId::ROOT, false, collector);
        self.stats
    }

    fn walk(
        &mut self,
        id: OctantId,
        parent_fully_visible: bool,
        collector: &mut dyn VisibilityCollector,
    ) {
        let index = self.index;
        let octant = index.octant_ref(id);

        if octant.entity_count() == 0 {
            return;
        }
        self.stats.octants_visited += 1;

        let visibility = if parent_fully_visible {
            FrustumTest::Inside
        } else if id == OctantId::ROOT {
            FrustumTest::Partial
        } else {
            self.stats.octant_tests += 1;
            self.frustum
                .classify_aabb_counted(&octant.cull_bounds(), &mut self.stats.plane_tests)
        };

        match visibility {
            FrustumTest::Outside => {
                self.stats.octants_culled += 1;
            }

            FrustumTest::Inside => {
                if self.show_octants {
                    collector.visible_octant(octant);
                }
                for &key in octant.entities() {
                    collector.visible_entity(key);
                    self.stats.entities_emitted += 1;
                }
                for child in octant.children() {
                    self.walk(child, true, collector);
                }
            }

            FrustumTest::Partial => {
                if self.show_octants {
                    collector.visible_octant(octant);
                }
                for &key in octant.entities() {
                    let Some(bounds) = index.entity_bounds(key) else {
                        continue;
                    };
                    self.stats.entity_tests += 1;
                    let test = self
                        .frustum
                        .classify_aabb_counted(&bounds, &mut self.stats.plane_tests);
                    if test != FrustumTest::Outside {
                        collector.visible_entity(key);
                        self.stats.entities_emitted += 1;
                    }
                }
                for child in octant.children() {
                    self.walk(child, false, collector);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "visibility_walk_tests.rs"]
mod tests;
