use glam::{Mat4, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slotmap::SlotMap;
use crate::scene::{OctreeConfig, AABB};
use super::*;

// ============================================================================
// Helpers
// ============================================================================

fn make_keys(count: usize) -> Vec<EntityKey> {
    let mut sm = SlotMap::<EntityKey, ()>::with_key();
    (0..count).map(|_| sm.insert(())).collect()
}

/// World [0, 1000]³.
fn make_index(max_depth: u32) -> OctreeSceneIndex {
    let config = OctreeConfig::new(AABB::new(Vec3::ZERO, Vec3::splat(1000.0)), max_depth);
    OctreeSceneIndex::new(config).unwrap()
}

fn unit_box_at(min: Vec3) -> AABB {
    AABB::new(min, min + Vec3::ONE)
}

fn camera_frustum(eye: Vec3, target: Vec3, far: f32) -> Frustum {
    let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_3, 16.0 / 9.0, 0.1, far);
    let view = Mat4::look_at_rh(eye, target, Vec3::Y);
    Frustum::from_view_projection(&(projection * view))
}

/// Frustum enclosing everything the tests ever place.
fn everything_frustum() -> Frustum {
    Frustum::from_aabb(&AABB::new(Vec3::splat(-100000.0), Vec3::splat(100000.0)))
}

fn brute_force(index: &OctreeSceneIndex, keys: &[EntityKey], frustum: &Frustum) -> Vec<EntityKey> {
    let mut visible: Vec<EntityKey> = keys
        .iter()
        .copied()
        .filter(|k| index.owning_octant(*k).is_some())
        .filter(|k| frustum.intersects_aabb(&index.entity_bounds(*k).unwrap()))
        .collect();
    visible.sort();
    visible
}

fn walk_sorted(index: &OctreeSceneIndex, frustum: &Frustum) -> (Vec<EntityKey>, WalkStats) {
    let mut visible: Vec<EntityKey> = Vec::new();
    let stats = index.walk(frustum, &mut visible);
    visible.sort();
    (visible, stats)
}

#[derive(Default)]
struct RecordingCollector {
    entities: Vec<EntityKey>,
    octant_depths: Vec<u32>,
}

impl VisibilityCollector for RecordingCollector {
    fn visible_entity(&mut self, key: EntityKey) {
        self.entities.push(key);
    }

    fn visible_octant(&mut self, octant: &Octant) {
        self.octant_depths.push(octant.depth());
    }
}

// ============================================================================
// Tests: Soundness
// ============================================================================

#[test]
fn test_grid_half_space_visibility() {
    let mut index = make_index(5);
    let keys = make_keys(100);
    for (i, &key) in keys.iter().enumerate() {
        let x = (i % 10) as f32 * 100.0 + 20.0;
        let z = (i / 10) as f32 * 100.0 + 20.0;
        index.insert(key, &AABB::new(Vec3::new(x, 0.5, z), Vec3::new(x + 5.0, 5.0, z + 5.0)));
    }

    let frustum = Frustum::from_aabb(&AABB::new(Vec3::ZERO, Vec3::new(500.0, 1000.0, 1000.0)));
    let (visible, stats) = walk_sorted(&index, &frustum);

    assert_eq!(visible.len(), 50);
    assert_eq!(visible, brute_force(&index, &keys, &frustum));
    assert_eq!(stats.entities_emitted, 50);
    assert!(stats.octants_culled > 0);
}

#[test]
fn test_walk_matches_brute_force_for_random_cameras() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut index = make_index(6);
    let keys = make_keys(400);

    for &key in &keys {
        let min = Vec3::new(
            rng.random_range(-100.0..1000.0),
            rng.random_range(-100.0..1000.0),
            rng.random_range(-100.0..1000.0),
        );
        let size = Vec3::new(
            rng.random_range(0.0..40.0),
            rng.random_range(0.0..40.0),
            rng.random_range(0.0..40.0),
        );
        index.insert(key, &AABB::new(min, min + size));
    }

    for _ in 0..25 {
        let eye = Vec3::new(
            rng.random_range(-200.0..1200.0),
            rng.random_range(-200.0..1200.0),
            rng.random_range(-200.0..1200.0),
        );
        let target = Vec3::new(
            rng.random_range(0.0..1000.0),
            rng.random_range(0.0..1000.0),
            rng.random_range(0.0..1000.0),
        );
        if eye.distance(target) < 1.0 {
            continue;
        }
        let frustum = camera_frustum(eye, target, rng.random_range(50.0..1500.0));

        let (visible, stats) = walk_sorted(&index, &frustum);
        assert_eq!(visible, brute_force(&index, &keys, &frustum));
        assert_eq!(stats.entities_emitted as usize, visible.len());
    }
}

#[test]
fn test_walk_after_moves_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut index = make_index(5);
    let keys = make_keys(150);
    for &key in &keys {
        index.insert(key, &unit_box_at(Vec3::splat(rng.random_range(0.0..990.0))));
    }
    for &key in keys.iter().step_by(2) {
        let min = Vec3::new(
            rng.random_range(0.0..990.0),
            rng.random_range(0.0..990.0),
            rng.random_range(0.0..990.0),
        );
        index.update(key, &unit_box_at(min));
    }

    let frustum = camera_frustum(Vec3::new(500.0, 500.0, -300.0), Vec3::splat(500.0), 2000.0);
    let (visible, _) = walk_sorted(&index, &frustum);
    assert_eq!(visible, brute_force(&index, &keys, &frustum));
}

#[test]
fn test_entity_touching_plane_is_visible() {
    let mut index = make_index(4);
    let keys = make_keys(2);
    index.insert(keys[0], &AABB::new(Vec3::new(100.0, 10.0, 10.0), Vec3::new(110.0, 20.0, 20.0)));
    index.insert(keys[1], &AABB::new(Vec3::new(100.5, 10.0, 10.0), Vec3::new(110.0, 20.0, 20.0)));

    let frustum = Frustum::from_aabb(&AABB::new(Vec3::ZERO, Vec3::splat(100.0)));
    let (visible, _) = walk_sorted(&index, &frustum);
    assert_eq!(visible, vec![keys[0]]);
}

#[test]
fn test_out_of_world_entities_are_tested_at_root() {
    let mut index = make_index(4);
    let keys = make_keys(3);
    index.insert(keys[0], &unit_box_at(Vec3::splat(10.0)));
    index.insert(keys[1], &unit_box_at(Vec3::new(5000.0, 10.0, 10.0)));
    index.insert(keys[2], &unit_box_at(Vec3::new(-3000.0, 10.0, 10.0)));

    // Covers the whole world (and the root's loose bounds) but not keys[1]
    let frustum = Frustum::from_aabb(&AABB::new(Vec3::splat(-4000.0), Vec3::splat(2000.0)));
    let mut expected = vec![keys[0], keys[2]];
    expected.sort();

    let (visible, stats) = walk_sorted(&index, &frustum);
    assert_eq!(visible, expected);
    // Both root-owned entities were tested individually
    assert_eq!(stats.entity_tests, 2);
}

#[test]
fn test_empty_index_touches_no_counters() {
    let index = make_index(4);
    let (visible, stats) = walk_sorted(&index, &everything_frustum());
    assert!(visible.is_empty());
    assert_eq!(stats, WalkStats::default());
}

// ============================================================================
// Tests: Instrumentation
// ============================================================================

#[test]
fn test_emptied_subtree_costs_nothing() {
    let mut index = make_index(1);
    let keys = make_keys(2);
    index.insert(keys[0], &unit_box_at(Vec3::splat(10.0)));
    index.insert(keys[1], &unit_box_at(Vec3::splat(900.0)));
    index.remove(keys[1]);

    let (visible, stats) = walk_sorted(&index, &everything_frustum());

    assert_eq!(visible, vec![keys[0]]);
    // Root (forced partial) and the populated child; the emptied child is skipped
    assert_eq!(stats.octants_visited, 2);
    assert_eq!(stats.octant_tests, 1);
    assert_eq!(stats.plane_tests, 6);
    assert_eq!(stats.entity_tests, 0);
    assert_eq!(stats.octants_culled, 0);
    assert_eq!(stats.entities_emitted, 1);
}

#[test]
fn test_fully_visible_subtree_skips_entity_tests() {
    let mut index = make_index(3);
    let keys = make_keys(20);
    for (i, &key) in keys.iter().enumerate() {
        index.insert(key, &unit_box_at(Vec3::splat(5.0 + i as f32 * 40.0)));
    }

    let (visible, stats) = walk_sorted(&index, &everything_frustum());
    assert_eq!(visible.len(), 20);
    assert_eq!(stats.entity_tests, 0);
    // One octant test per child of the root, nothing below
    assert_eq!(stats.plane_tests, stats.octant_tests * 6);
    assert!(stats.octant_tests <= 8);
}

#[test]
fn test_culled_subtree_is_counted_once() {
    let mut index = make_index(3);
    let keys = make_keys(3);
    index.insert(keys[0], &unit_box_at(Vec3::splat(900.0)));
    index.insert(keys[1], &unit_box_at(Vec3::splat(910.0)));
    index.insert(keys[2], &unit_box_at(Vec3::splat(920.0)));

    let frustum = Frustum::from_aabb(&AABB::new(Vec3::splat(-500.0), Vec3::splat(-300.0)));
    let (visible, stats) = walk_sorted(&index, &frustum);

    assert!(visible.is_empty());
    assert_eq!(stats.octants_culled, 1);
    assert_eq!(stats.octant_tests, 1);
    assert_eq!(stats.entity_tests, 0);
}

// ============================================================================
// Tests: show_octants
// ============================================================================

#[test]
fn test_show_octants_reports_visited_octants() {
    let config = OctreeConfig::new(AABB::new(Vec3::ZERO, Vec3::splat(1000.0)), 2)
        .with_show_octants(true);
    let mut index = OctreeSceneIndex::new(config).unwrap();
    let key = make_keys(1)[0];
    index.insert(key, &unit_box_at(Vec3::splat(10.0)));

    let frustum = everything_frustum();
    let mut collector = RecordingCollector::default();
    index.walk(&frustum, &mut collector);

    assert_eq!(collector.entities, vec![key]);
    assert_eq!(collector.octant_depths, vec![0, 1, 2]);
}

#[test]
fn test_show_octants_off_by_default() {
    let mut index = make_index(2);
    let key = make_keys(1)[0];
    index.insert(key, &unit_box_at(Vec3::splat(10.0)));

    let frustum = everything_frustum();
    let mut collector = RecordingCollector::default();
    index.walk(&frustum, &mut collector);
    assert!(collector.octant_depths.is_empty());

    let mut overridden = RecordingCollector::default();
    VisibilityWalk::new(&index, &frustum)
        .with_show_octants(true)
        .run(&mut overridden);
    assert_eq!(overridden.octant_depths.len(), 3);
    assert_eq!(overridden.entities, vec![key]);
}
