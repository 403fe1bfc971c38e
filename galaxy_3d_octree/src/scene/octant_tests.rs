use glam::Vec3;
use super::*;

fn root_octant() -> Octant {
    Octant::root(AABB::new(Vec3::ZERO, Vec3::splat(1000.0)))
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_root_loose_half_size_is_full_extent() {
    let root = root_octant();
    assert_eq!(root.loose_half_size(), Vec3::splat(1000.0));
    assert_eq!(root.depth(), 0);
    assert!(root.parent().is_none());
    assert_eq!(root.entity_count(), 0);
    assert_eq!(root.children().count(), 0);
}

#[test]
fn test_child_bounds_low_corner() {
    let root = root_octant();
    let child = Octant::child(&root, OctantId::ROOT, 0);
    assert_eq!(child.bounds().min, Vec3::ZERO);
    assert_eq!(child.bounds().max, Vec3::splat(500.0));
}

#[test]
fn test_child_bounds_mixed_corner() {
    let root = root_octant();
    // bit0 = X high, bit1 = Y low, bit2 = Z high
    let child = Octant::child(&root, OctantId::ROOT, 0b101);
    assert_eq!(child.bounds().min, Vec3::new(500.0, 0.0, 500.0));
    assert_eq!(child.bounds().max, Vec3::new(1000.0, 500.0, 1000.0));
}

#[test]
fn test_child_loose_half_size_halves_parent() {
    let root = root_octant();
    let child = Octant::child(&root, OctantId::ROOT, 7);
    let grandchild = Octant::child(&child, OctantId(1), 3);

    assert_eq!(child.loose_half_size(), root.loose_half_size() * 0.5);
    assert_eq!(grandchild.loose_half_size(), child.loose_half_size() * 0.5);
    assert_eq!(grandchild.depth(), 2);
    assert_eq!(grandchild.parent(), Some(OctantId(1)));
}

#[test]
fn test_cull_bounds_grow_by_side_length() {
    let root = root_octant();
    let child = Octant::child(&root, OctantId::ROOT, 0);
    assert_eq!(child.loose_half_size(), child.bounds().size());
    let cull = child.cull_bounds();
    assert_eq!(cull.min, Vec3::splat(-500.0));
    assert_eq!(cull.max, Vec3::splat(1000.0));
}

// ============================================================================
// Placement helpers
// ============================================================================

#[test]
fn test_is_twice_size() {
    let root = root_octant();
    assert!(root.is_twice_size(&AABB::new(Vec3::ZERO, Vec3::splat(500.0))));
    assert!(!root.is_twice_size(&AABB::new(Vec3::ZERO, Vec3::new(500.1, 1.0, 1.0))));
    assert!(!root.is_twice_size(&AABB::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 600.0))));
}

#[test]
fn test_child_index_for_uses_midpoints() {
    let root = root_octant();
    let low = AABB::new(Vec3::splat(10.0), Vec3::splat(11.0));
    let high = AABB::new(Vec3::splat(900.0), Vec3::splat(901.0));
    let mixed = AABB::new(Vec3::new(900.0, 10.0, 900.0), Vec3::new(901.0, 11.0, 901.0));

    assert_eq!(root.child_index_for(&low), 0);
    assert_eq!(root.child_index_for(&high), 7);
    assert_eq!(root.child_index_for(&mixed), 0b101);
}

#[test]
fn test_child_index_for_straddling_box_follows_midpoint() {
    let root = root_octant();
    // Crosses x = 500 but its midpoint (510) is on the high side
    let straddling = AABB::new(Vec3::new(490.0, 10.0, 10.0), Vec3::new(530.0, 11.0, 11.0));
    assert_eq!(root.child_index_for(&straddling), 1);
}

#[test]
fn test_child_index_for_tie_goes_low() {
    let root = root_octant();
    let centered = AABB::new(Vec3::splat(499.0), Vec3::splat(501.0));
    assert_eq!(root.child_index_for(&centered), 0);
}

#[test]
fn test_is_in_box_is_strict_on_center() {
    let root = root_octant();
    assert!(root.is_in_box(&AABB::new(Vec3::splat(10.0), Vec3::splat(20.0))));
    // Center exactly on the boundary
    assert!(!root.is_in_box(&AABB::new(Vec3::new(-5.0, 10.0, 10.0), Vec3::new(5.0, 20.0, 20.0))));
    assert!(!root.is_in_box(&AABB::new(Vec3::splat(1100.0), Vec3::splat(1200.0))));
}

// ============================================================================
// Entity membership
// ============================================================================

#[test]
fn test_push_and_take_entity() {
    use slotmap::SlotMap;
    let mut keys = SlotMap::<EntityKey, ()>::with_key();
    let a = keys.insert(());
    let b = keys.insert(());

    let mut octant = root_octant();
    octant.push_entity(a);
    octant.push_entity(b);
    assert_eq!(octant.entities().len(), 2);

    assert!(octant.take_entity(a));
    assert!(!octant.take_entity(a));
    assert_eq!(octant.entities(), &[b]);
}

#[test]
fn test_set_child() {
    let mut root = root_octant();
    root.set_child(3, OctantId(1));
    assert_eq!(root.child_at(3), Some(OctantId(1)));
    assert_eq!(root.child_at(4), None);
    assert_eq!(root.child_at(99), None);
    assert_eq!(root.children().collect::<Vec<_>>(), vec![OctantId(1)]);
}
