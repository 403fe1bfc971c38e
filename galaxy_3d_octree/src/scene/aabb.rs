/// Bounding volumes and the geometric classifiers used by the octree.
///
/// The same two classifiers drive placement, region queries and
/// culling, so they only use exact comparisons and always read corners
/// as (min, max).

use glam::{Mat4, Vec3};

// ===== AABB =====

/// Axis-Aligned Bounding Box
///
/// A box is *null* when any `min` component exceeds the matching `max`
/// component, and *degenerate* when it is null or has a non-finite
/// component. Zero-extent boxes (points, flat quads) are valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl AABB {
    /// The null box. Contains nothing, intersects nothing.
    pub const NULL: AABB = AABB {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Create a box from its min and max corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a box from a center point and half extents.
    pub fn from_center_half_size(center: Vec3, half_size: Vec3) -> Self {
        Self {
            min: center - half_size,
            max: center + half_size,
        }
    }

    /// True if `min > max` on any axis.
    pub fn is_null(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// True if the box cannot be placed or culled (null or non-finite).
    pub fn is_degenerate(&self) -> bool {
        // NaN fails every comparison, so is_null alone misses it
        self.is_null() || !self.min.is_finite() || !self.max.is_finite()
    }

    /// Compute the center point of this AABB.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full extent on each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Half extent on each axis.
    pub fn half_size(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Grow the box by `margin` on both sides of every axis.
    pub fn expanded(&self, margin: Vec3) -> AABB {
        AABB {
            min: self.min - margin,
            max: self.max + margin,
        }
    }

    /// The eight corners. Bit layout of the index: bit0 = X, bit1 = Y, bit2 = Z
    /// (0 = min, 1 = max).
    pub fn corners(&self) -> [Vec3; 8] {
        let mut corners = [Vec3::ZERO; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            *corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
        }
        corners
    }

    /// True if `point` lies strictly inside the box on every axis.
    pub fn contains_point_strict(&self, point: Vec3) -> bool {
        point.x > self.min.x && point.x < self.max.x
            && point.y > self.min.y && point.y < self.max.y
            && point.z > self.min.z && point.z < self.max.z
    }

    /// Test if this AABB fully contains another AABB (touching faces allowed).
    pub fn contains(&self, other: &AABB) -> bool {
        self.min.x <= other.min.x && self.max.x >= other.max.x
        && self.min.y <= other.min.y && self.max.y >= other.max.y
        && self.min.z <= other.min.z && self.max.z >= other.max.z
    }

    /// Test if this AABB intersects (overlaps) another AABB.
    ///
    /// Returns `true` if the two AABBs overlap or touch.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
        && self.min.y <= other.max.y && self.max.y >= other.min.y
        && self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Transform this local-space AABB by a matrix, returning a new AABB.
    ///
    /// Uses the Arvo method: projects each matrix axis onto the AABB extents
    /// for an exact (tight) result without transforming all 8 corners.
    /// A null box stays null.
    pub fn transformed(&self, matrix: &Mat4) -> AABB {
        if self.is_null() {
            return AABB::NULL;
        }

        let translation = matrix.col(3).truncate();
        let mut new_min = translation;
        let mut new_max = translation;

        for i in 0..3 {
            let axis = matrix.col(i).truncate();
            let a = axis * self.min[i];
            let b = axis * self.max[i];
            new_min += a.min(b);
            new_max += a.max(b);
        }

        AABB { min: new_min, max: new_max }
    }
}

// ===== SPHERE =====

/// Bounding sphere used by region queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

// ===== CLASSIFIERS =====

/// Result of a box/box or sphere/box classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intersection {
    /// No overlap (or degenerate input)
    Outside,
    /// The tested box lies strictly inside the region
    Inside,
    /// Anything else, including touching boundaries
    Intersect,
}

/// Classify `inner` against `outer`.
///
/// - `Outside` if either box is null or an axis separates them
/// - `Inside` if `inner` is strictly within `outer` on every axis
/// - `Intersect` otherwise (boxes sharing a face are not separated)
pub fn classify_box_box(outer: &AABB, inner: &AABB) -> Intersection {
    if outer.is_null() || inner.is_null() {
        return Intersection::Outside;
    }

    if inner.max.x < outer.min.x || inner.max.y < outer.min.y || inner.max.z < outer.min.z
        || inner.min.x > outer.max.x || inner.min.y > outer.max.y || inner.min.z > outer.max.z
    {
        return Intersection::Outside;
    }

    let full = inner.min.x > outer.min.x && inner.min.y > outer.min.y && inner.min.z > outer.min.z
        && inner.max.x < outer.max.x && inner.max.y < outer.max.y && inner.max.z < outer.max.z;

    if full { Intersection::Inside } else { Intersection::Intersect }
}

/// Classify `aabb` against `sphere`.
///
/// - `Outside` for a null box, a negative or NaN radius, or when the
///   squared distance from the center to the box exceeds `radius²`
/// - `Inside` if every box corner is strictly within `radius` of the center
/// - `Intersect` otherwise
pub fn classify_sphere_box(sphere: &Sphere, aabb: &AABB) -> Intersection {
    if aabb.is_null() || !(sphere.radius >= 0.0) {
        return Intersection::Outside;
    }

    let radius_sq = sphere.radius * sphere.radius;
    let c = sphere.center;

    // Farthest corner: per axis, whichever of min/max is further away
    let to_min = (aabb.min - c).abs();
    let to_max = (aabb.max - c).abs();
    if to_min.max(to_max).length_squared() < radius_sq {
        return Intersection::Inside;
    }

    let mut dist_sq = 0.0;
    for i in 0..3 {
        if c[i] < aabb.min[i] {
            let s = c[i] - aabb.min[i];
            dist_sq += s * s;
        } else if c[i] > aabb.max[i] {
            let s = c[i] - aabb.max[i];
            dist_sq += s * s;
        }
    }

    if dist_sq > radius_sq { Intersection::Outside } else { Intersection::Intersect }
}

// ===== REGION =====

/// Query volume for non-culling range queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Region {
    Box(AABB),
    Sphere(Sphere),
}

impl Region {
    /// Classify `aabb` against this region.
    pub fn classify(&self, aabb: &AABB) -> Intersection {
        match self {
            Region::Box(region) => classify_box_box(region, aabb),
            Region::Sphere(sphere) => classify_sphere_box(sphere, aabb),
        }
    }
}

impl From<AABB> for Region {
    fn from(aabb: AABB) -> Self {
        Region::Box(aabb)
    }
}

impl From<Sphere> for Region {
    fn from(sphere: Sphere) -> Self {
        Region::Sphere(sphere)
    }
}

#[cfg(test)]
#[path = "aabb_tests.rs"]
mod tests;
