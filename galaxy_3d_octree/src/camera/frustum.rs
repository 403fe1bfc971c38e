/// Frustum: six clipping planes for visibility culling.
///
/// Each plane is represented as a Vec4 (A, B, C, D) where:
/// - (A, B, C) is the inward-pointing normal
/// - D is the signed distance
/// - A point P is inside the frustum if dot(plane, P_homogeneous) >= 0 for all planes
///
/// The caller is responsible for computing and setting the frustum.
/// `from_view_projection()` is provided as a utility, but the caller may
/// compute the planes by other means and hand them to `from_planes()`.

use glam::{Mat4, Vec3, Vec4};
use crate::error::{precondition_violation, Error, Result};
use crate::scene::AABB;

/// Result of a 3-way frustum/AABB classification.
///
/// Used by the visibility walk for hierarchical culling:
/// - `Outside` → skip the entire subtree
/// - `Inside` → collect all objects without further testing
/// - `Partial` → test individual objects and recurse into children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrustumTest {
    /// AABB is entirely outside the frustum
    Outside,
    /// AABB is entirely inside the frustum
    Inside,
    /// AABB partially overlaps the frustum
    Partial,
}

/// Frustum plane indices
pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

/// Number of planes in a well-formed frustum.
pub const PLANE_COUNT: usize = 6;

/// Six frustum planes for culling.
///
/// Each plane is (A, B, C, D) where Ax + By + Cz + D = 0.
/// Normal (A, B, C) points inward (toward the visible volume).
/// Works with both perspective and orthographic projections.
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    /// Frustum planes: left, right, bottom, top, near, far
    pub planes: [Vec4; PLANE_COUNT],
}

impl Frustum {
    /// Build a frustum from six planes with inward-pointing normals.
    pub fn from_planes(planes: [Vec4; PLANE_COUNT]) -> Self {
        Self { planes }
    }

    /// Build a frustum from a plane slice.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedFrustum` unless the slice holds exactly six planes.
    pub fn try_from_plane_slice(planes: &[Vec4]) -> Result<Self> {
        let planes: [Vec4; PLANE_COUNT] = planes
            .try_into()
            .map_err(|_| Error::MalformedFrustum(planes.len()))?;
        Ok(Self { planes })
    }

    /// Build a frustum from a plane slice, faulting on anything but six planes.
    ///
    /// A frustum with missing planes would silently under-cull, so this is
    /// treated as a caller bug.
    #[track_caller]
    pub fn from_plane_slice(planes: &[Vec4]) -> Self {
        match Self::try_from_plane_slice(planes) {
            Ok(frustum) => frustum,
            Err(err) => precondition_violation("galaxy3d::Frustum", "from_plane_slice", err),
        }
    }

    /// Build the frustum whose visible volume is exactly `aabb`.
    ///
    /// Useful for orthographic shadow volumes and for region-style culling.
    pub fn from_aabb(aabb: &AABB) -> Self {
        Self {
            planes: [
                Vec4::new(1.0, 0.0, 0.0, -aabb.min.x),
                Vec4::new(-1.0, 0.0, 0.0, aabb.max.x),
                Vec4::new(0.0, 1.0, 0.0, -aabb.min.y),
                Vec4::new(0.0, -1.0, 0.0, aabb.max.y),
                Vec4::new(0.0, 0.0, 1.0, -aabb.min.z),
                Vec4::new(0.0, 0.0, -1.0, aabb.max.z),
            ],
        }
    }

    /// Extract frustum planes from a view-projection matrix.
    ///
    /// Uses the Gribb & Hartmann method. Works for both perspective
    /// and orthographic projections.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let m = vp.to_cols_array_2d();

        // Gribb & Hartmann: extract planes from rows of the VP matrix
        let mut planes = [
            // Left:   row3 + row0
            Vec4::new(m[0][3] + m[0][0], m[1][3] + m[1][0], m[2][3] + m[2][0], m[3][3] + m[3][0]),
            // Right:  row3 - row0
            Vec4::new(m[0][3] - m[0][0], m[1][3] - m[1][0], m[2][3] - m[2][0], m[3][3] - m[3][0]),
            // Bottom: row3 + row1
            Vec4::new(m[0][3] + m[0][1], m[1][3] + m[1][1], m[2][3] + m[2][1], m[3][3] + m[3][1]),
            // Top:    row3 - row1
            Vec4::new(m[0][3] - m[0][1], m[1][3] - m[1][1], m[2][3] - m[2][1], m[3][3] - m[3][1]),
            // Near:   row3 + row2
            Vec4::new(m[0][3] + m[0][2], m[1][3] + m[1][2], m[2][3] + m[2][2], m[3][3] + m[3][2]),
            // Far:    row3 - row2
            Vec4::new(m[0][3] - m[0][2], m[1][3] - m[1][2], m[2][3] - m[2][2], m[3][3] - m[3][2]),
        ];

        for plane in &mut planes {
            let normal_len = Vec3::new(plane.x, plane.y, plane.z).length();
            if normal_len > 0.0 {
                *plane /= normal_len;
            }
        }

        Self { planes }
    }

    /// Signed distance of `point` to plane `index` (negative = outside).
    pub fn signed_distance(&self, index: usize, point: Vec3) -> f32 {
        let plane = self.planes[index];
        Vec3::new(plane.x, plane.y, plane.z).dot(point) + plane.w
    }

    /// Test if an AABB intersects this frustum.
    ///
    /// Uses the "positive vertex" test: for each plane, find the AABB corner
    /// most in the direction of the plane normal. If that corner is outside,
    /// the AABB is fully outside.
    ///
    /// Returns `true` if the AABB is (potentially) inside or intersecting.
    /// May return false positives (conservative), never false negatives.
    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        self.classify_aabb(aabb) != FrustumTest::Outside
    }

    /// Classify an AABB against the frustum (3-way test).
    ///
    /// Equivalent to testing all eight corners against every plane:
    /// - all corners behind one plane → `Outside` (early out)
    /// - all corners on or in front of every plane → `Inside`
    /// - otherwise → `Partial`
    ///
    /// A corner exactly on a plane counts as in front, so a box touching
    /// the frustum is never culled. Null or non-finite boxes are `Outside`.
    pub fn classify_aabb(&self, aabb: &AABB) -> FrustumTest {
        let mut plane_tests = 0;
        self.classify_aabb_counted(aabb, &mut plane_tests)
    }

    /// `classify_aabb` that also adds the number of plane evaluations
    /// performed to `plane_tests`.
    pub fn classify_aabb_counted(&self, aabb: &AABB, plane_tests: &mut u64) -> FrustumTest {
        if aabb.is_degenerate() {
            return FrustumTest::Outside;
        }

        let mut all_inside = true;

        for plane in &self.planes {
            *plane_tests += 1;
            let normal = Vec3::new(plane.x, plane.y, plane.z);

            // Positive vertex: corner with the largest signed distance
            let p_vertex = Vec3::new(
                if normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );

            if normal.dot(p_vertex) + plane.w < 0.0 {
                return FrustumTest::Outside;
            }

            // Negative vertex: corner with the smallest signed distance
            let n_vertex = Vec3::new(
                if normal.x >= 0.0 { aabb.min.x } else { aabb.max.x },
                if normal.y >= 0.0 { aabb.min.y } else { aabb.max.y },
                if normal.z >= 0.0 { aabb.min.z } else { aabb.max.z },
            );

            if normal.dot(n_vertex) + plane.w < 0.0 {
                all_inside = false;
            }
        }

        if all_inside { FrustumTest::Inside } else { FrustumTest::Partial }
    }
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
