//! Camera module: frustum planes for culling.
//!
//! The index does NOT own cameras. The caller computes the six planes
//! (or a view-projection matrix) and hands a `Frustum` to the walk.

mod frustum;

pub use frustum::{
    Frustum, FrustumTest,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR, PLANE_COUNT,
};
