//! Scene management module
//!
//! Provides the loose octree scene index, its visibility walk, and the
//! scene-side strategies feeding and querying it (updating, culling).

mod aabb;
mod octant;
mod octree_scene_index;
mod scene_entity;
mod scene_index;
mod visibility_walk;
mod scene;
mod culler;
mod render_view;
mod updater;

pub use aabb::{
    AABB, Sphere, Intersection, Region,
    classify_box_box, classify_sphere_box,
};
pub use octant::{Octant, OctantId};
pub use octree_scene_index::{OctreeConfig, OctreeSceneIndex, MAX_SUPPORTED_DEPTH};
pub use scene_entity::{BoundedEntity, Renderable, EntityKey, EntityFlags, SceneEntity};
pub use scene_index::SceneIndex;
pub use visibility_walk::{VisibilityCollector, VisibilityWalk, WalkStats};
pub use scene::Scene;
pub use culler::{CameraCuller, CullPass, BruteForceCuller, FrustumCuller};
pub use render_view::RenderView;
pub use updater::{Updater, NoOpUpdater, IndexUpdater};
