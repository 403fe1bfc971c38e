/*!
# Galaxy 3D Octree

Dynamic loose octree scene index with hierarchical frustum culling for the
Galaxy 3D engine.

Every entity lives in exactly one octant, chosen by its size. Octants are
tested through loose culling bounds (their tight bounds grown by one side
length in every direction), so entities
never need to be split across octants. Each octant keeps the number of
entities in its subtree, which lets the visibility walk skip empty
subtrees without touching them.

## Architecture

- **OctreeSceneIndex**: the loose octree (insert, update, remove, resize)
- **VisibilityWalk**: 3-way frustum culling with subtree acceptance
- **Frustum**: six inward-facing planes, AABB classification
- **Scene / Updater / CameraCuller**: per-frame glue that feeds the index
  and turns walk results into a `RenderView`

The index never owns entities. It identifies them by `EntityKey` and only
reads their world-space bounds.
*/

// Internal modules
mod error;
pub mod log;
pub mod camera;
pub mod scene;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging sub-module (types and logger slot, NOT macros)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger, NullLogger,
            set_logger, reset_logger,
        };
    }

    // Camera sub-module (frustum planes)
    pub mod camera {
        pub use crate::camera::*;
    }

    // Scene sub-module (index, walk, scene glue)
    pub mod scene {
        pub use crate::scene::*;
    }
}

// Re-export math library at crate root
pub use glam;
