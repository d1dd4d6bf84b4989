//! voxel_octree - level-of-detail sparse octree for incremental voxel meshing
//!
//! This crate keeps renderable surface geometry in step with a dense voxel
//! volume without remeshing the whole volume on every edit. Each octree node
//! tracks when its voxels last changed and when its mesh was last produced;
//! a periodic update pass re-extracts only the nodes near the viewer that are
//! out of date, on rayon's thread pool.
//!
//! # Features
//!
//! - **Lazy arena octree**: nodes are built on demand and referenced by index
//! - **Timestamped dirtiness**: edits stamp only the nodes they touch
//! - **Distance LOD**: coarse nodes far from the viewer, leaves up close
//! - **Non-blocking extraction**: polled tasks, stale results discarded
//!
//! # Example
//!
//! ```ignore
//! use voxel_octree::{BlockyExtractor, MemorySink, OctreeConfig, RawVolume, Region, VoxelWorld};
//!
//! let region = Region::new(IVec3::ZERO, IVec3::splat(64));
//! let volume = RawVolume::from_fn(region, |p| (p.y < 8) as u32);
//! let mut world = VoxelWorld::new(volume, BlockyExtractor, MemorySink::new(), OctreeConfig::default())?;
//!
//! world.set_voxel(IVec3::new(3, 9, 3), 2);
//! loop {
//!   if let Some(true) = world.tick(frame_time, camera_position) {
//!     break;
//!   }
//! }
//! ```

pub mod config;
pub mod debug;
pub mod error;
pub mod extract;
pub mod mesh;
pub mod metrics;
pub mod octree;
pub mod presentation;
pub mod region;
pub mod task;
pub mod time;
pub mod volume;
pub mod world;

// Re-export commonly used items
pub use config::{ConstructionMode, ExecutionMode, OctreeConfig};
pub use debug::{draw_debug_octree, DebugDraw, DebugStyle, LineRecorder};
pub use error::{OctreeError, Result};
pub use extract::{BlockyExtractor, SurfaceExtractor};
pub use mesh::{MaterialId, MeshData, MinMaxAABB, Vertex};
pub use octree::{
  DistanceLod, FullDetail, LodPolicy, NodeIndex, OctreeNode, SparseOctree, TraverseOptions,
};
pub use presentation::{MemorySink, MeshSink, NullSink, SectionId};
pub use region::Region;
pub use task::{ExtractionTask, TaskId, TaskPoll};
pub use time::{Clock, ManualClock, MonotonicClock, Timestamp};
pub use volume::{RawVolume, VolumeSnapshot, VoxelVolume};
pub use world::{VoxelWorld, WorldId};

pub use glam;
