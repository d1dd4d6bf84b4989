//! Errors returned by octree construction.

use crate::region::Region;

/// Errors that can occur while building a [`SparseOctree`](crate::SparseOctree).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OctreeError {
  /// The region has zero volume or inverted corners.
  #[error("degenerate octree region: min {:?}, max {:?}", .0.min, .0.max)]
  DegenerateRegion(Region),
  /// The configured minimum leaf size is smaller than one voxel.
  #[error("invalid minimum leaf size: {0}")]
  InvalidLeafSize(i32),
}

/// Convenience alias for octree results.
pub type Result<T> = std::result::Result<T, OctreeError>;
