//! OctreeConfig - construction, LOD and scheduling settings.

use std::time::Duration;

use crate::error::{OctreeError, Result};
use crate::region::Region;

/// How node bounds relate to the voxels handed to the extractor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConstructionMode {
  /// Generate mesh only for voxels inside the node bounds.
  BoundVoxels,
  /// Also generate the cell faces on the bounds, by sampling one extra voxel
  /// around each node.
  #[default]
  BoundCells,
}

impl ConstructionMode {
  /// Samples of padding added on every side of a node snapshot.
  #[inline]
  pub fn padding(self) -> i32 {
    match self {
      ConstructionMode::BoundVoxels => 0,
      ConstructionMode::BoundCells => 1,
    }
  }
}

/// Where extraction tasks run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionMode {
  /// On rayon's thread pool; results are polled on later updates.
  #[default]
  Async,
  /// On the calling thread while spawning. For hosts without worker threads
  /// (wasm without atomics) and deterministic tests.
  Inline,
}

/// Configuration for octree construction and the update pass.
#[derive(Clone, Debug)]
pub struct OctreeConfig {
  /// Smallest leaf extent in voxels. Subdivision stops before a node would be
  /// split below this size.
  pub min_leaf_size: i32,

  /// Hard cap on tree depth regardless of region size.
  pub max_depth_cap: u32,

  /// Which voxels around a node are handed to the extractor.
  pub construction_mode: ConstructionMode,

  /// LOD exponent: scales the default distance thresholds.
  /// threshold = node_extent * 2^lod_exponent
  pub lod_exponent: f32,

  /// Where extraction tasks run.
  pub execution: ExecutionMode,

  /// Maximum tasks spawned by one update pass (0 = unlimited).
  pub max_tasks_per_update: usize,

  /// Cadence at which a [`VoxelWorld`](crate::VoxelWorld) runs its update.
  pub update_interval: Duration,
}

impl OctreeConfig {
  /// Compute the maximum depth for a region.
  ///
  /// Starts from the largest extent and halves while the half is still at
  /// least `min_leaf_size`, up to `max_depth_cap`. Depth 0 is the leaf level.
  /// An extent of 1 cannot be split, so it always ends the descent.
  pub fn max_depth_for(&self, region: &Region) -> u32 {
    let mut extent = region.max_extent();
    let mut depth = 0;
    while depth < self.max_depth_cap && extent > 1 && (extent + 1) / 2 >= self.min_leaf_size {
      extent = (extent + 1) / 2;
      depth += 1;
    }
    depth
  }

  /// Check the settings that construction depends on.
  pub fn validate(&self) -> Result<()> {
    if self.min_leaf_size < 1 {
      return Err(OctreeError::InvalidLeafSize(self.min_leaf_size));
    }
    Ok(())
  }

  pub fn with_min_leaf_size(mut self, size: i32) -> Self {
    self.min_leaf_size = size;
    self
  }

  pub fn with_max_depth_cap(mut self, cap: u32) -> Self {
    self.max_depth_cap = cap;
    self
  }

  pub fn with_construction_mode(mut self, mode: ConstructionMode) -> Self {
    self.construction_mode = mode;
    self
  }

  pub fn with_lod_exponent(mut self, exponent: f32) -> Self {
    self.lod_exponent = exponent;
    self
  }

  pub fn with_execution(mut self, execution: ExecutionMode) -> Self {
    self.execution = execution;
    self
  }

  pub fn with_max_tasks_per_update(mut self, max: usize) -> Self {
    self.max_tasks_per_update = max;
    self
  }

  pub fn with_update_interval(mut self, interval: Duration) -> Self {
    self.update_interval = interval;
    self
  }
}

impl Default for OctreeConfig {
  fn default() -> Self {
    Self {
      min_leaf_size: 16,
      max_depth_cap: 12,
      construction_mode: ConstructionMode::default(),
      lod_exponent: 0.0,
      execution: ExecutionMode::default(),
      max_tasks_per_update: 0,
      update_interval: Duration::from_secs(1),
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
