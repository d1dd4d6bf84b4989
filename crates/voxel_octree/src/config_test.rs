use glam::IVec3;

use super::*;

fn cube(size: i32) -> Region {
  Region::from_size(IVec3::ZERO, IVec3::splat(size))
}

/// 16 → 8 → 4 with a leaf size of 4 gives two levels above the leaves.
#[test]
fn test_max_depth_16_leaf_4() {
  let config = OctreeConfig::default().with_min_leaf_size(4);
  assert_eq!(config.max_depth_for(&cube(16)), 2);
}

#[test]
fn test_max_depth_region_smaller_than_leaf() {
  let config = OctreeConfig::default().with_min_leaf_size(32);
  assert_eq!(config.max_depth_for(&cube(16)), 0);
}

/// The largest axis drives the depth of non-cubic regions.
#[test]
fn test_max_depth_uses_largest_extent() {
  let config = OctreeConfig::default().with_min_leaf_size(4);
  let region = Region::from_size(IVec3::ZERO, IVec3::new(64, 4, 8));
  assert_eq!(config.max_depth_for(&region), 4);
}

#[test]
fn test_max_depth_respects_cap() {
  let config = OctreeConfig::default()
    .with_min_leaf_size(1)
    .with_max_depth_cap(3);
  assert_eq!(config.max_depth_for(&cube(1024)), 3);
}

/// 16 → 8 → 4 → 2 → 1, and a single voxel cannot be split further.
#[test]
fn test_max_depth_leaf_size_one() {
  let config = OctreeConfig::default().with_min_leaf_size(1);
  assert_eq!(config.max_depth_for(&cube(16)), 4);
  assert_eq!(config.max_depth_for(&cube(17)), 5);
}

#[test]
fn test_max_depth_single_voxel_region() {
  let config = OctreeConfig::default().with_min_leaf_size(1);
  assert_eq!(config.max_depth_for(&cube(1)), 0);
}

/// Odd extents round the half up, matching `Region::subdivide`.
#[test]
fn test_max_depth_odd_extent() {
  let config = OctreeConfig::default().with_min_leaf_size(4);
  // 17 → 9 → 5, next half (3) would be below the leaf size.
  assert_eq!(config.max_depth_for(&cube(17)), 2);
}

#[test]
fn test_validate_rejects_zero_leaf_size() {
  let config = OctreeConfig::default().with_min_leaf_size(0);
  assert_eq!(config.validate(), Err(OctreeError::InvalidLeafSize(0)));
  assert!(OctreeConfig::default().validate().is_ok());
}

#[test]
fn test_defaults() {
  let config = OctreeConfig::default();
  assert_eq!(config.construction_mode, ConstructionMode::BoundCells);
  assert_eq!(config.execution, ExecutionMode::Async);
  assert_eq!(config.update_interval, Duration::from_secs(1));
  assert_eq!(config.max_tasks_per_update, 0);
}

#[test]
fn test_construction_mode_padding() {
  assert_eq!(ConstructionMode::BoundVoxels.padding(), 0);
  assert_eq!(ConstructionMode::BoundCells.padding(), 1);
}
