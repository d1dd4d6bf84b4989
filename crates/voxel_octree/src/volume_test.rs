use glam::IVec3;

use super::*;

fn cube(min: i32, max: i32) -> Region {
  Region::new(IVec3::splat(min), IVec3::splat(max))
}

#[test]
fn test_raw_volume_get_set() {
  let mut volume = RawVolume::<u32>::new(cube(0, 8));
  assert_eq!(volume.enclosing_region(), cube(0, 8));
  assert_eq!(volume.voxel(IVec3::new(1, 2, 3)), 0);

  assert!(volume.set_voxel(IVec3::new(1, 2, 3), 9));
  assert_eq!(volume.voxel(IVec3::new(1, 2, 3)), 9);
  assert_eq!(volume.voxel(IVec3::new(3, 2, 1)), 0);
}

#[test]
fn test_raw_volume_outside_reads_empty_and_rejects_writes() {
  let mut volume = RawVolume::<u32>::from_fn(cube(0, 4), |_| 1);
  assert_eq!(volume.voxel(IVec3::splat(4)), 0);
  assert_eq!(volume.voxel(IVec3::splat(-1)), 0);
  assert!(!volume.set_voxel(IVec3::splat(4), 5));
}

/// Non-zero origins index relative to the region minimum.
#[test]
fn test_raw_volume_offset_region() {
  let volume = RawVolume::<i32>::from_fn(cube(-4, 0), |p| p.x + 10 * p.y + 100 * p.z);
  assert_eq!(volume.voxel(IVec3::new(-4, -3, -2)), -4 - 30 - 200);
  assert_eq!(volume.voxel(IVec3::splat(-1)), -111);
}

#[test]
fn test_raw_volume_resize_keeps_overlap() {
  let mut volume = RawVolume::<u32>::from_fn(cube(0, 4), |p| (p.x + 1) as u32);
  volume.resize(cube(2, 8));

  assert_eq!(volume.enclosing_region(), cube(2, 8));
  assert_eq!(volume.voxel(IVec3::splat(3)), 4, "overlap is preserved");
  assert_eq!(volume.voxel(IVec3::splat(5)), 0, "new space is empty");
  assert_eq!(volume.voxel(IVec3::splat(1)), 0, "cropped space is gone");
}

#[test]
fn test_snapshot_full_resolution() {
  let volume = RawVolume::<u32>::from_fn(cube(0, 8), |p| (p.x + p.y * 8 + p.z * 64) as u32);
  let region = Region::from_size(IVec3::splat(4), IVec3::splat(4));
  let snapshot = VolumeSnapshot::capture(&volume, region, 1, ConstructionMode::BoundVoxels);

  assert_eq!(snapshot.dims(), IVec3::splat(4));
  assert_eq!(snapshot.padding(), 0);
  assert_eq!(snapshot.interior(), Region::new(IVec3::ZERO, IVec3::splat(4)));
  assert_eq!(snapshot.sample_position(IVec3::ZERO), IVec3::splat(4));
  assert_eq!(snapshot.get(IVec3::ZERO), 4 + 4 * 8 + 4 * 64);
  assert_eq!(snapshot.get(IVec3::new(1, 0, 0)), 5 + 4 * 8 + 4 * 64);
}

/// BoundCells adds one sample of padding read from neighbouring voxels.
#[test]
fn test_snapshot_bound_cells_padding() {
  let volume = RawVolume::<u32>::from_fn(cube(0, 8), |_| 1);
  let region = Region::from_size(IVec3::ZERO, IVec3::splat(4));
  let snapshot = VolumeSnapshot::capture(&volume, region, 1, ConstructionMode::BoundCells);

  assert_eq!(snapshot.dims(), IVec3::splat(6));
  assert_eq!(snapshot.interior(), Region::new(IVec3::ONE, IVec3::splat(5)));
  assert_eq!(snapshot.sample_position(IVec3::ZERO), IVec3::splat(-1));
  // Below the volume: empty. Past the node on the +X side: still inside the
  // volume.
  assert_eq!(snapshot.get(IVec3::ZERO), 0);
  assert_eq!(snapshot.get(IVec3::new(5, 1, 1)), 1);
}

#[test]
fn test_snapshot_coarse_step() {
  let volume = RawVolume::<u32>::from_fn(cube(0, 16), |p| p.x as u32);
  let region = cube(0, 16);
  let snapshot = VolumeSnapshot::capture(&volume, region, 4, ConstructionMode::BoundVoxels);

  assert_eq!(snapshot.dims(), IVec3::splat(4));
  assert_eq!(snapshot.step(), 4);
  assert_eq!(snapshot.get(IVec3::new(3, 0, 0)), 12);
  assert_eq!(snapshot.sample_position(IVec3::new(3, 1, 2)), IVec3::new(12, 4, 8));
}

#[test]
fn test_snapshot_out_of_grid_reads_empty() {
  let volume = RawVolume::<u32>::from_fn(cube(0, 4), |_| 3);
  let snapshot = VolumeSnapshot::capture(&volume, cube(0, 4), 1, ConstructionMode::BoundVoxels);
  assert_eq!(snapshot.get(IVec3::splat(-1)), 0);
  assert_eq!(snapshot.get(IVec3::splat(4)), 0);
  assert_eq!(snapshot.get(IVec3::splat(3)), 3);
}
