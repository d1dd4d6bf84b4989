use glam::{IVec3, Vec3};

use super::*;

fn cube(min: i32, max: i32) -> Region {
  Region::new(IVec3::splat(min), IVec3::splat(max))
}

#[test]
fn test_size_and_volume() {
  let region = Region::new(IVec3::new(0, 0, 0), IVec3::new(2, 4, 8));
  assert_eq!(region.size(), IVec3::new(2, 4, 8));
  assert_eq!(region.max_extent(), 8);
  assert_eq!(region.volume(), 64);
}

#[test]
fn test_degenerate_and_inverted() {
  let flat = Region::new(IVec3::ZERO, IVec3::new(4, 0, 4));
  assert!(flat.is_degenerate());
  assert!(!flat.is_inverted());
  assert_eq!(flat.volume(), 0);

  let inverted = Region::new(IVec3::splat(4), IVec3::ZERO);
  assert!(inverted.is_degenerate());
  assert!(inverted.is_inverted());

  assert!(!cube(0, 1).is_degenerate());
}

#[test]
fn test_intersects_overlapping() {
  let a = cube(0, 10);
  let b = cube(5, 15);
  assert!(a.intersects(&b));
  assert!(b.intersects(&a));
}

/// Half-open boxes sharing only a face do not intersect.
#[test]
fn test_intersects_touching_is_false() {
  let a = cube(0, 8);
  let b = Region::new(IVec3::new(8, 0, 0), IVec3::new(16, 8, 8));
  assert!(!a.intersects(&b));
  assert!(!b.intersects(&a));
}

#[test]
fn test_contains_point() {
  let region = cube(0, 4);
  assert!(region.contains(IVec3::ZERO));
  assert!(region.contains(IVec3::splat(3)));
  assert!(!region.contains(IVec3::splat(4)), "max corner is exclusive");
  assert!(!region.contains(IVec3::new(-1, 0, 0)));
}

#[test]
fn test_contains_region_and_intersection() {
  let outer = cube(0, 16);
  let inner = cube(4, 8);
  assert!(outer.contains_region(&inner));
  assert!(!inner.contains_region(&outer));

  let clipped = outer.intersection(&cube(12, 20)).unwrap();
  assert_eq!(clipped, cube(12, 16));
  assert!(outer.intersection(&cube(16, 20)).is_none());
}

#[test]
fn test_grow() {
  assert_eq!(cube(2, 4).grow(1), cube(1, 5));
  assert_eq!(cube(2, 6).grow(-1), cube(3, 5));
}

/// Octant bits select the upper half of X (bit 0), Y (bit 1), Z (bit 2).
#[test]
fn test_subdivide_cube_octant_order() {
  let children = cube(0, 16).subdivide();
  assert_eq!(children.len(), 8);

  for (expected_octant, (octant, child)) in children.iter().enumerate() {
    assert_eq!(*octant as usize, expected_octant);
    let offset = IVec3::new(
      (octant & 1) as i32 * 8,
      ((octant >> 1) & 1) as i32 * 8,
      ((octant >> 2) & 1) as i32 * 8,
    );
    assert_eq!(*child, Region::from_size(offset, IVec3::splat(8)));
  }
}

#[test]
fn test_subdivide_covers_parent_exactly() {
  let parent = Region::new(IVec3::new(-3, 0, 5), IVec3::new(4, 5, 6));
  let children = parent.subdivide();
  let total: u64 = children.iter().map(|(_, c)| c.volume()).sum();
  assert_eq!(total, parent.volume());

  for (i, (_, a)) in children.iter().enumerate() {
    assert!(parent.contains_region(a));
    for (_, b) in children.iter().skip(i + 1) {
      assert!(!a.intersects(b), "{:?} overlaps {:?}", a, b);
    }
  }
}

/// An axis of extent 1 cannot be halved: only lower octants remain.
#[test]
fn test_subdivide_thin_axis_omits_upper_octants() {
  let slab = Region::new(IVec3::ZERO, IVec3::new(4, 1, 4));
  let children = slab.subdivide();
  assert_eq!(children.len(), 4);
  assert!(children.iter().all(|(octant, _)| octant & 0b010 == 0));
}

#[test]
fn test_subdivide_single_voxel() {
  let children = Region::unit(IVec3::splat(7)).subdivide();
  assert_eq!(children.len(), 1);
  assert_eq!(children[0], (0, Region::unit(IVec3::splat(7))));
}

#[test]
fn test_distance_squared_to() {
  let region = cube(0, 4);
  assert_eq!(region.distance_squared_to(Vec3::splat(2.0)), 0.0);
  assert_eq!(region.distance_squared_to(Vec3::new(7.0, 2.0, 2.0)), 9.0);
  assert_eq!(region.distance_squared_to(Vec3::new(-1.0, -1.0, 2.0)), 2.0);
}

#[test]
fn test_center() {
  assert_eq!(cube(0, 4).center(), Vec3::splat(2.0));
}
