//! Region - integer axis-aligned box used for every bound in the crate.
//!
//! Regions are half-open: `min` is inclusive, `max` is exclusive. A region
//! with `min == max` on any axis has zero volume and is degenerate.

use glam::{IVec3, Vec3};
use smallvec::SmallVec;

/// Integer axis-aligned box `[min, max)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Region {
  /// Minimum corner (inclusive).
  pub min: IVec3,
  /// Maximum corner (exclusive).
  pub max: IVec3,
}

impl Region {
  /// Create a region from its corners.
  ///
  /// Inverted corners are representable; construction paths that require a
  /// usable region check [`Region::is_degenerate`] themselves.
  #[inline]
  pub const fn new(min: IVec3, max: IVec3) -> Self {
    Self { min, max }
  }

  /// Create a region from its minimum corner and extent.
  #[inline]
  pub fn from_size(min: IVec3, size: IVec3) -> Self {
    Self {
      min,
      max: min + size,
    }
  }

  /// Region covering a single voxel.
  #[inline]
  pub fn unit(position: IVec3) -> Self {
    Self::from_size(position, IVec3::ONE)
  }

  /// Extent on each axis (`max - min`).
  #[inline]
  pub fn size(&self) -> IVec3 {
    self.max - self.min
  }

  /// Largest extent over the three axes.
  #[inline]
  pub fn max_extent(&self) -> i32 {
    self.size().max_element()
  }

  /// Number of voxels covered, 0 for degenerate regions.
  pub fn volume(&self) -> u64 {
    if self.is_degenerate() {
      return 0;
    }
    let size = self.size().as_i64vec3();
    (size.x * size.y * size.z) as u64
  }

  /// `min > max` on some axis.
  #[inline]
  pub fn is_inverted(&self) -> bool {
    self.min.cmpgt(self.max).any()
  }

  /// Zero or negative extent on some axis.
  #[inline]
  pub fn is_degenerate(&self) -> bool {
    self.min.cmpge(self.max).any()
  }

  /// Check if two regions share at least one voxel.
  ///
  /// Regions that only touch along a face do not intersect.
  #[inline]
  pub fn intersects(&self, other: &Region) -> bool {
    self.min.cmplt(other.max).all() && other.min.cmplt(self.max).all()
  }

  /// Check if a voxel coordinate lies inside the region.
  #[inline]
  pub fn contains(&self, point: IVec3) -> bool {
    point.cmpge(self.min).all() && point.cmplt(self.max).all()
  }

  /// Check if `other` lies completely inside this region.
  #[inline]
  pub fn contains_region(&self, other: &Region) -> bool {
    other.min.cmpge(self.min).all() && other.max.cmple(self.max).all()
  }

  /// Overlapping part of two regions, `None` if they do not intersect.
  pub fn intersection(&self, other: &Region) -> Option<Region> {
    if !self.intersects(other) {
      return None;
    }
    Some(Region::new(self.min.max(other.min), self.max.min(other.max)))
  }

  /// Grow (or shrink, for negative amounts) the region on every side.
  #[inline]
  pub fn grow(&self, amount: i32) -> Region {
    Region::new(self.min - IVec3::splat(amount), self.max + IVec3::splat(amount))
  }

  /// Split the region into its octants.
  ///
  /// Octant bits follow the octree child convention:
  /// - bit 0: upper X half
  /// - bit 1: upper Y half
  /// - bit 2: upper Z half
  ///
  /// An axis of extent 1 cannot be halved, so the upper half on that axis is
  /// empty and the matching octants are omitted. Octants are returned in
  /// ascending order.
  pub fn subdivide(&self) -> SmallVec<[(u8, Region); 8]> {
    let mid = self.min + (self.size() + IVec3::ONE) / 2;
    let mut octants = SmallVec::new();

    for octant in 0..8u8 {
      let upper = IVec3::new(
        (octant & 1) as i32,
        ((octant >> 1) & 1) as i32,
        ((octant >> 2) & 1) as i32,
      );
      let min = IVec3::select(upper.cmpeq(IVec3::ONE), mid, self.min);
      let max = IVec3::select(upper.cmpeq(IVec3::ONE), self.max, mid);
      let child = Region::new(min, max);
      if !child.is_degenerate() {
        octants.push((octant, child));
      }
    }

    octants
  }

  /// Minimum corner as floating point.
  #[inline]
  pub fn min_f32(&self) -> Vec3 {
    self.min.as_vec3()
  }

  /// Maximum corner as floating point.
  #[inline]
  pub fn max_f32(&self) -> Vec3 {
    self.max.as_vec3()
  }

  /// Geometric center of the region.
  #[inline]
  pub fn center(&self) -> Vec3 {
    (self.min_f32() + self.max_f32()) * 0.5
  }

  /// Squared distance from a point to the closest point of the region.
  ///
  /// Zero when the point is inside.
  #[inline]
  pub fn distance_squared_to(&self, point: Vec3) -> f32 {
    let closest = point.clamp(self.min_f32(), self.max_f32());
    point.distance_squared(closest)
  }
}

#[cfg(test)]
#[path = "region_test.rs"]
mod region_test;
