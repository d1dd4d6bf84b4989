//! Voxel volume boundary and the region snapshots handed to extraction.
//!
//! The octree never reads live voxel storage from a worker thread. Instead the
//! owning thread copies the voxels a node needs into a [`VolumeSnapshot`] and
//! moves that snapshot into the extraction task.

use glam::IVec3;

use crate::config::ConstructionMode;
use crate::region::Region;

/// Dense voxel storage the octree reads from.
pub trait VoxelVolume {
  /// Voxel value. `Default` is the empty voxel and the value read outside the
  /// enclosing region.
  type Voxel: Copy + Default + PartialEq + Send + Sync + 'static;

  /// Region the volume stores voxels for.
  fn enclosing_region(&self) -> Region;

  /// Read a voxel. Positions outside the enclosing region read as empty.
  fn voxel(&self, position: IVec3) -> Self::Voxel;

  /// Write a voxel. Returns `false` if the position is outside the volume.
  fn set_voxel(&mut self, position: IVec3, value: Self::Voxel) -> bool;

  /// Change the enclosing region, keeping voxels that stay inside it.
  fn resize(&mut self, region: Region);
}

/// Dense in-memory volume.
#[derive(Clone, Debug)]
pub struct RawVolume<V> {
  region: Region,
  voxels: Vec<V>,
}

impl<V: Copy + Default> RawVolume<V> {
  /// Create an empty volume covering `region`.
  pub fn new(region: Region) -> Self {
    Self {
      region,
      voxels: vec![V::default(); region.volume() as usize],
    }
  }

  /// Create a volume filled by a function of the position.
  pub fn from_fn(region: Region, mut f: impl FnMut(IVec3) -> V) -> Self {
    let mut volume = Self::new(region);
    for z in region.min.z..region.max.z {
      for y in region.min.y..region.max.y {
        for x in region.min.x..region.max.x {
          let position = IVec3::new(x, y, z);
          if let Some(index) = volume.index_of(position) {
            volume.voxels[index] = f(position);
          }
        }
      }
    }
    volume
  }

  /// Flat index of a position, X fastest.
  #[inline]
  fn index_of(&self, position: IVec3) -> Option<usize> {
    if !self.region.contains(position) {
      return None;
    }
    let size = self.region.size();
    let local = position - self.region.min;
    Some((local.x + local.y * size.x + local.z * size.x * size.y) as usize)
  }
}

impl<V> VoxelVolume for RawVolume<V>
where
  V: Copy + Default + PartialEq + Send + Sync + 'static,
{
  type Voxel = V;

  fn enclosing_region(&self) -> Region {
    self.region
  }

  #[inline]
  fn voxel(&self, position: IVec3) -> V {
    self
      .index_of(position)
      .map(|index| self.voxels[index])
      .unwrap_or_default()
  }

  fn set_voxel(&mut self, position: IVec3, value: V) -> bool {
    match self.index_of(position) {
      Some(index) => {
        self.voxels[index] = value;
        true
      }
      None => false,
    }
  }

  fn resize(&mut self, region: Region) {
    let old = std::mem::replace(self, Self::new(region));
    if let Some(overlap) = old.region.intersection(&region) {
      for z in overlap.min.z..overlap.max.z {
        for y in overlap.min.y..overlap.max.y {
          for x in overlap.min.x..overlap.max.x {
            let position = IVec3::new(x, y, z);
            self.set_voxel(position, old.voxel(position));
          }
        }
      }
    }
  }
}

/// Immutable copy of the voxels one octree node covers.
///
/// Samples are taken every `step` voxels starting at `origin`; coarse nodes use
/// a larger step so every node snapshot has roughly the same sample count.
/// `padding` extra samples surround the node bounds on every side.
#[derive(Clone, Debug)]
pub struct VolumeSnapshot<V> {
  region: Region,
  origin: IVec3,
  step: i32,
  padding: i32,
  dims: IVec3,
  mode: ConstructionMode,
  samples: Vec<V>,
}

impl<V: Copy + Default> VolumeSnapshot<V> {
  /// Copy the voxels of `region` out of a volume.
  pub fn capture<Vol>(volume: &Vol, region: Region, step: i32, mode: ConstructionMode) -> Self
  where
    Vol: VoxelVolume<Voxel = V> + ?Sized,
  {
    let step = step.max(1);
    let padding = mode.padding();
    let interior = (region.size() + IVec3::splat(step - 1)) / step;
    let dims = interior + IVec3::splat(2 * padding);
    let origin = region.min - IVec3::splat(padding * step);

    let mut samples = Vec::with_capacity((dims.x * dims.y * dims.z).max(0) as usize);
    for z in 0..dims.z {
      for y in 0..dims.y {
        for x in 0..dims.x {
          samples.push(volume.voxel(origin + IVec3::new(x, y, z) * step));
        }
      }
    }

    Self {
      region,
      origin,
      step,
      padding,
      dims,
      mode,
      samples,
    }
  }

  /// Read a sample by grid coordinate in `[0, dims)`. Outside reads as empty.
  #[inline]
  pub fn get(&self, sample: IVec3) -> V {
    if sample.cmplt(IVec3::ZERO).any() || sample.cmpge(self.dims).any() {
      return V::default();
    }
    let index = sample.x + sample.y * self.dims.x + sample.z * self.dims.x * self.dims.y;
    self.samples[index as usize]
  }
}

impl<V> VolumeSnapshot<V> {
  /// Node bounds the snapshot was taken for.
  pub fn region(&self) -> Region {
    self.region
  }

  /// Voxels between adjacent samples.
  pub fn step(&self) -> i32 {
    self.step
  }

  /// Samples of padding on every side.
  pub fn padding(&self) -> i32 {
    self.padding
  }

  /// Sample grid size including padding.
  pub fn dims(&self) -> IVec3 {
    self.dims
  }

  /// Construction mode the snapshot was taken with.
  pub fn mode(&self) -> ConstructionMode {
    self.mode
  }

  /// Sample grid coordinates of the node interior (padding excluded).
  pub fn interior(&self) -> Region {
    Region::new(IVec3::splat(self.padding), self.dims - IVec3::splat(self.padding))
  }

  /// Volume-space position of a sample grid coordinate.
  #[inline]
  pub fn sample_position(&self, sample: IVec3) -> IVec3 {
    self.origin + sample * self.step
  }
}

#[cfg(test)]
#[path = "volume_test.rs"]
mod volume_test;
