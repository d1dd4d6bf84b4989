//! VoxelWorld - a volume, its octree and the sink its meshes go to.
//!
//! The world owns everything needed to keep a volume rendered: voxel edits go
//! through it so they are marked on the octree, and `tick` runs the update
//! pass on a fixed low-frequency cadence.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use glam::{Affine3A, IVec3, Vec3};

use crate::config::OctreeConfig;
use crate::debug::{self, DebugDraw, DebugStyle};
use crate::error::Result;
use crate::extract::SurfaceExtractor;
use crate::octree::SparseOctree;
use crate::presentation::MeshSink;
use crate::region::Region;
use crate::time::{Clock, Timestamp};
use crate::volume::VoxelVolume;

// =============================================================================
// WorldId - unique identifier
// =============================================================================

static WORLD_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque world identifier, unique within the process.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct WorldId(u64);

impl WorldId {
  pub fn new() -> Self {
    Self(WORLD_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
  }

  pub fn raw(&self) -> u64 {
    self.0
  }
}

impl Default for WorldId {
  fn default() -> Self {
    Self::new()
  }
}

// =============================================================================
// VoxelWorld - volume + octree + sink
// =============================================================================

/// Voxel volume kept in sync with its rendered meshes.
///
/// # Transform
///
/// `transform` places the volume in global space. Viewer positions passed to
/// [`tick`](Self::tick) are global and converted with
/// [`viewer_to_local`](Self::viewer_to_local); debug lines are converted back.
pub struct VoxelWorld<Vol: VoxelVolume, S: MeshSink> {
  /// Unique world identifier.
  pub id: WorldId,
  /// Volume space to global space.
  pub transform: Affine3A,
  volume: Vol,
  octree: SparseOctree<Vol::Voxel>,
  sink: S,
  /// Time accumulated towards the next update.
  since_update: Duration,
}

impl<Vol, S> VoxelWorld<Vol, S>
where
  Vol: VoxelVolume,
  S: MeshSink,
{
  /// Build the octree over the volume and request an initial mesh for all of
  /// it.
  pub fn new(
    volume: Vol,
    extractor: impl SurfaceExtractor<Vol::Voxel>,
    sink: S,
    config: OctreeConfig,
  ) -> Result<Self> {
    let mut octree = SparseOctree::from_volume(&volume, extractor, config)?;
    octree.mark_all(Timestamp::ZERO);
    Ok(Self {
      id: WorldId::new(),
      transform: Affine3A::IDENTITY,
      volume,
      octree,
      sink,
      since_update: Duration::ZERO,
    })
  }

  /// Replace the octree clock. Readings must stay above
  /// [`Timestamp::ZERO`], which marks the initial mesh request.
  pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
    self.octree = self.octree.with_clock(clock);
    self
  }

  pub fn set_transform(&mut self, transform: Affine3A) {
    self.transform = transform;
  }

  /// Convert a global position to volume space.
  #[inline]
  pub fn viewer_to_local(&self, global_pos: Vec3) -> Vec3 {
    self.transform.inverse().transform_point3(global_pos)
  }

  /// Convert a volume space position to global space.
  #[inline]
  pub fn local_to_world(&self, local_pos: Vec3) -> Vec3 {
    self.transform.transform_point3(local_pos)
  }

  /// Write one voxel and mark it changed. Returns `false` if the position is
  /// outside the volume.
  pub fn set_voxel(&mut self, position: IVec3, value: Vol::Voxel) -> bool {
    if !self.volume.set_voxel(position, value) {
      return false;
    }
    let now = self.octree.now();
    self.octree.mark_change(position, now);
    true
  }

  /// Fill a region with one value and mark it changed once.
  pub fn fill_region(&mut self, region: Region, value: Vol::Voxel) {
    let Some(region) = region.intersection(&self.volume.enclosing_region()) else {
      return;
    };
    for z in region.min.z..region.max.z {
      for y in region.min.y..region.max.y {
        for x in region.min.x..region.max.x {
          self.volume.set_voxel(IVec3::new(x, y, z), value);
        }
      }
    }
    let now = self.octree.now();
    self.octree.mark_change_region(region, now);
  }

  /// Resize the volume and rebuild the octree over the new region.
  ///
  /// All existing sections are cleared and the whole volume is remeshed.
  pub fn resize(&mut self, region: Region) -> Result<()> {
    self.octree.reset(region, &mut self.sink)?;
    self.volume.resize(region);
    self.octree.mark_all(Timestamp::ZERO);
    self.since_update = Duration::ZERO;
    Ok(())
  }

  /// Advance the update cadence by `elapsed`.
  ///
  /// Runs an update pass once per `update_interval` and returns its result;
  /// returns `None` when no pass was due. Missed intervals are not replayed.
  pub fn tick(&mut self, elapsed: Duration, viewer: Vec3) -> Option<bool> {
    self.since_update += elapsed;
    let interval = self.octree.config().update_interval;
    if self.since_update < interval {
      return None;
    }
    self.since_update = match interval.as_nanos() {
      0 => Duration::ZERO,
      nanos => Duration::from_nanos((self.since_update.as_nanos() % nanos) as u64),
    };
    Some(self.update(viewer))
  }

  /// Run an update pass now. `viewer` is in global space.
  pub fn update(&mut self, viewer: Vec3) -> bool {
    let local = self.viewer_to_local(viewer);
    self.octree.update(local, &self.volume, &mut self.sink)
  }

  /// Draw every childless node's bounds in global space.
  pub fn draw_debug_octree<D>(&self, drawer: &mut D, style: &DebugStyle) -> usize
  where
    D: DebugDraw + ?Sized,
  {
    let mut global = Transformed {
      inner: drawer,
      transform: self.transform,
    };
    debug::draw_debug_octree(&self.octree, &mut global, style)
  }

  pub fn volume(&self) -> &Vol {
    &self.volume
  }

  pub fn octree(&self) -> &SparseOctree<Vol::Voxel> {
    &self.octree
  }

  pub fn sink(&self) -> &S {
    &self.sink
  }

  pub fn sink_mut(&mut self) -> &mut S {
    &mut self.sink
  }
}

/// Applies the world transform to lines on their way to the host drawer.
struct Transformed<'a, D: ?Sized> {
  inner: &'a mut D,
  transform: Affine3A,
}

impl<D: DebugDraw + ?Sized> DebugDraw for Transformed<'_, D> {
  fn draw_line(&mut self, start: Vec3, end: Vec3, style: &DebugStyle) {
    let start = self.transform.transform_point3(start);
    let end = self.transform.transform_point3(end);
    self.inner.draw_line(start, end, style);
  }
}

#[cfg(test)]
#[path = "world_test.rs"]
mod world_test;
