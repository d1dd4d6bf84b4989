//! Surface extraction boundary.
//!
//! An extractor turns a [`VolumeSnapshot`] into a triangle mesh, or `None`
//! when the region holds no surface. It runs on worker threads, so it must be
//! a pure function of the snapshot.

use glam::IVec3;

use crate::mesh::{MaterialId, MeshData};
use crate::volume::VolumeSnapshot;

/// Converts voxel data of one node into renderable geometry.
pub trait SurfaceExtractor<V>: Send + Sync + 'static {
  /// Extract the surface of a snapshot. `None` means no geometry.
  fn extract(&self, snapshot: &VolumeSnapshot<V>) -> Option<MeshData>;
}

/// Plain functions and closures are extractors.
impl<V, F> SurfaceExtractor<V> for F
where
  F: Fn(&VolumeSnapshot<V>) -> Option<MeshData> + Send + Sync + 'static,
{
  fn extract(&self, snapshot: &VolumeSnapshot<V>) -> Option<MeshData> {
    self(snapshot)
  }
}

/// Face directions with outward normals and counter-clockwise unit corners.
const FACES: [(IVec3, [[f32; 3]; 4]); 6] = [
  (IVec3::NEG_X, [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]]),
  (IVec3::X, [[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0]]),
  (IVec3::NEG_Y, [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]]),
  (IVec3::Y, [[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]]),
  (IVec3::NEG_Z, [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0]]),
  (IVec3::Z, [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]]),
];

/// Culled-face cube mesher.
///
/// Every non-empty sample becomes a cube of edge `step`; faces shared with
/// another non-empty sample are dropped. Neighbours outside the sample grid
/// count as solid, so without padding no faces are emitted on the node bounds.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockyExtractor;

impl<V> SurfaceExtractor<V> for BlockyExtractor
where
  V: Copy + Default + PartialEq + Into<MaterialId> + Send + Sync + 'static,
{
  fn extract(&self, snapshot: &VolumeSnapshot<V>) -> Option<MeshData> {
    let empty = V::default();
    let dims = snapshot.dims();
    let interior = snapshot.interior();
    let scale = snapshot.step() as f32;
    let mut mesh = MeshData::new();

    for z in interior.min.z..interior.max.z {
      for y in interior.min.y..interior.max.y {
        for x in interior.min.x..interior.max.x {
          let sample = IVec3::new(x, y, z);
          let voxel = snapshot.get(sample);
          if voxel == empty {
            continue;
          }

          let origin = snapshot.sample_position(sample).as_vec3();
          for (direction, corners) in FACES {
            let neighbor = sample + direction;
            let outside = neighbor.cmplt(IVec3::ZERO).any() || neighbor.cmpge(dims).any();
            if outside || snapshot.get(neighbor) != empty {
              continue;
            }

            let corners = corners.map(|c| (origin + glam::Vec3::from(c) * scale).to_array());
            mesh.push_quad(corners, direction.as_vec3().to_array(), voxel.into());
          }
        }
      }
    }

    (!mesh.is_empty()).then_some(mesh)
  }
}
