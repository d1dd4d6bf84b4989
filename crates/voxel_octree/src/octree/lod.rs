//! LOD policy - decides how deep the update pass refines around the viewer.

use crate::region::Region;

/// Refinement decision for one node during render-set selection.
pub trait LodPolicy: Send + Sync {
  /// Return `true` to descend into the children of a non-leaf node, `false`
  /// to render the node itself at its coarse resolution.
  ///
  /// `distance` is the Euclidean distance from the viewer to the closest
  /// point of `bounds` (0 when the viewer is inside).
  fn should_refine(&self, bounds: &Region, depth: u32, distance: f32) -> bool;
}

/// Refine while the viewer is closer than the node's own extent.
///
/// threshold = max_extent * 2^lod_exponent
///
/// Positive exponents push detail further out; negative ones pull it in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceLod {
  pub lod_exponent: f32,
}

impl DistanceLod {
  pub fn new(lod_exponent: f32) -> Self {
    Self { lod_exponent }
  }

  /// Distance below which a node of `bounds` is refined.
  #[inline]
  pub fn threshold(&self, bounds: &Region) -> f32 {
    bounds.max_extent() as f32 * self.lod_exponent.exp2()
  }
}

impl Default for DistanceLod {
  fn default() -> Self {
    Self::new(0.0)
  }
}

impl LodPolicy for DistanceLod {
  fn should_refine(&self, bounds: &Region, _depth: u32, distance: f32) -> bool {
    distance < self.threshold(bounds)
  }
}

/// Always refine: every render node is a leaf.
#[derive(Clone, Copy, Debug, Default)]
pub struct FullDetail;

impl LodPolicy for FullDetail {
  fn should_refine(&self, _bounds: &Region, _depth: u32, _distance: f32) -> bool {
    true
  }
}

/// Closures are policies.
impl<F> LodPolicy for F
where
  F: Fn(&Region, u32, f32) -> bool + Send + Sync,
{
  fn should_refine(&self, bounds: &Region, depth: u32, distance: f32) -> bool {
    self(bounds, depth, distance)
  }
}
