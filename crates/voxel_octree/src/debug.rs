//! Debug visualization of the octree layout.
//!
//! Draws the bounds of every node that has no children through a
//! [`DebugDraw`] backend. Read-only: nothing is built or stamped.

use std::time::Duration;

use glam::Vec3;

use crate::octree::{SparseOctree, TraverseOptions};
use crate::region::Region;

/// Line appearance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebugStyle {
  /// sRGB color with alpha.
  pub color: [u8; 4],
  /// How long the lines stay on screen. Zero = one frame.
  pub duration: Duration,
  /// Line thickness in world units.
  pub thickness: f32,
}

impl Default for DebugStyle {
  fn default() -> Self {
    Self {
      color: [0, 255, 0, 255],
      duration: Duration::ZERO,
      thickness: 0.0,
    }
  }
}

/// Line renderer provided by the host. Positions are in volume space.
pub trait DebugDraw {
  fn draw_line(&mut self, start: Vec3, end: Vec3, style: &DebugStyle);

  /// Draw the 12 edges of a region.
  fn draw_region(&mut self, region: &Region, style: &DebugStyle) {
    for (start, end) in region_edges(region) {
      self.draw_line(start, end, style);
    }
  }
}

/// The 12 edges of a region's box.
pub fn region_edges(region: &Region) -> [(Vec3, Vec3); 12] {
  let lo = region.min_f32();
  let hi = region.max_f32();
  let corner = |i: usize| {
    Vec3::new(
      if i & 1 != 0 { hi.x } else { lo.x },
      if i & 2 != 0 { hi.y } else { lo.y },
      if i & 4 != 0 { hi.z } else { lo.z },
    )
  };

  // Corner pairs that differ in exactly one bit.
  const EDGES: [(usize, usize); 12] = [
    (0, 1),
    (2, 3),
    (4, 5),
    (6, 7),
    (0, 2),
    (1, 3),
    (4, 6),
    (5, 7),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
  ];
  EDGES.map(|(a, b)| (corner(a), corner(b)))
}

/// Draw the bounds of every childless node. Returns the number of boxes.
pub fn draw_debug_octree<V, D>(tree: &SparseOctree<V>, drawer: &mut D, style: &DebugStyle) -> usize
where
  D: DebugDraw + ?Sized,
{
  let mut drawn = 0;
  tree.traverse(|node| {
    if node.has_children {
      return TraverseOptions::Continue;
    }
    drawer.draw_region(&node.bounds, style);
    drawn += 1;
    TraverseOptions::Skip
  });
  drawn
}

/// Collects lines in memory.
#[derive(Clone, Debug, Default)]
pub struct LineRecorder {
  pub lines: Vec<(Vec3, Vec3, DebugStyle)>,
}

impl DebugDraw for LineRecorder {
  fn draw_line(&mut self, start: Vec3, end: Vec3, style: &DebugStyle) {
    self.lines.push((start, end, *style));
  }
}

#[cfg(test)]
mod tests {
  use glam::IVec3;

  use super::*;
  use crate::config::OctreeConfig;
  use crate::extract::BlockyExtractor;

  #[test]
  fn test_region_edges_are_axis_aligned() {
    let region = Region::new(IVec3::ZERO, IVec3::new(1, 2, 3));
    let edges = region_edges(&region);
    for (a, b) in edges {
      let delta = (b - a).abs();
      let axes = (delta.x > 0.0) as u32 + (delta.y > 0.0) as u32 + (delta.z > 0.0) as u32;
      assert_eq!(axes, 1, "edge {:?} -> {:?}", a, b);
    }
    let length: f32 = edges.iter().map(|(a, b)| a.distance(*b)).sum();
    assert_eq!(length, 4.0 * (1.0 + 2.0 + 3.0));
  }

  #[test]
  fn test_draws_childless_nodes_only() {
    let region = Region::new(IVec3::ZERO, IVec3::splat(16));
    let config = OctreeConfig::default().with_min_leaf_size(4);
    let mut tree = SparseOctree::<u32>::with_region(region, BlockyExtractor, config).unwrap();
    tree.mark_change(IVec3::ZERO, crate::time::Timestamp(1));
    let count = tree.node_count();

    let style = DebugStyle {
      color: [255, 0, 0, 255],
      duration: Duration::from_secs(1),
      thickness: 2.0,
    };
    let mut recorder = LineRecorder::default();
    let drawn = draw_debug_octree(&tree, &mut recorder, &style);

    // 7 unbuilt octants + 8 leaves of the corner octant.
    assert_eq!(drawn, 15);
    assert_eq!(recorder.lines.len(), 15 * 12);
    assert!(recorder.lines.iter().all(|(_, _, s)| *s == style));
    assert_eq!(tree.node_count(), count, "drawing builds nothing");
  }
}
