//! Change marking - stamps edits onto every node whose bounds they touch.
//!
//! A mark descends from the root into intersecting children only. Where a
//! mark only partly covers a node, the node's children are built so the stamp
//! lands on exactly the children that were touched. Where it covers a node
//! completely, the node and its existing subtree are stamped without building
//! anything: children built later inherit the stamp.

use glam::IVec3;
use tracing::trace;

use super::{NodeIndex, SparseOctree, TraverseOptions};
use crate::region::Region;
use crate::time::Timestamp;

impl<V> SparseOctree<V> {
  /// Record an edit of a single voxel.
  pub fn mark_change(&mut self, position: IVec3, time: Timestamp) {
    self.mark_change_region(Region::unit(position), time);
  }

  /// Request a remesh of the whole tree.
  pub fn mark_all(&mut self, time: Timestamp) {
    self.mark_change_region(self.bounds, time);
  }

  /// Record an edit of every voxel in `region`.
  ///
  /// `data_last_modified` becomes `max(current, time)`, so late marks with an
  /// older time never move a stamp backwards.
  #[tracing::instrument(level = "trace", skip(self))]
  pub fn mark_change_region(&mut self, region: Region, time: Timestamp) {
    let mut stamped = 0usize;
    let mut stack = vec![self.root];

    while let Some(index) = stack.pop() {
      let bounds = self.node(index).bounds;
      if !bounds.intersects(&region) {
        continue;
      }

      if region.contains_region(&bounds) {
        stamped += self.stamp_subtree(index, time);
        continue;
      }

      // Build before stamping: new children take the pre-edit stamp and only
      // the intersecting ones are raised below.
      self.build_node(index);
      self.node_mut(index).stamp_data(time);
      stamped += 1;
      stack.extend(self.node(index).children());
    }

    trace!(stamped, "marked change");
  }

  /// Stamp a node and all its existing descendants.
  fn stamp_subtree(&mut self, start: NodeIndex, time: Timestamp) -> usize {
    let mut subtree = Vec::new();
    self.traverse_from(start, |node| {
      subtree.push(node.index);
      TraverseOptions::Continue
    });
    for &index in &subtree {
      self.node_mut(index).stamp_data(time);
    }
    subtree.len()
  }
}

#[cfg(test)]
#[path = "mark_test.rs"]
mod mark_test;
