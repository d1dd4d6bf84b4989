//! OctreeNode - one arena slot of the sparse octree.
//!
//! Nodes reference each other by [`NodeIndex`] so the arena can grow without
//! invalidating links. Depth counts up from the leaves: depth 0 is the finest
//! level, the root sits at the tree's max depth.

use crate::region::Region;
use crate::task::ExtractionTask;
use crate::time::Timestamp;

/// Stable index of a node in the octree arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
  /// Sentinel for "no node" (no parent, no child).
  pub const NONE: Self = Self(u32::MAX);

  #[inline]
  pub fn is_none(self) -> bool {
    self == Self::NONE
  }

  #[inline]
  pub fn is_some(self) -> bool {
    self != Self::NONE
  }

  /// Arena slot, for use as a map key or array index.
  #[inline]
  pub fn raw(self) -> u32 {
    self.0
  }
}

impl Default for NodeIndex {
  fn default() -> Self {
    Self::NONE
  }
}

/// Octree node.
///
/// Octant: 0-7 where bits represent the upper half on each axis:
/// - bit 0: +X
/// - bit 1: +Y
/// - bit 2: +Z
#[derive(Debug)]
pub struct OctreeNode {
  /// Own arena index.
  pub index: NodeIndex,
  /// Parent index, `NONE` for the root.
  pub parent: NodeIndex,
  /// Child per octant, `NONE` where the octant is empty or not yet built.
  pub children: [NodeIndex; 8],
  /// Children have been materialised.
  pub has_children: bool,
  /// Levels above the leaves (0 = leaf).
  pub depth: u32,
  /// Voxels covered by this node.
  pub bounds: Region,
  /// Last edit inside the bounds. `None` = never edited.
  pub data_last_modified: Option<Timestamp>,
  /// Last time a mesh (or an empty result) was applied.
  pub mesh_last_changed: Option<Timestamp>,
  /// Last time an extraction was spawned.
  pub scheduled_last_update: Option<Timestamp>,
  pub(crate) task: Option<ExtractionTask>,
}

impl OctreeNode {
  pub(crate) fn new(index: NodeIndex, parent: NodeIndex, depth: u32, bounds: Region) -> Self {
    Self {
      index,
      parent,
      children: [NodeIndex::NONE; 8],
      has_children: false,
      depth,
      bounds,
      data_last_modified: None,
      mesh_last_changed: None,
      scheduled_last_update: None,
      task: None,
    }
  }

  /// The mesh reflects the latest edit.
  ///
  /// Nodes that were never edited have nothing to mesh and count as up to
  /// date.
  #[inline]
  pub fn is_up_to_date(&self) -> bool {
    self.data_last_modified.is_none() || self.mesh_last_changed > self.data_last_modified
  }

  /// An extraction was spawned after both the latest edit and the latest
  /// mesh.
  #[inline]
  pub fn is_scheduled(&self) -> bool {
    self.scheduled_last_update > self.data_last_modified
      && self.scheduled_last_update > self.mesh_last_changed
  }

  #[inline]
  pub fn is_task_running(&self) -> bool {
    self.task.is_some()
  }

  /// In-flight extraction, if any.
  pub fn task(&self) -> Option<&ExtractionTask> {
    self.task.as_ref()
  }

  /// Finest level; never subdivided.
  #[inline]
  pub fn is_leaf(&self) -> bool {
    self.depth == 0
  }

  /// Existing children in octant order.
  pub fn children(&self) -> impl Iterator<Item = NodeIndex> + '_ {
    self.children.iter().copied().filter(|child| child.is_some())
  }

  /// Raise the data stamp, never lowering it.
  #[inline]
  pub(crate) fn stamp_data(&mut self, time: Timestamp) {
    self.data_last_modified = self.data_last_modified.max(Some(time));
  }

  /// Raise the mesh stamp, never lowering it.
  #[inline]
  pub(crate) fn stamp_mesh(&mut self, time: Timestamp) {
    self.mesh_last_changed = self.mesh_last_changed.max(Some(time));
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
