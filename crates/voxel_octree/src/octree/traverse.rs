//! Depth-first traversal with an explicit stack.
//!
//! Children are pushed in octant order and popped last-in-first-out, so
//! siblings are visited in reverse octant order (7 down to 0). The order is
//! stable for a given tree; callers that need a different one sort what they
//! collect.

use super::{NodeIndex, OctreeNode, SparseOctree};

/// What the traversal does after visiting a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraverseOptions {
  /// Descend into the node's children, then carry on.
  Continue,
  /// Do not descend into this node, but keep visiting the rest.
  Skip,
  /// Abort the whole traversal.
  Stop,
}

impl<V> SparseOctree<V> {
  /// Visit existing nodes from the root.
  pub fn traverse<F>(&self, visitor: F)
  where
    F: FnMut(&OctreeNode) -> TraverseOptions,
  {
    self.traverse_from(self.root, visitor);
  }

  /// Visit existing nodes below `start` (inclusive). Never builds children.
  ///
  /// Starting from [`NodeIndex::NONE`] visits nothing.
  pub fn traverse_from<F>(&self, start: NodeIndex, mut visitor: F)
  where
    F: FnMut(&OctreeNode) -> TraverseOptions,
  {
    if start.is_none() {
      return;
    }

    let mut stack = vec![start];
    while let Some(index) = stack.pop() {
      let node = self.node(index);
      match visitor(node) {
        TraverseOptions::Stop => return,
        TraverseOptions::Skip => {}
        TraverseOptions::Continue => stack.extend(node.children()),
      }
    }
  }

  /// Visit nodes from the root, materialising children on `Continue`.
  pub fn traverse_build<F>(&mut self, visitor: F)
  where
    F: FnMut(&OctreeNode) -> TraverseOptions,
  {
    self.traverse_build_from(self.root, visitor);
  }

  /// Visit nodes below `start` (inclusive). Returning `Continue` on a
  /// non-leaf without children builds them before descending.
  pub fn traverse_build_from<F>(&mut self, start: NodeIndex, mut visitor: F)
  where
    F: FnMut(&OctreeNode) -> TraverseOptions,
  {
    if start.is_none() {
      return;
    }

    let mut stack = vec![start];
    while let Some(index) = stack.pop() {
      match visitor(self.node(index)) {
        TraverseOptions::Stop => return,
        TraverseOptions::Skip => {}
        TraverseOptions::Continue => {
          self.build_node(index);
          stack.extend(self.node(index).children());
        }
      }
    }
  }
}

#[cfg(test)]
#[path = "traverse_test.rs"]
mod traverse_test;
