//! Sparse LOD octree over a voxel volume.
//!
//! Nodes live in an arena and are materialised lazily: construction allocates
//! only the root, and children appear when a traversal, a change mark or the
//! update pass first needs them.
//!
//! # Depth Convention
//!
//! Depth 0 = leaves (finest detail), the root sits at `max_depth`.
//!
//! ```text
//! Snapshot stride = 2^depth voxels
//! ```
//!
//! # Module Structure
//!
//! - [`node`]: `OctreeNode`, `NodeIndex` - arena slots and their timestamps
//! - [`traverse`]: explicit-stack depth-first traversal
//! - [`mark`]: stamping edits onto the nodes they touch
//! - [`update`]: polling, render-set selection, scheduling and visibility
//! - [`lod`]: `LodPolicy` and the built-in policies

pub mod lod;
pub mod mark;
pub mod node;
pub mod traverse;
pub mod update;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::config::{ConstructionMode, OctreeConfig};
use crate::error::{OctreeError, Result};
use crate::extract::SurfaceExtractor;
use crate::metrics::OctreeMetrics;
use crate::presentation::{MeshSink, SectionId};
use crate::region::Region;
use crate::time::{Clock, MonotonicClock, Timestamp};
use crate::volume::VoxelVolume;

// Re-exports
pub use lod::{DistanceLod, FullDetail, LodPolicy};
pub use node::{NodeIndex, OctreeNode};
pub use traverse::TraverseOptions;

/// Sparse octree that keeps node meshes in step with a voxel volume.
///
/// `V` is the voxel type of the volume the tree meshes.
pub struct SparseOctree<V> {
  nodes: Vec<OctreeNode>,
  root: NodeIndex,
  bounds: Region,
  max_depth: u32,
  config: OctreeConfig,
  lod: Arc<dyn LodPolicy>,
  extractor: Arc<dyn SurfaceExtractor<V>>,
  clock: Arc<dyn Clock>,
  /// Nodes holding an in-flight task.
  tasks: Vec<NodeIndex>,
  /// Render set of the last update.
  visible: HashSet<NodeIndex>,
  metrics: OctreeMetrics,
}

impl<V: Send + Sync + 'static> SparseOctree<V> {
  /// Build a tree over the volume's own enclosing region.
  pub fn from_volume<Vol>(
    volume: &Vol,
    extractor: impl SurfaceExtractor<V>,
    config: OctreeConfig,
  ) -> Result<Self>
  where
    Vol: VoxelVolume<Voxel = V> + ?Sized,
  {
    Self::with_region(volume.enclosing_region(), extractor, config)
  }

  /// Build a tree over an explicit region, which may be smaller or larger
  /// than the volume.
  pub fn with_region(
    region: Region,
    extractor: impl SurfaceExtractor<V>,
    config: OctreeConfig,
  ) -> Result<Self> {
    Self::with_shared_extractor(region, Arc::new(extractor), config)
  }

  /// Build a tree that shares an extractor with other trees.
  pub fn with_shared_extractor(
    region: Region,
    extractor: Arc<dyn SurfaceExtractor<V>>,
    config: OctreeConfig,
  ) -> Result<Self> {
    config.validate()?;
    let lod = Arc::new(DistanceLod::new(config.lod_exponent));
    let mut tree = Self {
      nodes: Vec::new(),
      root: NodeIndex::NONE,
      bounds: region,
      max_depth: 0,
      config,
      lod,
      extractor,
      clock: Arc::new(MonotonicClock::new()),
      tasks: Vec::new(),
      visible: HashSet::new(),
      metrics: OctreeMetrics::new(),
    };
    tree.rebuild(region)?;
    Ok(tree)
  }
}

impl<V> SparseOctree<V> {
  /// Replace the LOD policy (default: [`DistanceLod`] from the config).
  pub fn with_lod_policy(mut self, policy: impl LodPolicy + 'static) -> Self {
    self.lod = Arc::new(policy);
    self
  }

  /// Replace the clock used by [`update`](Self::update).
  pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
    self.clock = Arc::new(clock);
    self
  }

  /// Tear the tree down and rebuild the root over a new region.
  ///
  /// Outstanding tasks are orphaned and every section this tree pushed to
  /// `sink` is cleared.
  pub fn reset<S>(&mut self, region: Region, sink: &mut S) -> Result<()>
  where
    S: MeshSink + ?Sized,
  {
    let rebuilt = Self::validate_region(region)?;
    for node in &self.nodes {
      if node.mesh_last_changed.is_some() {
        sink.clear_section(SectionId::from(node.index));
      }
      if self.visible.contains(&node.index) {
        sink.set_section_visibility(SectionId::from(node.index), false);
      }
    }
    self.rebuild(rebuilt)
  }

  fn validate_region(region: Region) -> Result<Region> {
    if region.is_degenerate() {
      return Err(OctreeError::DegenerateRegion(region));
    }
    Ok(region)
  }

  fn rebuild(&mut self, region: Region) -> Result<()> {
    let region = Self::validate_region(region)?;
    self.nodes.clear();
    self.tasks.clear();
    self.visible.clear();
    self.bounds = region;
    self.max_depth = self.config.max_depth_for(&region);
    self.root = self.create_node(NodeIndex::NONE, self.max_depth, region);
    debug!(
      min = ?region.min,
      max = ?region.max,
      max_depth = self.max_depth,
      "built octree root"
    );
    Ok(())
  }

  /// Append a node to the arena.
  fn create_node(&mut self, parent: NodeIndex, depth: u32, bounds: Region) -> NodeIndex {
    let index = NodeIndex(self.nodes.len() as u32);
    let mut node = OctreeNode::new(index, parent, depth, bounds);
    // Children inherit edits their parent saw before they existed.
    if let Some(parent) = self.get(parent) {
      node.data_last_modified = parent.data_last_modified;
    }
    self.nodes.push(node);
    index
  }

  /// Materialise the children of `parent`, one per non-empty octant.
  ///
  /// No-op on the sentinel, on leaves and on nodes already built.
  ///
  /// # Panics
  ///
  /// Panics if `parent` is not the sentinel and not a live node.
  pub fn build_node(&mut self, parent: NodeIndex) {
    if parent.is_none() {
      return;
    }
    let node = self.node(parent);
    if node.has_children || node.is_leaf() {
      return;
    }

    let depth = node.depth - 1;
    for (octant, bounds) in node.bounds.subdivide() {
      let child = self.create_node(parent, depth, bounds);
      self.node_mut(parent).children[octant as usize] = child;
    }
    self.node_mut(parent).has_children = true;
  }

  /// Root node.
  pub fn root(&self) -> &OctreeNode {
    self.node(self.root)
  }

  pub fn root_index(&self) -> NodeIndex {
    self.root
  }

  /// Node at `index`.
  ///
  /// # Panics
  ///
  /// Panics on the sentinel or an index that is not a live node.
  pub fn node(&self, index: NodeIndex) -> &OctreeNode {
    match self.get(index) {
      Some(node) => node,
      None => panic!("invalid octree node index {:?} (count {})", index, self.nodes.len()),
    }
  }

  pub(crate) fn node_mut(&mut self, index: NodeIndex) -> &mut OctreeNode {
    let count = self.nodes.len();
    match self.nodes.get_mut(index.0 as usize) {
      Some(node) => node,
      None => panic!("invalid octree node index {:?} (count {})", index, count),
    }
  }

  /// Node at `index`, `None` for the sentinel or an unknown index.
  pub fn get(&self, index: NodeIndex) -> Option<&OctreeNode> {
    self.nodes.get(index.0 as usize)
  }

  /// Region covered by the tree.
  pub fn region(&self) -> Region {
    self.bounds
  }

  pub fn max_depth(&self) -> u32 {
    self.max_depth
  }

  /// Number of materialised nodes.
  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  /// All materialised nodes in creation order.
  pub fn nodes(&self) -> &[OctreeNode] {
    &self.nodes
  }

  pub fn construction_mode(&self) -> ConstructionMode {
    self.config.construction_mode
  }

  pub fn config(&self) -> &OctreeConfig {
    &self.config
  }

  /// Number of extraction tasks still in flight.
  pub fn pending_task_count(&self) -> usize {
    self.tasks.len()
  }

  /// Nodes selected for rendering by the last update.
  pub fn render_set(&self) -> impl Iterator<Item = NodeIndex> + '_ {
    self.visible.iter().copied()
  }

  pub fn metrics(&self) -> &OctreeMetrics {
    &self.metrics
  }

  /// Current time of the tree clock.
  pub fn now(&self) -> Timestamp {
    self.clock.now()
  }
}

impl<V> std::ops::Index<NodeIndex> for SparseOctree<V> {
  type Output = OctreeNode;

  fn index(&self, index: NodeIndex) -> &OctreeNode {
    self.node(index)
  }
}

impl<V> std::fmt::Debug for SparseOctree<V> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SparseOctree")
      .field("bounds", &self.bounds)
      .field("max_depth", &self.max_depth)
      .field("node_count", &self.nodes.len())
      .field("pending_tasks", &self.tasks.len())
      .finish()
  }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
