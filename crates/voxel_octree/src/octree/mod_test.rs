use glam::{IVec3, Vec3};

use super::*;
use crate::config::ExecutionMode;
use crate::extract::BlockyExtractor;
use crate::presentation::MemorySink;
use crate::time::Timestamp;
use crate::volume::RawVolume;

fn cube(min: i32, max: i32) -> Region {
  Region::new(IVec3::splat(min), IVec3::splat(max))
}

fn config() -> OctreeConfig {
  OctreeConfig::default().with_min_leaf_size(4)
}

fn tree(region: Region) -> SparseOctree<u32> {
  SparseOctree::with_region(region, BlockyExtractor, config()).unwrap()
}

/// [0,16)^3 with leaf 4 halves 16 -> 8 -> 4.
#[test]
fn test_max_depth_from_region() {
  let tree = tree(cube(0, 16));
  assert_eq!(tree.max_depth(), 2);
  assert_eq!(tree.region(), cube(0, 16));
  assert_eq!(tree.root().depth, 2);
  assert_eq!(tree.root().bounds, cube(0, 16));
}

#[test]
fn test_construction_allocates_root_only() {
  let tree = tree(cube(0, 16));
  assert_eq!(tree.node_count(), 1);
  assert_eq!(tree.root_index(), NodeIndex(0));
  assert!(tree.root().parent.is_none());
  assert!(!tree.root().has_children);
  assert!(tree.root().is_up_to_date());
}

#[test]
fn test_from_volume_uses_enclosing_region() {
  let volume = RawVolume::<u32>::new(Region::new(IVec3::new(-8, 0, 0), IVec3::new(8, 4, 4)));
  let tree = SparseOctree::from_volume(&volume, BlockyExtractor, config()).unwrap();
  assert_eq!(tree.region(), volume.enclosing_region());
  assert_eq!(tree.max_depth(), 2, "largest axis decides the depth");
}

#[test]
fn test_degenerate_region_rejected() {
  let flat = Region::new(IVec3::ZERO, IVec3::new(16, 0, 16));
  let err = SparseOctree::<u32>::with_region(flat, BlockyExtractor, config()).unwrap_err();
  assert_eq!(err, OctreeError::DegenerateRegion(flat));

  let inverted = Region::new(IVec3::splat(4), IVec3::ZERO);
  assert!(matches!(
    SparseOctree::<u32>::with_region(inverted, BlockyExtractor, config()),
    Err(OctreeError::DegenerateRegion(_))
  ));
}

#[test]
fn test_invalid_leaf_size_rejected() {
  let config = OctreeConfig::default().with_min_leaf_size(0);
  let err = SparseOctree::<u32>::with_region(cube(0, 16), BlockyExtractor, config).unwrap_err();
  assert_eq!(err, OctreeError::InvalidLeafSize(0));
}

#[test]
fn test_build_node_creates_octants() {
  let mut tree = tree(cube(0, 16));
  let root = tree.root_index();
  tree.build_node(root);

  assert_eq!(tree.node_count(), 9);
  assert!(tree.root().has_children);
  for (octant, child) in tree.root().children.iter().enumerate() {
    let child = &tree[*child];
    assert_eq!(child.parent, root);
    assert_eq!(child.depth, 1);
    assert_eq!(child.bounds.size(), IVec3::splat(8));
    let upper = IVec3::new(octant as i32 & 1, (octant as i32 >> 1) & 1, (octant as i32 >> 2) & 1);
    assert_eq!(child.bounds.min, upper * 8, "octant {} bounds", octant);
  }
}

#[test]
fn test_build_node_is_idempotent_and_noop_on_leaves() {
  let mut tree = tree(cube(0, 8));
  let root = tree.root_index();
  tree.build_node(root);
  tree.build_node(root);
  assert_eq!(tree.node_count(), 9);

  let leaf = tree.root().children[0];
  assert!(tree[leaf].is_leaf());
  tree.build_node(leaf);
  assert_eq!(tree.node_count(), 9);

  tree.build_node(NodeIndex::NONE);
  assert_eq!(tree.node_count(), 9);
}

/// Thin axes produce fewer than eight children.
#[test]
fn test_build_node_skips_empty_octants() {
  let region = Region::new(IVec3::ZERO, IVec3::new(8, 1, 8));
  let mut tree = SparseOctree::<u32>::with_region(region, BlockyExtractor, config()).unwrap();
  assert_eq!(tree.max_depth(), 1);

  let root = tree.root_index();
  tree.build_node(root);
  assert_eq!(tree.node_count(), 5);
  assert_eq!(tree.root().children().count(), 4);
  assert!(tree.root().children[2].is_none(), "upper Y octant is empty");
}

#[test]
fn test_get_and_index() {
  let tree = tree(cube(0, 16));
  assert!(tree.get(NodeIndex::NONE).is_none());
  assert!(tree.get(NodeIndex(5)).is_none());
  assert_eq!(tree[NodeIndex(0)].index, NodeIndex(0));
}

#[test]
#[should_panic(expected = "invalid octree node index")]
fn test_node_on_bad_index_panics() {
  let tree = tree(cube(0, 16));
  let _ = tree.node(NodeIndex(42));
}

/// Children built after an edit inherit the parent's data stamp.
#[test]
fn test_late_children_inherit_data_stamp() {
  let mut tree = tree(cube(0, 16));
  tree.mark_all(Timestamp(5));
  assert_eq!(tree.node_count(), 1, "a covering mark builds nothing");

  let root = tree.root_index();
  tree.build_node(root);
  for child in tree.root().children() {
    assert_eq!(tree[child].data_last_modified, Some(Timestamp(5)));
    assert!(!tree[child].is_up_to_date());
  }
}

#[test]
fn test_reset_rebuilds_and_clears_sections() {
  let volume = RawVolume::<u32>::from_fn(cube(0, 8), |_| 1);
  let config = config().with_execution(ExecutionMode::Inline);
  let mut tree = SparseOctree::from_volume(&volume, BlockyExtractor, config).unwrap();
  let mut sink = MemorySink::new();

  tree.mark_all(Timestamp(1));
  tree.update_at(Vec3::ZERO, &volume, &mut sink, Timestamp(2));
  tree.update_at(Vec3::ZERO, &volume, &mut sink, Timestamp(3));
  assert!(sink.uploads > 0);

  tree.reset(cube(0, 32), &mut sink).unwrap();
  assert_eq!(tree.node_count(), 1);
  assert_eq!(tree.region(), cube(0, 32));
  assert_eq!(tree.max_depth(), 3);
  assert_eq!(tree.pending_task_count(), 0);
  assert_eq!(sink.visible_triangle_count(), 0);
  assert!(sink.visible_meshes().next().is_none());

  assert!(tree.reset(cube(0, 0), &mut sink).is_err());
  assert_eq!(tree.region(), cube(0, 32), "failed reset keeps the tree");
}
