//! Update pass - poll finished extractions, pick the render set around the
//! viewer, schedule new extractions and toggle section visibility.
//!
//! # Scheduling Strategy
//!
//! 1. Tasks are polled first, so results that arrived since the last pass are
//!    applied before new work is decided.
//! 2. Render-set selection descends while the [`LodPolicy`](super::LodPolicy)
//!    asks to refine; the nodes where descent stops are rendered.
//! 3. Dirty render nodes are scheduled nearest first, bounded by
//!    `max_tasks_per_update`.
//!
//! A result is applied only if its task was spawned after the node's latest
//! edit. Older results are dropped and the node is scheduled again, so a slow
//! task can never mark newer edits as meshed.

use std::collections::HashSet;
use std::sync::Arc;

use glam::Vec3;
use tracing::{debug, trace, warn};
use web_time::Instant;

use super::{NodeIndex, SparseOctree, TraverseOptions};
use crate::presentation::{MeshSink, SectionId};
use crate::region::Region;
use crate::task::{ExtractionTask, TaskPoll};
use crate::time::Timestamp;
use crate::volume::{VolumeSnapshot, VoxelVolume};

/// Node selected for rendering and its distance to the viewer.
#[derive(Clone, Copy, Debug)]
struct RenderNode {
  index: NodeIndex,
  distance: f32,
}

impl<V> SparseOctree<V>
where
  V: Copy + Default + Send + Sync + 'static,
{
  /// Run one update pass at the tree clock's current time.
  ///
  /// Returns `true` when every rendered node is up to date and no extraction
  /// is in flight. Nodes outside the render set may still be dirty; they are
  /// refreshed once they are selected again, and their old mesh stays hidden
  /// until then.
  pub fn update<Vol, S>(&mut self, viewer: Vec3, volume: &Vol, sink: &mut S) -> bool
  where
    Vol: VoxelVolume<Voxel = V> + ?Sized,
    S: MeshSink + ?Sized,
  {
    let now = self.clock.now();
    self.update_at(viewer, volume, sink, now)
  }

  /// Run one update pass at an explicit time.
  ///
  /// `now` must come from the same clock as the mark times.
  #[tracing::instrument(level = "debug", skip(self, volume, sink))]
  pub fn update_at<Vol, S>(&mut self, viewer: Vec3, volume: &Vol, sink: &mut S, now: Timestamp) -> bool
  where
    Vol: VoxelVolume<Voxel = V> + ?Sized,
    S: MeshSink + ?Sized,
  {
    let start = Instant::now();

    self.poll_tasks(sink, now);
    let render_set = self.select_render_set(viewer);
    let spawned = self.schedule(&render_set, volume, now);
    self.update_visibility(&render_set, sink);

    let up_to_date =
      self.tasks.is_empty() && render_set.iter().all(|r| self.node(r.index).is_up_to_date());

    self
      .metrics
      .record_update(render_set.len(), start.elapsed().as_micros() as u64);
    debug!(
      render_nodes = render_set.len(),
      spawned,
      pending = self.tasks.len(),
      up_to_date,
      "octree update"
    );
    up_to_date
  }

  /// Apply finished tasks; keep the rest.
  fn poll_tasks<S>(&mut self, sink: &mut S, now: Timestamp)
  where
    S: MeshSink + ?Sized,
  {
    let mut pending = Vec::with_capacity(self.tasks.len());

    for index in std::mem::take(&mut self.tasks) {
      let node = &mut self.nodes[index.0 as usize];
      let Some(task) = node.task.as_ref() else {
        continue;
      };

      let (mesh, extract_time_us) = match task.poll() {
        TaskPoll::Pending => {
          pending.push(index);
          continue;
        }
        TaskPoll::Ready {
          mesh,
          extract_time_us,
        } => (mesh, extract_time_us),
        TaskPoll::Failed => {
          warn!(node = index.raw(), "extraction task failed, treating as empty");
          self.metrics.record_failed();
          (None, 0)
        }
      };

      let spawned_at = task.spawned_at();
      node.task = None;

      if Some(spawned_at) <= node.data_last_modified {
        trace!(node = index.raw(), "discarding stale extraction");
        self.metrics.record_stale();
        continue;
      }

      let section = SectionId::from(index);
      match mesh {
        Some(mesh) => {
          trace!(node = index.raw(), triangles = mesh.triangle_count(), "applying mesh");
          sink.set_mesh_section(section, mesh);
          sink.set_section_visibility(section, self.visible.contains(&index));
        }
        None => sink.clear_section(section),
      }
      node.stamp_mesh(now);
      self.metrics.record_applied(extract_time_us);
    }

    self.tasks = pending;
  }

  /// Walk the tree, refining where the LOD policy asks to.
  fn select_render_set(&mut self, viewer: Vec3) -> Vec<RenderNode> {
    let lod = Arc::clone(&self.lod);
    let mut render_set = Vec::new();

    self.traverse_build(|node| {
      let distance = node.bounds.distance_squared_to(viewer).sqrt();
      if !node.is_leaf() && lod.should_refine(&node.bounds, node.depth, distance) {
        return TraverseOptions::Continue;
      }
      render_set.push(RenderNode {
        index: node.index,
        distance,
      });
      TraverseOptions::Skip
    });

    render_set
  }

  /// Spawn extractions for dirty render nodes. Returns the number spawned.
  fn schedule<Vol>(&mut self, render_set: &[RenderNode], volume: &Vol, now: Timestamp) -> usize
  where
    Vol: VoxelVolume<Voxel = V> + ?Sized,
  {
    let mut candidates: Vec<RenderNode> = render_set
      .iter()
      .copied()
      .filter(|r| {
        let node = self.node(r.index);
        !node.is_up_to_date() && !node.is_scheduled() && !node.is_task_running()
      })
      .collect();
    candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let limit = match self.config.max_tasks_per_update {
      0 => usize::MAX,
      max => max,
    };
    if candidates.len() > limit {
      trace!(deferred = candidates.len() - limit, "task budget exhausted");
      candidates.truncate(limit);
    }

    for candidate in &candidates {
      self.spawn_task(candidate.index, volume, now);
    }
    self.metrics.record_spawned(candidates.len());
    candidates.len()
  }

  fn spawn_task<Vol>(&mut self, index: NodeIndex, volume: &Vol, now: Timestamp)
  where
    Vol: VoxelVolume<Voxel = V> + ?Sized,
  {
    let node = &mut self.nodes[index.0 as usize];
    let step = snapshot_step(&node.bounds, node.depth);
    let snapshot = VolumeSnapshot::capture(volume, node.bounds, step, self.config.construction_mode);

    trace!(node = index.raw(), depth = node.depth, step, "spawning extraction");
    node.task = Some(ExtractionTask::spawn(
      Arc::clone(&self.extractor),
      snapshot,
      now,
      self.config.execution,
    ));
    node.scheduled_last_update = node.scheduled_last_update.max(Some(now));
    self.tasks.push(index);
  }

  /// Show sections that entered the render set, hide those that left it.
  fn update_visibility<S>(&mut self, render_set: &[RenderNode], sink: &mut S)
  where
    S: MeshSink + ?Sized,
  {
    let next: HashSet<NodeIndex> = render_set.iter().map(|r| r.index).collect();
    for &index in next.difference(&self.visible) {
      // An outdated mesh is shown by `poll_tasks` once its refresh lands.
      let node = self.node(index);
      if !node.is_up_to_date() && node.mesh_last_changed.is_some() {
        continue;
      }
      sink.set_section_visibility(SectionId::from(index), true);
    }
    for &index in self.visible.difference(&next) {
      sink.set_section_visibility(SectionId::from(index), false);
    }
    self.visible = next;
  }
}

/// Voxels between snapshot samples: `2^depth`, but never wider than the
/// largest power of two that fits in the node.
fn snapshot_step(bounds: &Region, depth: u32) -> i32 {
  let extent = bounds.max_extent().max(1);
  let fit = 1i32 << (31 - extent.leading_zeros());
  (1i32 << depth.min(30)).min(fit)
}

#[cfg(test)]
#[path = "update_test.rs"]
mod update_test;
