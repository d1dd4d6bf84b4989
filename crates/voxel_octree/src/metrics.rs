//! Octree statistics: task counters and timing history.
//!
//! Feature-gated and runtime-toggled so a build without `--features metrics`
//! pays only a branch on a constant.
//!
//! ```ignore
//! use std::sync::atomic::Ordering;
//! use voxel_octree::metrics::COLLECT_METRICS;
//!
//! // Compile with --features metrics, then pause collection at runtime:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! let stats = octree.metrics();
//! println!("avg extract: {:.0}us", stats.extract_timings.average());
//! ```

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;

/// Runtime toggle for metrics collection.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

/// Fixed-capacity history of recent values.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
  buffer: VecDeque<T>,
  capacity: usize,
}

impl<T> RollingWindow<T> {
  pub fn new(capacity: usize) -> Self {
    Self {
      buffer: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  /// Push a new value, evicting the oldest if at capacity.
  pub fn push(&mut self, value: T) {
    if self.capacity == 0 {
      return;
    }
    if self.buffer.len() >= self.capacity {
      self.buffer.pop_front();
    }
    self.buffer.push_back(value);
  }

  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
  }

  /// Values from oldest to newest.
  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.buffer.iter()
  }

  pub fn last(&self) -> Option<&T> {
    self.buffer.back()
  }
}

impl RollingWindow<u64> {
  pub fn sum(&self) -> u64 {
    self.buffer.iter().sum()
  }

  pub fn average(&self) -> f64 {
    if self.buffer.is_empty() {
      0.0
    } else {
      self.sum() as f64 / self.buffer.len() as f64
    }
  }

  pub fn min_max(&self) -> Option<(u64, u64)> {
    let min = self.buffer.iter().min()?;
    let max = self.buffer.iter().max()?;
    Some((*min, *max))
  }
}

impl Default for RollingWindow<u64> {
  fn default() -> Self {
    Self::new(128)
  }
}

/// Per-octree statistics, updated by the update pass.
#[derive(Debug, Clone, Default)]
pub struct OctreeMetrics {
  /// Extraction tasks started.
  pub tasks_spawned: u64,
  /// Results applied to the mesh sink.
  pub tasks_applied: u64,
  /// Results discarded because a newer edit arrived while extracting.
  pub tasks_stale: u64,
  /// Tasks whose extractor panicked.
  pub tasks_failed: u64,
  /// Nodes selected for rendering by the last update.
  pub render_nodes: u32,
  /// Extraction times in microseconds.
  pub extract_timings: RollingWindow<u64>,
  /// Update pass times in microseconds.
  pub update_timings: RollingWindow<u64>,
}

impl OctreeMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reset all metrics.
  pub fn reset(&mut self) {
    *self = Self::default();
  }

  pub fn record_spawned(&mut self, count: usize) {
    if is_enabled() {
      self.tasks_spawned += count as u64;
    }
  }

  pub fn record_applied(&mut self, extract_time_us: u64) {
    if is_enabled() {
      self.tasks_applied += 1;
      self.extract_timings.push(extract_time_us);
    }
  }

  pub fn record_stale(&mut self) {
    if is_enabled() {
      self.tasks_stale += 1;
    }
  }

  pub fn record_failed(&mut self) {
    if is_enabled() {
      self.tasks_failed += 1;
    }
  }

  pub fn record_update(&mut self, render_nodes: usize, update_time_us: u64) {
    if is_enabled() {
      self.render_nodes = render_nodes as u32;
      self.update_timings.push(update_time_us);
    }
  }
}
