//! Extraction tasks - one in-flight surface extraction per octree node.
//!
//! A task is spawned on rayon's thread pool and hands its result back over a
//! bounded `crossbeam_channel`. The owning node keeps the receiver and polls
//! it from the update pass; nothing ever blocks on a task.
//!
//! ```text
//! Owner thread                      rayon worker
//! ┌──────────────────┐
//! │ snapshot volume  │
//! │ spawn()          │──────────────► extract(snapshot)
//! └──────────────────┘                     │
//!                                          │ send(result)
//! ┌──────────────────┐                     │
//! │ poll()           │◄────────────────────┘
//! │ Pending / Ready  │
//! │ / Failed         │
//! └──────────────────┘
//! ```
//!
//! Dropping the handle orphans the task: it still runs to completion on the
//! worker, but its result is discarded.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{self as channel, Receiver, TryRecvError};
use web_time::Instant;

use crate::config::ExecutionMode;
use crate::extract::SurfaceExtractor;
use crate::mesh::MeshData;
use crate::time::Timestamp;
use crate::volume::VolumeSnapshot;

/// Unique identifier for a spawned task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
  fn next() -> Self {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    Self(COUNTER.fetch_add(1, Ordering::Relaxed))
  }

  /// Get the raw ID value.
  pub fn raw(&self) -> u64 {
    self.0
  }
}

/// Result sent back by a worker.
struct TaskOutput {
  mesh: Option<MeshData>,
  extract_time_us: u64,
}

/// Outcome of polling a task.
#[derive(Debug)]
pub enum TaskPoll {
  /// Still running.
  Pending,
  /// Finished. `None` means the region holds no geometry.
  Ready {
    /// Extracted mesh.
    mesh: Option<MeshData>,
    /// Time spent extracting, in microseconds.
    extract_time_us: u64,
  },
  /// The extractor panicked; the result is lost.
  Failed,
}

/// Handle to one in-flight extraction.
pub struct ExtractionTask {
  id: TaskId,
  spawned_at: Timestamp,
  receiver: Receiver<TaskOutput>,
}

impl ExtractionTask {
  /// Start extracting `snapshot`.
  ///
  /// `spawned_at` is the time the snapshot was taken; results are only
  /// trusted for edits stamped before it.
  pub fn spawn<V: Send + Sync + 'static>(
    extractor: Arc<dyn SurfaceExtractor<V>>,
    snapshot: VolumeSnapshot<V>,
    spawned_at: Timestamp,
    execution: ExecutionMode,
  ) -> Self {
    let id = TaskId::next();
    let (sender, receiver) = channel::bounded(1);

    let work = move || {
      let start = Instant::now();
      // A panicking extractor sends nothing; the sender is dropped and the
      // poller sees `Failed`.
      let result = panic::catch_unwind(AssertUnwindSafe(|| extractor.extract(&snapshot)));
      if let Ok(mesh) = result {
        // Ignore send error (receiver dropped = orphaned)
        let _ = sender.send(TaskOutput {
          mesh,
          extract_time_us: start.elapsed().as_micros() as u64,
        });
      }
    };

    match execution {
      ExecutionMode::Async => rayon::spawn(work),
      ExecutionMode::Inline => work(),
    }

    Self {
      id,
      spawned_at,
      receiver,
    }
  }

  /// Task identifier.
  pub fn id(&self) -> TaskId {
    self.id
  }

  /// Time the snapshot for this task was taken.
  pub fn spawned_at(&self) -> Timestamp {
    self.spawned_at
  }

  /// Poll for the result (non-blocking).
  ///
  /// `Ready` and `Failed` are terminal; the handle should be dropped after
  /// either.
  pub fn poll(&self) -> TaskPoll {
    match self.receiver.try_recv() {
      Ok(output) => TaskPoll::Ready {
        mesh: output.mesh,
        extract_time_us: output.extract_time_us,
      },
      Err(TryRecvError::Empty) => TaskPoll::Pending,
      Err(TryRecvError::Disconnected) => TaskPoll::Failed,
    }
  }
}

impl std::fmt::Debug for ExtractionTask {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ExtractionTask")
      .field("id", &self.id)
      .field("spawned_at", &self.spawned_at)
      .finish()
  }
}

#[cfg(test)]
#[path = "task_test.rs"]
mod task_test;
