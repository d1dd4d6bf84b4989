//! Timestamps and clocks used to order voxel edits against mesh updates.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use web_time::Instant;

/// Point in time, in microseconds since an arbitrary epoch.
///
/// Only the ordering matters: every stamp compared against another must come
/// from the same clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub u64);

impl Timestamp {
  /// The clock epoch.
  pub const ZERO: Self = Self(0);

  /// Create a timestamp from whole microseconds.
  #[inline]
  pub const fn from_micros(micros: u64) -> Self {
    Self(micros)
  }

  /// Create a timestamp from a duration since the epoch.
  #[inline]
  pub fn from_duration(since_epoch: Duration) -> Self {
    Self(since_epoch.as_micros() as u64)
  }

  /// Microseconds since the epoch.
  #[inline]
  pub const fn as_micros(self) -> u64 {
    self.0
  }

  /// Time elapsed between `earlier` and `self`, zero if `earlier` is later.
  #[inline]
  pub fn saturating_since(self, earlier: Timestamp) -> Duration {
    Duration::from_micros(self.0.saturating_sub(earlier.0))
  }
}

impl std::ops::Add<Duration> for Timestamp {
  type Output = Timestamp;

  fn add(self, rhs: Duration) -> Timestamp {
    Timestamp(self.0.saturating_add(rhs.as_micros() as u64))
  }
}

/// Source of "now" for the octree.
pub trait Clock: Send + Sync {
  /// Current time. Must never go backwards.
  fn now(&self) -> Timestamp;
}

/// Monotonic wall clock starting at its creation.
///
/// The first reading is 1µs past the epoch so no real reading ever equals
/// [`Timestamp::ZERO`].
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
  epoch: Instant,
}

impl MonotonicClock {
  /// Create a clock whose epoch is now.
  pub fn new() -> Self {
    Self {
      epoch: Instant::now(),
    }
  }
}

impl Default for MonotonicClock {
  fn default() -> Self {
    Self::new()
  }
}

impl Clock for MonotonicClock {
  fn now(&self) -> Timestamp {
    Timestamp::from_duration(self.epoch.elapsed()) + Duration::from_micros(1)
  }
}

/// Manually driven clock.
///
/// Clones share the same time, so a host can keep one handle and hand another
/// to the octree.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
  micros: Arc<AtomicU64>,
}

impl ManualClock {
  /// Create a clock reading `start`.
  pub fn new(start: Timestamp) -> Self {
    Self {
      micros: Arc::new(AtomicU64::new(start.0)),
    }
  }

  /// Jump to `time`. Earlier times are ignored.
  pub fn set(&self, time: Timestamp) {
    self.micros.fetch_max(time.0, Ordering::Relaxed);
  }

  /// Move the clock forward.
  pub fn advance(&self, by: Duration) {
    self.micros.fetch_add(by.as_micros() as u64, Ordering::Relaxed);
  }
}

impl Clock for ManualClock {
  fn now(&self) -> Timestamp {
    Timestamp(self.micros.load(Ordering::Relaxed))
  }
}
