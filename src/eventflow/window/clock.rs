//! Time sources for window timestamping.
//!
//! All window logic consumes an injected [`Clock`] rather than reading the
//! host clock directly, keeping windowing fully deterministic under test.
//! The `*_with_clock` factory variants are the injection points; the plain
//! factories default to [`SystemClock`].

use std::cell::Cell;
use std::rc::Rc;

/// Source of epoch-millisecond timestamps for window boundaries.
pub trait Clock {
    /// Current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}

/// Wall-clock time via chrono.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Hand-driven clock for deterministic tests and simulations.
///
/// Clones share the same underlying instant, so a clock handed to a window
/// factory can still be advanced from the outside.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<i64>>,
}

impl ManualClock {
    /// Create a clock pinned at `start_ms`.
    pub fn new(start_ms: i64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    /// Jump to an absolute time.
    pub fn set(&self, now_ms: i64) {
        self.now.set(now_ms);
    }

    /// Move forward by `delta_ms`.
    pub fn advance(&self, delta_ms: i64) {
        self.now.set(self.now.get() + delta_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}
