//! Windowing engine: batching a source stream into closed windows.
//!
//! Three strategies, one file each:
//! - [`tumbling`]: fixed-size, non-overlapping count-based batches
//! - [`sliding`]: overlapping batches over the most recent values,
//!   advancing by a configurable step
//! - [`session`]: gap-closed batches driven by an externally supplied
//!   `tick(now_ms)` rather than an internal timer
//!
//! Every strategy consumes its source through the public subscribe surface
//! and produces a derived [`EventStream`] of [`StreamWindow`] batches. On a
//! source error, buffered residue is discarded and the error is forwarded;
//! partial flushes happen only on completion (tumbling and session).

pub mod clock;
mod session;
mod sliding;
mod tumbling;

pub use clock::{Clock, ManualClock, SystemClock};
pub use session::{session, session_with_clock, SessionWindows};
pub use sliding::{sliding, sliding_with_clock};
pub use tumbling::{tumbling, tumbling_with_clock};

/// A closed, immutable batch of windowed values.
///
/// `opened_at` is the clock time the window started filling; `closed_at`
/// the time it was flushed. `opened_at <= closed_at` always holds under a
/// monotone clock.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamWindow<T> {
    /// Values in arrival order
    pub values: Vec<T>,
    /// When the first value of the batch arrived (epoch ms)
    pub opened_at: i64,
    /// When the batch was flushed (epoch ms)
    pub closed_at: i64,
}

impl<T> StreamWindow<T> {
    /// Number of values in the batch.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the batch carries no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
