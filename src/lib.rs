//! # eventflow
//!
//! An in-process, push-based event streaming core. Producers push values into
//! an [`EventStream`]; registered observers receive them synchronously, in
//! registration order, until the stream reaches a terminal state.
//!
//! ## Features
//!
//! - **Observable Streams**: subscription management, terminal signaling
//!   (`error`/`complete`), and derived-stream operators (`map`, `filter`,
//!   `take`, `skip`)
//! - **Combinators**: `merge`, `combine_latest`, `split`, `zip` over existing
//!   streams, built entirely on the public subscribe/emit contract
//! - **Windowing**: tumbling, sliding, and externally-ticked session windows
//!   producing streams of closed [`StreamWindow`] batches
//! - **Backpressure Buffering**: a bounded FIFO with `drop_newest`,
//!   `drop_oldest`, and `buffer` overflow strategies
//!
//! Execution is single-threaded and fully synchronous: `emit`, `error`,
//! `complete`, `subscribe`, and all queue operations run to completion before
//! returning control to the caller. The "streaming" vocabulary describes a
//! push data-flow topology, not parallel execution.
//!
//! ## Quick Start
//!
//! ```rust
//! use eventflow::{EventStream, FnObserver};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let prices: EventStream<i64> = EventStream::new();
//! let doubled = prices.map(|p| p * 2);
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! let _sub = doubled.subscribe(FnObserver::next(move |v: &i64| sink.borrow_mut().push(*v)));
//!
//! prices.emit(21);
//! prices.complete();
//!
//! assert_eq!(seen.borrow().as_slice(), &[42]);
//! assert!(doubled.is_completed());
//! ```

pub mod eventflow;

// Re-export main API at crate root for easy access
pub use eventflow::backpressure::{
    BackpressureQueue, EnqueueOutcome, OverflowStrategy, QueueConfig,
};
pub use eventflow::error::{StreamError, StreamResult};
pub use eventflow::merge::{combine_latest, merge, split, zip, SplitStreams};
pub use eventflow::stream::{EventStream, FnObserver, Observer, Subscription};
pub use eventflow::window::{
    session, session_with_clock, sliding, sliding_with_clock, tumbling, tumbling_with_clock,
    Clock, ManualClock, SessionWindows, StreamWindow, SystemClock,
};

/// Crate version string, taken from the package manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Capability list for feature discovery by embedding applications.
pub const FEATURES: &[&str] = &[
    "event_streams",    // push-based observable primitive
    "stream_operators", // map, filter, take, skip
    "stream_merging",   // merge, combine_latest, split, zip
    "windowing",        // tumbling, sliding, session
    "backpressure",     // bounded FIFO with overflow strategies
];
