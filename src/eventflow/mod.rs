// Event streaming core for eventflow
// Push-based observable streams, combinators, windowing, and backpressure buffering

pub mod backpressure;
pub mod error;
pub mod merge;
pub mod stream;
pub mod window;

// Re-export main API
pub use backpressure::{BackpressureQueue, EnqueueOutcome, OverflowStrategy, QueueConfig};
pub use error::{StreamError, StreamResult};
pub use merge::{combine_latest, merge, split, zip, SplitStreams};
pub use stream::{EventStream, FnObserver, Observer, Subscription};
pub use window::{session, sliding, tumbling, SessionWindows, StreamWindow};
