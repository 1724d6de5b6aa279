//! Sliding windows: overlapping batches over the most recent values.
//!
//! ```text
//! input:           1 2 3 4 5
//! size 3, step 1:      [1 2 3] [2 3 4] [3 4 5]
//! size 3, step 2:              [2 3 4]
//! ```
//!
//! A ring of the `size` most recent values (with arrival timestamps) is
//! maintained; after every `step`-th arrival, once the ring is full, a copy
//! of its contents is emitted as a window. `opened_at` is the arrival time
//! of the oldest retained value.

use super::clock::{Clock, SystemClock};
use super::StreamWindow;
use crate::eventflow::error::{StreamError, StreamResult};
use crate::eventflow::stream::{EventStream, FnObserver};
use log::debug;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

struct SlidingState<T> {
    /// Most recent values with their arrival timestamps
    ring: VecDeque<(i64, T)>,
    arrivals: u64,
}

/// Batch `source` into overlapping windows of the `size` most recent
/// values, emitting every `step`-th arrival, timestamped with the system
/// clock.
///
/// Nothing is emitted until the ring has filled to `size` values. Source
/// completion is forwarded without a partial flush — a ring that never
/// filled produced no window.
pub fn sliding<T: Clone + 'static>(
    source: &EventStream<T>,
    size: usize,
    step: usize,
) -> StreamResult<EventStream<StreamWindow<T>>> {
    sliding_with_clock(source, size, step, SystemClock)
}

/// [`sliding`] with an injected clock for deterministic timestamps.
pub fn sliding_with_clock<T: Clone + 'static>(
    source: &EventStream<T>,
    size: usize,
    step: usize,
    clock: impl Clock + 'static,
) -> StreamResult<EventStream<StreamWindow<T>>> {
    if size == 0 {
        return Err(StreamError::invalid_window(
            "sliding window size must be at least 1",
        ));
    }
    if step == 0 {
        return Err(StreamError::invalid_window(
            "sliding window step must be at least 1",
        ));
    }

    let clock: Rc<dyn Clock> = Rc::new(clock);
    let output: EventStream<StreamWindow<T>> = EventStream::new();
    let state = Rc::new(RefCell::new(SlidingState::<T> {
        ring: VecDeque::with_capacity(size),
        arrivals: 0,
    }));

    let on_next = output.clone();
    let on_error = output.clone();
    let on_complete = output.clone();
    let next_state = Rc::clone(&state);
    let error_state = Rc::clone(&state);
    source.subscribe(
        FnObserver::next(move |value: &T| {
            let now = clock.now_ms();
            let window = {
                let mut state = next_state.borrow_mut();
                state.ring.push_back((now, value.clone()));
                if state.ring.len() > size {
                    state.ring.pop_front();
                }
                state.arrivals += 1;
                if state.ring.len() == size && state.arrivals % step as u64 == 0 {
                    let opened_at = state.ring.front().map(|(ts, _)| *ts).unwrap_or(now);
                    Some(StreamWindow {
                        values: state.ring.iter().map(|(_, v)| v.clone()).collect(),
                        opened_at,
                        closed_at: now,
                    })
                } else {
                    None
                }
            };
            if let Some(window) = window {
                debug!("sliding window snapshot with {} value(s)", window.len());
                on_next.emit(window);
            }
        })
        .with_error(move |err: &StreamError| {
            error_state.borrow_mut().ring.clear();
            on_error.error(err.clone());
        })
        .with_complete(move || on_complete.complete()),
    );

    Ok(output)
}
