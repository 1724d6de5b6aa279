//! Tumbling windows: fixed-size, non-overlapping count-based batches.
//!
//! ```text
//! input:   1 2 3 4 5 6
//! size 3:  [1 2 3]   [4 5 6]
//! ```

use super::clock::{Clock, SystemClock};
use super::StreamWindow;
use crate::eventflow::error::{StreamError, StreamResult};
use crate::eventflow::stream::{EventStream, FnObserver};
use log::debug;
use std::cell::RefCell;
use std::rc::Rc;

struct TumblingState<T> {
    buffer: Vec<T>,
    opened_at: Option<i64>,
}

impl<T> TumblingState<T> {
    /// Close the current buffer as a window, or `None` if nothing buffered.
    fn flush(&mut self, closed_at: i64) -> Option<StreamWindow<T>> {
        if self.buffer.is_empty() {
            return None;
        }
        let values = std::mem::take(&mut self.buffer);
        let opened_at = self.opened_at.take().unwrap_or(closed_at);
        Some(StreamWindow {
            values,
            opened_at,
            closed_at,
        })
    }
}

/// Batch `source` into non-overlapping windows of `window_size` values,
/// timestamped with the system clock.
///
/// On source completion a non-empty partial buffer is flushed as a final
/// (possibly smaller) window before the output completes.
pub fn tumbling<T: Clone + 'static>(
    source: &EventStream<T>,
    window_size: usize,
) -> StreamResult<EventStream<StreamWindow<T>>> {
    tumbling_with_clock(source, window_size, SystemClock)
}

/// [`tumbling`] with an injected clock for deterministic timestamps.
pub fn tumbling_with_clock<T: Clone + 'static>(
    source: &EventStream<T>,
    window_size: usize,
    clock: impl Clock + 'static,
) -> StreamResult<EventStream<StreamWindow<T>>> {
    if window_size == 0 {
        return Err(StreamError::invalid_window(
            "tumbling window_size must be at least 1",
        ));
    }

    let clock: Rc<dyn Clock> = Rc::new(clock);
    let output: EventStream<StreamWindow<T>> = EventStream::new();
    let state = Rc::new(RefCell::new(TumblingState::<T> {
        buffer: Vec::new(),
        opened_at: None,
    }));

    let on_next = output.clone();
    let on_error = output.clone();
    let on_complete = output.clone();
    let next_state = Rc::clone(&state);
    let error_state = Rc::clone(&state);
    let complete_state = Rc::clone(&state);
    let next_clock = Rc::clone(&clock);
    source.subscribe(
        FnObserver::next(move |value: &T| {
            let window = {
                let mut state = next_state.borrow_mut();
                if state.buffer.is_empty() {
                    state.opened_at = Some(next_clock.now_ms());
                }
                state.buffer.push(value.clone());
                if state.buffer.len() >= window_size {
                    state.flush(next_clock.now_ms())
                } else {
                    None
                }
            };
            if let Some(window) = window {
                debug!("tumbling window flushed with {} value(s)", window.len());
                on_next.emit(window);
            }
        })
        .with_error(move |err: &StreamError| {
            // Buffered residue never forms a window on error
            error_state.borrow_mut().buffer.clear();
            on_error.error(err.clone());
        })
        .with_complete(move || {
            let residue = complete_state.borrow_mut().flush(clock.now_ms());
            if let Some(window) = residue {
                debug!("tumbling window flushed {} value(s) on completion", window.len());
                on_complete.emit(window);
            }
            on_complete.complete();
        }),
    );

    Ok(output)
}
