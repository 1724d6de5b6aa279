//! Session windows: batches closed by inactivity.
//!
//! No internal timer exists. The factory returns a [`SessionWindows`] pair
//! of the output stream and a `tick(now_ms)` control: the caller invokes
//! `tick` periodically with its own notion of "now", and a tick closes the
//! accumulated batch once the gap since the last arrival reaches the
//! configured threshold. Time is therefore fully caller-controlled and
//! deterministic.
//!
//! ```text
//! arrivals:  a b c         d e        (gap 5)
//! time:      0 1 2 . . . . 9 10
//! sessions:  [a b c]       [d e]      closed by ticks at >= 7 and >= 15
//! ```

use super::clock::{Clock, SystemClock};
use super::StreamWindow;
use crate::eventflow::error::{StreamError, StreamResult};
use crate::eventflow::stream::{EventStream, FnObserver};
use log::debug;
use std::cell::RefCell;
use std::rc::Rc;

struct SessionState<T> {
    gap_ms: i64,
    buffer: Vec<T>,
    opened_at: Option<i64>,
    /// Arrival time of the most recent buffered value
    last_emit_ms: i64,
}

impl<T> SessionState<T> {
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

/// A session windowing pipeline: the window output stream plus the external
/// tick control that drives gap detection.
pub struct SessionWindows<T> {
    /// Closed session batches
    pub windows: EventStream<StreamWindow<T>>,
    state: Rc<RefCell<SessionState<T>>>,
}

impl<T: Clone + 'static> SessionWindows<T> {
    /// Close the accumulated batch if the inactivity gap has elapsed.
    ///
    /// Flushes when the buffer is non-empty and `now_ms - last_arrival >=
    /// gap_ms`; otherwise a no-op. Safe to call at any cadence, including
    /// after the source turned terminal.
    pub fn tick(&self, now_ms: i64) {
        let window = {
            let mut state = self.state.borrow_mut();
            if state.buffer.is_empty() || now_ms - state.last_emit_ms < state.gap_ms {
                None
            } else {
                state.flush(now_ms)
            }
        };
        if let Some(window) = window {
            debug!("session window closed by tick with {} value(s)", window.len());
            self.windows.emit(window);
        }
    }

    /// Number of values accumulated in the open session.
    pub fn pending(&self) -> usize {
        self.state.borrow().buffer.len()
    }
}

/// Batch `source` into inactivity-gap sessions, with arrival times taken
/// from the system clock.
///
/// On source completion any non-empty buffer is flushed as a final window
/// before the output completes.
pub fn session<T: Clone + 'static>(
    source: &EventStream<T>,
    gap_ms: i64,
) -> StreamResult<SessionWindows<T>> {
    session_with_clock(source, gap_ms, SystemClock)
}

/// [`session`] with an injected clock for deterministic arrival times.
pub fn session_with_clock<T: Clone + 'static>(
    source: &EventStream<T>,
    gap_ms: i64,
    clock: impl Clock + 'static,
) -> StreamResult<SessionWindows<T>> {
    if gap_ms <= 0 {
        return Err(StreamError::invalid_window(
            "session gap_ms must be positive",
        ));
    }

    let clock: Rc<dyn Clock> = Rc::new(clock);
    let output: EventStream<StreamWindow<T>> = EventStream::new();
    let state = Rc::new(RefCell::new(SessionState::<T> {
        gap_ms,
        buffer: Vec::new(),
        opened_at: None,
        last_emit_ms: 0,
    }));

    let on_error = output.clone();
    let on_complete = output.clone();
    let next_state = Rc::clone(&state);
    let error_state = Rc::clone(&state);
    let complete_state = Rc::clone(&state);
    let complete_clock = Rc::clone(&clock);
    source.subscribe(
        FnObserver::next(move |value: &T| {
            let now = clock.now_ms();
            let mut state = next_state.borrow_mut();
            if state.buffer.is_empty() {
                state.opened_at = Some(now);
            }
            state.buffer.push(value.clone());
            state.last_emit_ms = now;
        })
        .with_error(move |err: &StreamError| {
            error_state.borrow_mut().buffer.clear();
            on_error.error(err.clone());
        })
        .with_complete(move || {
            let residue = complete_state.borrow_mut().flush(complete_clock.now_ms());
            if let Some(window) = residue {
                debug!("session window flushed {} value(s) on completion", window.len());
                on_complete.emit(window);
            }
            on_complete.complete();
        }),
    );

    Ok(SessionWindows {
        windows: output,
        state,
    })
}
