//! Push-based observable stream primitive.
//!
//! An [`EventStream`] owns a registry of observers keyed by monotonically
//! increasing subscription ids and a one-way terminal flag. Emission walks a
//! per-call snapshot of the registry so observers may subscribe or
//! unsubscribe from inside a callback without invalidating the in-flight
//! dispatch pass; such structural changes take effect from the next dispatch.
//!
//! Terminal signals (`error`/`complete`) are one-shot and replayable: once a
//! stream is terminal every mutation is a no-op, and a late `subscribe`
//! synchronously receives the stored terminal signal instead of registering
//! a live observer.

pub mod observer;
mod operators;

pub use observer::{FnObserver, Observer, Subscription};

use crate::eventflow::error::StreamError;
use log::debug;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// One-way lifecycle flag for a stream.
#[derive(Debug, Clone, PartialEq)]
enum TerminalState {
    /// Accepting emissions and subscriptions
    Live,
    /// Completed normally; stored for replay to late subscribers
    Completed,
    /// Failed; the payload is stored for replay to late subscribers
    Errored(StreamError),
}

impl TerminalState {
    fn is_live(&self) -> bool {
        matches!(self, TerminalState::Live)
    }
}

/// Shared mutable core of a stream.
///
/// Observers live in a `BTreeMap` keyed by subscription id, so iteration
/// order is registration order and removal never shifts other entries
/// (arena-style registry).
struct StreamInner<T> {
    observers: BTreeMap<u64, Rc<RefCell<dyn Observer<T>>>>,
    next_id: u64,
    state: TerminalState,
}

impl<T> StreamInner<T> {
    fn snapshot(&self) -> Vec<Rc<RefCell<dyn Observer<T>>>> {
        self.observers.values().cloned().collect()
    }
}

/// A push-based observable stream.
///
/// `EventStream` is a cheap-`Clone` handle over shared state; clones refer to
/// the same underlying stream. The core is single-threaded and fully
/// synchronous: `emit`, `error`, `complete`, and `subscribe` run to
/// completion before returning.
///
/// Observer callbacks are not guarded: a panicking callback unwinds out of
/// the dispatching call and aborts delivery to observers not yet reached in
/// that pass.
///
/// # Example
/// ```rust
/// use eventflow::{EventStream, FnObserver};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let stream: EventStream<&str> = EventStream::new();
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
/// let _sub = stream.subscribe(FnObserver::next(move |v: &&str| sink.borrow_mut().push(*v)));
///
/// stream.emit("tick");
/// stream.complete();
/// stream.emit("dropped"); // no-op after terminal
///
/// assert_eq!(seen.borrow().as_slice(), &["tick"]);
/// ```
pub struct EventStream<T> {
    inner: Rc<RefCell<StreamInner<T>>>,
}

impl<T> std::fmt::Debug for EventStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream").finish_non_exhaustive()
    }
}

impl<T> Clone for EventStream<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for EventStream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventStream<T> {
    /// Create an empty live stream with no observers.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(StreamInner {
                observers: BTreeMap::new(),
                next_id: 0,
                state: TerminalState::Live,
            })),
        }
    }

    /// Whether the stream completed normally.
    pub fn is_completed(&self) -> bool {
        matches!(self.inner.borrow().state, TerminalState::Completed)
    }

    /// Whether the stream terminated with an error.
    pub fn is_errored(&self) -> bool {
        matches!(self.inner.borrow().state, TerminalState::Errored(_))
    }

    /// The stored terminal error, if the stream is errored.
    pub fn terminal_error(&self) -> Option<StreamError> {
        match &self.inner.borrow().state {
            TerminalState::Errored(err) => Some(err.clone()),
            _ => None,
        }
    }

    /// Count of currently registered, non-unsubscribed observers.
    ///
    /// Drops to zero once the stream turns terminal: the registry is cleared
    /// after the terminal signal has been delivered.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().observers.len()
    }
}

impl<T: 'static> EventStream<T> {
    /// Register an observer and return its cancellation handle.
    ///
    /// If the stream is already terminal the stored signal is replayed
    /// synchronously (`on_complete` for a completed stream, `on_error` with
    /// the stored payload for an errored one) and an inert [`Subscription`]
    /// is returned.
    pub fn subscribe(&self, observer: impl Observer<T> + 'static) -> Subscription {
        let state = self.inner.borrow().state.clone();
        match state {
            TerminalState::Completed => {
                let mut observer = observer;
                observer.on_complete();
                Subscription::inert()
            }
            TerminalState::Errored(err) => {
                let mut observer = observer;
                observer.on_error(&err);
                Subscription::inert()
            }
            TerminalState::Live => {
                let id = {
                    let mut inner = self.inner.borrow_mut();
                    let id = inner.next_id;
                    inner.next_id += 1;
                    inner
                        .observers
                        .insert(id, Rc::new(RefCell::new(observer)) as Rc<RefCell<dyn Observer<T>>>);
                    id
                };
                let weak = Rc::downgrade(&self.inner);
                Subscription::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        inner.borrow_mut().observers.remove(&id);
                    }
                })
            }
        }
    }

    /// Deliver `value` to every registered observer, in registration order.
    ///
    /// No-op once the stream is terminal. The observer set is snapshotted
    /// before dispatch, so subscriptions and unsubscriptions made inside a
    /// callback affect only future emissions.
    pub fn emit(&self, value: T) {
        let snapshot = {
            let inner = self.inner.borrow();
            if !inner.state.is_live() {
                return;
            }
            inner.snapshot()
        };
        for observer in snapshot {
            observer.borrow_mut().on_next(&value);
        }
    }

    /// Mark the stream `errored`, store the payload, and notify observers.
    ///
    /// The terminal flag flips before any callback runs, so re-entrant
    /// `emit`/`error`/`complete` calls from inside a callback are no-ops.
    /// Later subscribers receive the stored payload on subscription.
    pub fn error(&self, err: StreamError) {
        let snapshot = {
            let mut inner = self.inner.borrow_mut();
            if !inner.state.is_live() {
                return;
            }
            inner.state = TerminalState::Errored(err.clone());
            inner.snapshot()
        };
        debug!(
            "stream errored with {} observer(s) registered: {}",
            snapshot.len(),
            err
        );
        for observer in &snapshot {
            observer.borrow_mut().on_error(&err);
        }
        self.inner.borrow_mut().observers.clear();
    }

    /// Mark the stream `completed` and notify observers.
    ///
    /// Symmetric to [`error`](Self::error), without a payload.
    pub fn complete(&self) {
        let snapshot = {
            let mut inner = self.inner.borrow_mut();
            if !inner.state.is_live() {
                return;
            }
            inner.state = TerminalState::Completed;
            inner.snapshot()
        };
        debug!(
            "stream completed with {} observer(s) registered",
            snapshot.len()
        );
        for observer in &snapshot {
            observer.borrow_mut().on_complete();
        }
        self.inner.borrow_mut().observers.clear();
    }
}
