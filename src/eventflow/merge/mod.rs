//! Multi-stream combinators.
//!
//! Stateless entry points that consume one or more [`EventStream`]s and
//! produce derived streams. Combinators never reach into a source's
//! internals: all interaction goes through the public subscribe/emit
//! surface, and per-combinator state (completion counters, latest values,
//! zip buffers) lives in shared cells captured by the forwarding observers.
//!
//! Fan-out within a single emission iterates a stable snapshot of each
//! source's observer set, so combinator wiring is unaffected by
//! subscriptions or unsubscriptions triggered from inside a callback.

use crate::eventflow::error::StreamError;
use crate::eventflow::stream::{EventStream, FnObserver};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// Interleave every value from every source into one output stream.
///
/// Values arrive on the output in whatever order the sources emit. The
/// output completes only once **all** sources have completed; the first
/// error received from any source errors the output (later errors are
/// no-ops because the output is already terminal). `merge(&[])` completes
/// immediately.
pub fn merge<T: Clone + 'static>(sources: &[EventStream<T>]) -> EventStream<T> {
    let output = EventStream::new();
    if sources.is_empty() {
        output.complete();
        return output;
    }

    let pending = Rc::new(Cell::new(sources.len()));
    for source in sources {
        let on_next = output.clone();
        let on_error = output.clone();
        let on_complete = output.clone();
        let remaining = Rc::clone(&pending);
        source.subscribe(
            FnObserver::next(move |value: &T| on_next.emit(value.clone()))
                .with_error(move |err: &StreamError| on_error.error(err.clone()))
                .with_complete(move || {
                    remaining.set(remaining.get().saturating_sub(1));
                    if remaining.get() == 0 {
                        on_complete.complete();
                    }
                }),
        );
    }
    output
}

/// Pair the most recent value from each source whenever either updates.
///
/// Emission starts only once both sources have emitted at least once;
/// values arriving before that are dropped from the output, not buffered.
/// The output completes once both sources have completed and errors on the
/// first error from either side.
pub fn combine_latest<A, B>(a: &EventStream<A>, b: &EventStream<B>) -> EventStream<(A, B)>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    let output = EventStream::new();
    let latest: Rc<RefCell<(Option<A>, Option<B>)>> = Rc::new(RefCell::new((None, None)));
    let pending = Rc::new(Cell::new(2usize));

    {
        let on_next = output.clone();
        let on_error = output.clone();
        let on_complete = output.clone();
        let latest = Rc::clone(&latest);
        let remaining = Rc::clone(&pending);
        a.subscribe(
            FnObserver::next(move |value: &A| {
                let pair = {
                    let mut slots = latest.borrow_mut();
                    slots.0 = Some(value.clone());
                    paired(&slots)
                };
                if let Some(pair) = pair {
                    on_next.emit(pair);
                }
            })
            .with_error(move |err: &StreamError| on_error.error(err.clone()))
            .with_complete(move || {
                remaining.set(remaining.get().saturating_sub(1));
                if remaining.get() == 0 {
                    on_complete.complete();
                }
            }),
        );
    }
    {
        let on_next = output.clone();
        let on_error = output.clone();
        let on_complete = output.clone();
        let latest = Rc::clone(&latest);
        let remaining = Rc::clone(&pending);
        b.subscribe(
            FnObserver::next(move |value: &B| {
                let pair = {
                    let mut slots = latest.borrow_mut();
                    slots.1 = Some(value.clone());
                    paired(&slots)
                };
                if let Some(pair) = pair {
                    on_next.emit(pair);
                }
            })
            .with_error(move |err: &StreamError| on_error.error(err.clone()))
            .with_complete(move || {
                remaining.set(remaining.get().saturating_sub(1));
                if remaining.get() == 0 {
                    on_complete.complete();
                }
            }),
        );
    }
    output
}

fn paired<A: Clone, B: Clone>(slots: &(Option<A>, Option<B>)) -> Option<(A, B)> {
    match slots {
        (Some(a), Some(b)) => Some((a.clone(), b.clone())),
        _ => None,
    }
}

/// The two outputs of [`split`].
pub struct SplitStreams<T> {
    /// Values for which the predicate returned true
    pub matching: EventStream<T>,
    /// Values for which the predicate returned false
    pub non_matching: EventStream<T>,
}

/// Route every source value to exactly one of two outputs.
///
/// Source `error`/`complete` is forwarded to **both** outputs.
pub fn split<T: Clone + 'static>(
    source: &EventStream<T>,
    mut predicate: impl FnMut(&T) -> bool + 'static,
) -> SplitStreams<T> {
    let matching: EventStream<T> = EventStream::new();
    let non_matching: EventStream<T> = EventStream::new();

    let next_match = matching.clone();
    let next_rest = non_matching.clone();
    let err_match = matching.clone();
    let err_rest = non_matching.clone();
    let done_match = matching.clone();
    let done_rest = non_matching.clone();
    source.subscribe(
        FnObserver::next(move |value: &T| {
            if predicate(value) {
                next_match.emit(value.clone());
            } else {
                next_rest.emit(value.clone());
            }
        })
        .with_error(move |err: &StreamError| {
            err_match.error(err.clone());
            err_rest.error(err.clone());
        })
        .with_complete(move || {
            done_match.complete();
            done_rest.complete();
        }),
    );

    SplitStreams {
        matching,
        non_matching,
    }
}

/// Pair values positionally across two sources, in arrival order.
///
/// One unbounded FIFO buffer per source: each incoming value is appended to
/// its side, then pairs are emitted as long as both buffers are non-empty.
/// Buffering is unbounded by design — a faster source accumulates memory
/// until its counterpart catches up. The first completion from either
/// source completes the output (unpaired buffered values are discarded);
/// the first error wins.
pub fn zip<A, B>(a: &EventStream<A>, b: &EventStream<B>) -> EventStream<(A, B)>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    struct ZipBuffers<A, B> {
        left: VecDeque<A>,
        right: VecDeque<B>,
    }

    impl<A, B> ZipBuffers<A, B> {
        fn drain_ready(&mut self) -> Vec<(A, B)> {
            let mut pairs = Vec::new();
            while !self.left.is_empty() && !self.right.is_empty() {
                if let (Some(a), Some(b)) = (self.left.pop_front(), self.right.pop_front()) {
                    pairs.push((a, b));
                }
            }
            pairs
        }
    }

    let output = EventStream::new();
    let buffers = Rc::new(RefCell::new(ZipBuffers::<A, B> {
        left: VecDeque::new(),
        right: VecDeque::new(),
    }));

    {
        let on_next = output.clone();
        let on_error = output.clone();
        let on_complete = output.clone();
        let buffers = Rc::clone(&buffers);
        a.subscribe(
            FnObserver::next(move |value: &A| {
                let ready = {
                    let mut queues = buffers.borrow_mut();
                    queues.left.push_back(value.clone());
                    queues.drain_ready()
                };
                for pair in ready {
                    on_next.emit(pair);
                }
            })
            .with_error(move |err: &StreamError| on_error.error(err.clone()))
            .with_complete(move || on_complete.complete()),
        );
    }
    {
        let on_next = output.clone();
        let on_error = output.clone();
        let on_complete = output.clone();
        let buffers = Rc::clone(&buffers);
        b.subscribe(
            FnObserver::next(move |value: &B| {
                let ready = {
                    let mut queues = buffers.borrow_mut();
                    queues.right.push_back(value.clone());
                    queues.drain_ready()
                };
                for pair in ready {
                    on_next.emit(pair);
                }
            })
            .with_error(move |err: &StreamError| on_error.error(err.clone()))
            .with_complete(move || on_complete.complete()),
        );
    }
    output
}
