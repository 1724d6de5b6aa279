//! Derived-stream operators.
//!
//! Each operator returns a brand-new [`EventStream`] and talks to its source
//! only through the public subscribe surface, so the source never sees the
//! difference between an operator and any other observer.

use super::{EventStream, FnObserver, Subscription};
use crate::eventflow::error::StreamError;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

impl<T: 'static> EventStream<T> {
    /// Transform every value with `transform`; error/complete pass through
    /// unchanged.
    pub fn map<U: 'static>(
        &self,
        mut transform: impl FnMut(&T) -> U + 'static,
    ) -> EventStream<U> {
        let output = EventStream::new();
        let on_next = output.clone();
        let on_error = output.clone();
        let on_complete = output.clone();
        self.subscribe(
            FnObserver::next(move |value: &T| on_next.emit(transform(value)))
                .with_error(move |err: &StreamError| on_error.error(err.clone()))
                .with_complete(move || on_complete.complete()),
        );
        output
    }
}

impl<T: Clone + 'static> EventStream<T> {
    /// Forward only values for which `predicate` returns true;
    /// error/complete pass through unchanged.
    pub fn filter(&self, mut predicate: impl FnMut(&T) -> bool + 'static) -> EventStream<T> {
        let output = EventStream::new();
        let on_next = output.clone();
        let on_error = output.clone();
        let on_complete = output.clone();
        self.subscribe(
            FnObserver::next(move |value: &T| {
                if predicate(value) {
                    on_next.emit(value.clone());
                }
            })
            .with_error(move |err: &StreamError| on_error.error(err.clone()))
            .with_complete(move || on_complete.complete()),
        );
        output
    }

    /// Forward up to `count` values, then complete the output and
    /// unsubscribe from the source.
    ///
    /// `take(0)` completes the output immediately without subscribing, so no
    /// source value is ever observed.
    pub fn take(&self, count: usize) -> EventStream<T> {
        let output = EventStream::new();
        if count == 0 {
            output.complete();
            return output;
        }

        let remaining = Rc::new(Cell::new(count));
        // Holds our own source subscription so the nth value can cancel it
        let handle: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let on_next = output.clone();
        let on_error = output.clone();
        let on_complete = output.clone();
        let cancel_slot = Rc::clone(&handle);
        let subscription = self.subscribe(
            FnObserver::next(move |value: &T| {
                if remaining.get() == 0 {
                    return;
                }
                remaining.set(remaining.get() - 1);
                on_next.emit(value.clone());
                if remaining.get() == 0 {
                    on_next.complete();
                    if let Some(mut sub) = cancel_slot.borrow_mut().take() {
                        sub.unsubscribe();
                    }
                }
            })
            .with_error(move |err: &StreamError| on_error.error(err.clone()))
            .with_complete(move || on_complete.complete()),
        );
        *handle.borrow_mut() = Some(subscription);
        output
    }

    /// Discard the first `count` values, forward the rest; error/complete
    /// pass through unchanged.
    pub fn skip(&self, count: usize) -> EventStream<T> {
        let output = EventStream::new();
        let remaining = Rc::new(Cell::new(count));
        let on_next = output.clone();
        let on_error = output.clone();
        let on_complete = output.clone();
        self.subscribe(
            FnObserver::next(move |value: &T| {
                if remaining.get() > 0 {
                    remaining.set(remaining.get() - 1);
                    return;
                }
                on_next.emit(value.clone());
            })
            .with_error(move |err: &StreamError| on_error.error(err.clone()))
            .with_complete(move || on_complete.complete()),
        );
        output
    }
}
