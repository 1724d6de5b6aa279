//! Observer capability bundle and subscription handles.
//!
//! An [`Observer`] receives the three stream signals: values (`on_next`),
//! the terminal error (`on_error`), and completion (`on_complete`). Only
//! `on_next` is mandatory; the terminal callbacks default to no-ops, matching
//! consumers that only care about the value channel.

use crate::eventflow::error::StreamError;

/// Consumer-side callback bundle for one subscription.
///
/// Implementations must not assume they outlive the stream: once the owning
/// subscription is cancelled, no further calls are made on the observer, but
/// the observer itself may be kept alive until the end of an in-flight
/// dispatch pass.
pub trait Observer<T> {
    /// Called once per emitted value, in stream registration order.
    fn on_next(&mut self, value: &T);

    /// Called once when the stream turns `errored`. Default: ignore.
    fn on_error(&mut self, _error: &StreamError) {}

    /// Called once when the stream turns `completed`. Default: ignore.
    fn on_complete(&mut self) {}
}

/// Closure-backed [`Observer`] with optional terminal callbacks.
///
/// Mirrors the capability bundle shape: a required `next` closure plus
/// optional `error` and `complete` closures attached through the builder
/// methods.
///
/// # Example
/// ```rust
/// use eventflow::{EventStream, FnObserver};
///
/// let stream: EventStream<u32> = EventStream::new();
/// let _sub = stream.subscribe(
///     FnObserver::next(|v: &u32| println!("value: {v}"))
///         .with_complete(|| println!("done")),
/// );
/// stream.emit(1);
/// stream.complete();
/// ```
pub struct FnObserver<T> {
    next: Box<dyn FnMut(&T)>,
    error: Option<Box<dyn FnMut(&StreamError)>>,
    complete: Option<Box<dyn FnMut()>>,
}

impl<T> FnObserver<T> {
    /// Create an observer from the mandatory value callback.
    pub fn next(next: impl FnMut(&T) + 'static) -> Self {
        Self {
            next: Box::new(next),
            error: None,
            complete: None,
        }
    }

    /// Attach an error callback.
    pub fn with_error(mut self, error: impl FnMut(&StreamError) + 'static) -> Self {
        self.error = Some(Box::new(error));
        self
    }

    /// Attach a completion callback.
    pub fn with_complete(mut self, complete: impl FnMut() + 'static) -> Self {
        self.complete = Some(Box::new(complete));
        self
    }
}

impl<T> Observer<T> for FnObserver<T> {
    fn on_next(&mut self, value: &T) {
        (self.next)(value);
    }

    fn on_error(&mut self, error: &StreamError) {
        if let Some(callback) = self.error.as_mut() {
            callback(error);
        }
    }

    fn on_complete(&mut self) {
        if let Some(callback) = self.complete.as_mut() {
            callback();
        }
    }
}

/// Handle controlling one observer registration.
///
/// `unsubscribe` is idempotent: the first call removes the observer from the
/// stream's registry, later calls do nothing. Dropping a `Subscription`
/// does NOT unsubscribe — cancellation is always explicit.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Build a live subscription from its cancellation action.
    pub(crate) fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A no-op handle, returned when subscribing to an already-terminal
    /// stream.
    pub fn inert() -> Self {
        Self { cancel: None }
    }

    /// Remove the observer from the stream. Takes effect for all future
    /// dispatches; an in-flight dispatch pass keeps its snapshot.
    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Whether this handle still points at a registered observer.
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
