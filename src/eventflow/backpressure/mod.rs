//! Bounded FIFO buffering with overflow strategies.
//!
//! [`BackpressureQueue`] sits between an external producer and a consumer
//! (typically an [`EventStream::emit`](crate::EventStream::emit) call) when
//! production can outpace consumption. It only buffers — it never throttles
//! the producer. Three overflow strategies govern what happens once the
//! queue is at capacity; every drop is counted.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// What to do with an incoming value once the queue holds `max_size` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowStrategy {
    /// Discard the incoming value; existing contents unchanged
    DropNewest,
    /// Evict the front item to make room for the incoming value
    DropOldest,
    /// Append unconditionally; the queue may grow past `max_size`
    Buffer,
}

/// Declarative queue configuration, e.g. loaded from a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Capacity threshold at which the overflow strategy kicks in
    pub max_size: usize,
    /// Overflow behavior at capacity
    pub strategy: OverflowStrategy,
}

/// Outcome report for a single [`BackpressureQueue::enqueue`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnqueueOutcome<T> {
    /// The value was appended
    Stored,
    /// The incoming value was discarded (`drop_newest` at capacity)
    DroppedNewest,
    /// The front item was evicted to make room (`drop_oldest` at capacity)
    DroppedOldest {
        /// The evicted item
        evicted: T,
    },
}

/// Bounded FIFO buffer with a configurable overflow strategy.
///
/// # Example
/// ```rust
/// use eventflow::{BackpressureQueue, OverflowStrategy};
///
/// let mut queue = BackpressureQueue::new(2, OverflowStrategy::DropOldest);
/// queue.enqueue(1);
/// queue.enqueue(2);
/// queue.enqueue(3); // evicts 1
///
/// assert_eq!(queue.drain(), vec![2, 3]);
/// assert_eq!(queue.dropped(), 1);
/// ```
pub struct BackpressureQueue<T> {
    items: VecDeque<T>,
    max_size: usize,
    strategy: OverflowStrategy,
    /// Monotonically increasing count of values lost to overflow
    dropped: u64,
}

impl<T> BackpressureQueue<T> {
    /// Create an empty queue with the given capacity and strategy.
    pub fn new(max_size: usize, strategy: OverflowStrategy) -> Self {
        Self {
            items: VecDeque::with_capacity(max_size),
            max_size,
            strategy,
            dropped: 0,
        }
    }

    /// Create a queue from a declarative [`QueueConfig`].
    pub fn from_config(config: &QueueConfig) -> Self {
        Self::new(config.max_size, config.strategy)
    }

    /// Append `value`, applying the overflow strategy at capacity.
    ///
    /// Below capacity the value is always appended, regardless of strategy.
    pub fn enqueue(&mut self, value: T) -> EnqueueOutcome<T> {
        if self.items.len() < self.max_size || self.strategy == OverflowStrategy::Buffer {
            self.items.push_back(value);
            return EnqueueOutcome::Stored;
        }

        self.record_drop();
        if self.strategy == OverflowStrategy::DropNewest {
            return EnqueueOutcome::DroppedNewest;
        }

        // DropOldest: evict the front to make room
        let evicted = self.items.pop_front();
        self.items.push_back(value);
        match evicted {
            Some(evicted) => EnqueueOutcome::DroppedOldest { evicted },
            // A zero-capacity queue has no front to evict; the strategies
            // collapse into dropping whatever cannot be stored
            None => {
                self.items.pop_back();
                EnqueueOutcome::DroppedNewest
            }
        }
    }

    fn record_drop(&mut self) {
        self.dropped += 1;
        if self.dropped == 1 {
            warn!(
                "backpressure queue at capacity ({}), dropping with strategy {:?}",
                self.max_size, self.strategy
            );
        } else {
            debug!(
                "backpressure queue dropped value ({} total)",
                self.dropped
            );
        }
    }

    /// Remove and return the front item, or `None` if empty.
    pub fn dequeue(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// The front item without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    /// Remove and return all items in FIFO order, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<T> {
        self.items.drain(..).collect()
    }

    /// Empty the queue. The `dropped` counter is untouched.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of buffered items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the queue holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the queue is exactly at capacity.
    ///
    /// Meaningful mainly for the dropping strategies; a `buffer` queue can
    /// sit past capacity.
    pub fn is_full(&self) -> bool {
        self.items.len() == self.max_size
    }

    /// Count of values lost to overflow since construction.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_oldest_evicts_front() {
        let mut queue = BackpressureQueue::new(2, OverflowStrategy::DropOldest);
        queue.enqueue(1);
        queue.enqueue(2);
        let outcome = queue.enqueue(3);

        assert_eq!(outcome, EnqueueOutcome::DroppedOldest { evicted: 1 });
        assert_eq!(queue.dropped(), 1);
        assert_eq!(queue.drain(), vec![2, 3]);
    }

    #[test]
    fn test_drop_newest_discards_incoming() {
        let mut queue = BackpressureQueue::new(2, OverflowStrategy::DropNewest);
        queue.enqueue(1);
        queue.enqueue(2);
        let outcome = queue.enqueue(3);

        assert_eq!(outcome, EnqueueOutcome::DroppedNewest);
        assert_eq!(queue.dropped(), 1);
        assert_eq!(queue.drain(), vec![1, 2]);
    }

    #[test]
    fn test_buffer_grows_past_capacity() {
        let mut queue = BackpressureQueue::new(2, OverflowStrategy::Buffer);
        queue.enqueue(1);
        queue.enqueue(2);
        queue.enqueue(3);

        assert_eq!(queue.dropped(), 0);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.drain(), vec![1, 2, 3]);
    }

    #[test]
    fn test_below_capacity_always_stores() {
        for strategy in [
            OverflowStrategy::DropNewest,
            OverflowStrategy::DropOldest,
            OverflowStrategy::Buffer,
        ] {
            let mut queue = BackpressureQueue::new(4, strategy);
            assert_eq!(queue.enqueue(1), EnqueueOutcome::Stored);
            assert_eq!(queue.len(), 1);
            assert_eq!(queue.dropped(), 0);
        }
    }

    #[test]
    fn test_dequeue_and_peek_are_fifo() {
        let mut queue = BackpressureQueue::new(4, OverflowStrategy::Buffer);
        queue.enqueue("a");
        queue.enqueue("b");

        assert_eq!(queue.peek(), Some(&"a"));
        assert_eq!(queue.dequeue(), Some("a"));
        assert_eq!(queue.dequeue(), Some("b"));
        assert_eq!(queue.dequeue(), None);
        assert_eq!(queue.peek(), None);
    }

    #[test]
    fn test_drain_leaves_queue_empty() {
        let mut queue = BackpressureQueue::new(4, OverflowStrategy::Buffer);
        queue.enqueue(1);
        queue.enqueue(2);

        assert_eq!(queue.drain(), vec![1, 2]);
        assert!(queue.is_empty());
        assert_eq!(queue.drain(), Vec::<i32>::new());
    }

    #[test]
    fn test_clear_keeps_dropped_counter() {
        let mut queue = BackpressureQueue::new(1, OverflowStrategy::DropNewest);
        queue.enqueue(1);
        queue.enqueue(2); // dropped

        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.dropped(), 1);
    }

    #[test]
    fn test_is_full_tracks_capacity() {
        let mut queue = BackpressureQueue::new(2, OverflowStrategy::DropNewest);
        assert!(!queue.is_full());
        queue.enqueue(1);
        queue.enqueue(2);
        assert!(queue.is_full());
        queue.dequeue();
        assert!(!queue.is_full());
    }

    #[test]
    fn test_dropped_counter_is_monotone() {
        let mut queue = BackpressureQueue::new(1, OverflowStrategy::DropOldest);
        queue.enqueue(1);
        for v in 2..=5 {
            queue.enqueue(v);
        }
        assert_eq!(queue.dropped(), 4);
        assert_eq!(queue.drain(), vec![5]);
    }

    #[test]
    fn test_from_config() {
        let config = QueueConfig {
            max_size: 3,
            strategy: OverflowStrategy::DropOldest,
        };
        let mut queue = BackpressureQueue::from_config(&config);
        for v in 1..=4 {
            queue.enqueue(v);
        }
        assert_eq!(queue.drain(), vec![2, 3, 4]);
        assert_eq!(queue.dropped(), 1);
    }

    #[test]
    fn test_config_snake_case_wire_names() {
        let config = QueueConfig {
            max_size: 8,
            strategy: OverflowStrategy::DropNewest,
        };
        let json = serde_json::to_string(&config).expect("serialize");
        assert_eq!(json, r#"{"max_size":8,"strategy":"drop_newest"}"#);

        let parsed: QueueConfig =
            serde_json::from_str(r#"{"max_size":2,"strategy":"drop_oldest"}"#).expect("parse");
        assert_eq!(parsed.strategy, OverflowStrategy::DropOldest);
    }
}
