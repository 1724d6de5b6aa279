//! End-to-end tests composing the full streaming surface: operators,
//! combinators, windowing, and backpressure buffering.

use eventflow::{
    combine_latest, merge, session_with_clock, split, tumbling_with_clock, zip,
    BackpressureQueue, EventStream, FnObserver, ManualClock, OverflowStrategy, StreamError,
    StreamWindow,
};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
struct Trade {
    symbol: &'static str,
    price: i64,
}

fn trade(symbol: &'static str, price: i64) -> Trade {
    Trade { symbol, price }
}

fn collect<T: Clone + 'static>(stream: &EventStream<T>) -> Rc<RefCell<Vec<T>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    stream.subscribe(FnObserver::next(move |v: &T| sink.borrow_mut().push(v.clone())));
    seen
}

#[test]
fn test_filter_map_window_pipeline() {
    let clock = ManualClock::new(0);
    let trades: EventStream<Trade> = EventStream::new();

    let btc_prices = trades.filter(|t| t.symbol == "BTC").map(|t| t.price);
    let windows = tumbling_with_clock(&btc_prices, 2, clock.clone()).expect("valid window");
    let batches = collect(&windows);

    trades.emit(trade("BTC", 100));
    trades.emit(trade("ETH", 10));
    clock.advance(50);
    trades.emit(trade("BTC", 110));
    trades.emit(trade("BTC", 120));
    trades.complete();

    let batches = batches.borrow();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].values, vec![100, 110]);
    assert_eq!((batches[0].opened_at, batches[0].closed_at), (0, 50));
    // Partial flush on completion
    assert_eq!(batches[1].values, vec![120]);
    assert!(windows.is_completed());
}

#[test]
fn test_split_then_merge_reunites_streams() {
    let source: EventStream<i64> = EventStream::new();
    let halves = split(&source, |v| v % 2 == 0);

    let labelled_even = halves.matching.map(|v| (*v, "even"));
    let labelled_odd = halves.non_matching.map(|v| (*v, "odd"));
    let reunited = merge(&[labelled_even, labelled_odd]);
    let seen = collect(&reunited);

    for v in 1..=4 {
        source.emit(v);
    }
    source.complete();

    assert_eq!(
        seen.borrow().as_slice(),
        &[(1, "odd"), (2, "even"), (3, "odd"), (4, "even")]
    );
    // A single source completion reaches both halves, so the merge closes
    assert!(reunited.is_completed());
}

#[test]
fn test_zip_and_combine_latest_agree_on_pairing_rules() {
    let bids: EventStream<i64> = EventStream::new();
    let asks: EventStream<i64> = EventStream::new();

    let positional = zip(&bids, &asks);
    let latest = combine_latest(&bids, &asks);
    let zipped = collect(&positional);
    let combined = collect(&latest);

    bids.emit(99);
    bids.emit(98);
    assert!(zipped.borrow().is_empty());
    assert!(combined.borrow().is_empty());

    asks.emit(101);

    // zip pairs positionally; combine_latest pairs most-recent
    assert_eq!(zipped.borrow().as_slice(), &[(99, 101)]);
    assert_eq!(combined.borrow().as_slice(), &[(98, 101)]);
}

#[test]
fn test_session_windows_feed_backpressure_queue() {
    let clock = ManualClock::new(0);
    let events: EventStream<i64> = EventStream::new();
    let sessions = session_with_clock(&events, 1_000, clock.clone()).expect("valid gap");

    // A tiny queue between the window output and a slow consumer
    let queue: Rc<RefCell<BackpressureQueue<StreamWindow<i64>>>> = Rc::new(RefCell::new(
        BackpressureQueue::new(1, OverflowStrategy::DropOldest),
    ));
    let sink = Rc::clone(&queue);
    sessions.windows.subscribe(FnObserver::next(move |w: &StreamWindow<i64>| {
        sink.borrow_mut().enqueue(w.clone());
    }));

    events.emit(1);
    events.emit(2);
    sessions.tick(2_000); // closes [1, 2]

    clock.set(5_000);
    events.emit(3);
    sessions.tick(7_000); // closes [3]; the queue evicts [1, 2]

    let mut queue = queue.borrow_mut();
    assert_eq!(queue.dropped(), 1);
    let survivor = queue.dequeue().expect("one window retained");
    assert_eq!(survivor.values, vec![3]);
    assert!(queue.is_empty());
}

#[test]
fn test_error_propagates_through_composed_pipeline() {
    let source: EventStream<i64> = EventStream::new();
    let pipeline = source.map(|v| v * 2).filter(|v| *v > 0).skip(1);
    let errors = Rc::new(RefCell::new(Vec::new()));
    let slot = Rc::clone(&errors);
    pipeline.subscribe(
        FnObserver::next(|_: &i64| {})
            .with_error(move |e: &StreamError| slot.borrow_mut().push(e.clone())),
    );

    source.emit(1);
    source.error(StreamError::source("feed disconnected"));
    source.emit(2); // ignored, source is terminal

    assert_eq!(
        errors.borrow().as_slice(),
        &[StreamError::source("feed disconnected")]
    );
    assert!(pipeline.is_errored());
}

#[test]
fn test_late_subscriber_sees_terminal_signal_through_operators() {
    let source: EventStream<i64> = EventStream::new();
    let doubled = source.map(|v| v * 2);
    source.complete();

    // Subscribing after the fact replays completion synchronously
    let completed = Rc::new(RefCell::new(false));
    let flag = Rc::clone(&completed);
    doubled.subscribe(FnObserver::next(|_: &i64| {}).with_complete(move || {
        *flag.borrow_mut() = true;
    }));

    assert!(*completed.borrow());
}
