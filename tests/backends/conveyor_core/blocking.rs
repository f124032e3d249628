//! Blocking behaviour of the bounded queue, observed from other threads.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use conveyor_core::queue::{
    BoundedQueue, OrderPolicy, PutError, QueueError, QueueOptions, TakeError, WakePolicy,
};
use ntest::timeout;
use serial_test::serial;

const SETTLE: Duration = Duration::from_millis(100);
const WINDOW: Duration = Duration::from_secs(2);

fn every_policy(capacity: usize) -> Vec<QueueOptions> {
    [OrderPolicy::Lifo, OrderPolicy::Fifo]
        .into_iter()
        .flat_map(|order| {
            [WakePolicy::Broadcast, WakePolicy::Targeted]
                .into_iter()
                .map(move |wake| QueueOptions::new(capacity).order(order).wake(wake))
        })
        .collect()
}

#[test]
#[serial]
#[timeout(20000)]
fn take_on_empty_queue_waits_for_a_put() {
    for options in every_policy(10) {
        let queue = Arc::new(BoundedQueue::with_options(options).unwrap());
        let (sender, receiver) = mpsc::channel();

        let consumer_queue = Arc::clone(&queue);
        let consumer = thread::spawn(move || {
            sender
                .send(consumer_queue.take())
                .expect("should report taken item");
        });

        assert_eq!(
            receiver.recv_timeout(SETTLE),
            Err(RecvTimeoutError::Timeout),
            "take returned before anything was put"
        );

        queue.put(1234).unwrap();
        assert_eq!(receiver.recv_timeout(WINDOW), Ok(Ok(1234)));
        consumer.join().expect("consumer finished");
    }
}

#[test]
#[serial]
#[timeout(20000)]
fn put_on_full_queue_waits_for_a_take() {
    for options in every_policy(2) {
        let queue = Arc::new(BoundedQueue::with_options(options).unwrap());
        queue.put(1).unwrap();
        queue.put(2).unwrap();

        let (sender, receiver) = mpsc::channel();
        let producer_queue = Arc::clone(&queue);
        let producer = thread::spawn(move || {
            sender
                .send(producer_queue.put(3))
                .expect("should report put outcome");
        });

        assert_eq!(
            receiver.recv_timeout(SETTLE),
            Err(RecvTimeoutError::Timeout),
            "put returned while the queue was full"
        );
        assert_eq!(queue.len(), 2);

        let first = queue.take().unwrap();
        assert_eq!(receiver.recv_timeout(WINDOW), Ok(Ok(())));
        producer.join().expect("producer finished");

        let mut rest = queue.drain();
        rest.push(first);
        rest.sort_unstable();
        assert_eq!(rest, vec![1, 2, 3]);
    }
}

#[test]
fn single_producer_single_consumer_order() {
    let lifo = BoundedQueue::new(10).unwrap();
    lifo.put(1).unwrap();
    lifo.put(2).unwrap();
    assert_eq!(lifo.take(), Ok(2));
    assert_eq!(lifo.take(), Ok(1));

    let fifo = BoundedQueue::with_options(QueueOptions::new(10).order(OrderPolicy::Fifo)).unwrap();
    fifo.put(1).unwrap();
    fifo.put(2).unwrap();
    assert_eq!(fifo.take(), Ok(1));
    assert_eq!(fifo.take(), Ok(2));
}

#[test]
fn construction_rejects_zero_capacity() {
    assert_eq!(
        BoundedQueue::<u64>::new(0).unwrap_err(),
        QueueError::InvalidCapacity(0)
    );
    assert!(BoundedQueue::<u64>::with_options(QueueOptions::new(0).wake(WakePolicy::Targeted))
        .is_err());
}

#[test]
fn independent_queues_do_not_share_state() {
    let first = BoundedQueue::new(1).unwrap();
    let second = BoundedQueue::new(1).unwrap();

    first.put("a").unwrap();
    assert!(first.is_full());
    assert!(second.is_empty());
    assert_eq!(second.try_put("b"), Ok(()));

    first.close();
    assert!(!second.is_closed());
}

#[test]
#[serial]
#[timeout(20000)]
fn close_releases_every_blocked_thread() {
    for options in every_policy(1) {
        let full = Arc::new(BoundedQueue::with_options(options).unwrap());
        full.put(0).unwrap();
        let empty = Arc::new(BoundedQueue::<i32>::with_options(options).unwrap());

        let (sender, receiver) = mpsc::channel();
        let mut handles = Vec::new();
        for value in 1..=3 {
            let queue = Arc::clone(&full);
            let sender = sender.clone();
            handles.push(thread::spawn(move || {
                let outcome = queue.put(value);
                sender.send(outcome.is_err()).expect("should report");
            }));
        }
        for _ in 0..3 {
            let queue = Arc::clone(&empty);
            let sender = sender.clone();
            handles.push(thread::spawn(move || {
                let outcome = queue.take();
                sender
                    .send(outcome == Err(TakeError::Closed))
                    .expect("should report");
            }));
        }
        drop(sender);

        assert_eq!(receiver.recv_timeout(SETTLE), Err(RecvTimeoutError::Timeout));

        full.close();
        empty.close();

        let outcomes: Vec<bool> = receiver.iter().collect();
        assert_eq!(outcomes, vec![true; 6]);
        for handle in handles {
            handle.join().expect("worker finished");
        }

        assert_eq!(full.take(), Ok(0));
        assert_eq!(full.take(), Err(TakeError::Closed));
        assert!(matches!(full.put(9), Err(PutError::Closed(9))));
    }
}
