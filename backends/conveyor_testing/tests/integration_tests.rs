//! End-to-end drain scenarios against the bounded queue.

use conveyor_core::queue::{OrderPolicy, QueueOptions, WakePolicy};
use conveyor_testing::scenarios::{run_tagged_drain, DrainPlan};
use ntest::timeout;
use serial_test::serial;

fn plan(order: OrderPolicy, wake: WakePolicy) -> DrainPlan {
    DrainPlan {
        options: QueueOptions::new(10).order(order).wake(wake),
        producers: 4,
        items_per_producer: 1000,
        consumers: 4,
    }
}

#[test]
#[serial]
#[timeout(60000)]
fn four_by_four_drain_loses_nothing_with_reference_policies() {
    let outcome = run_tagged_drain(plan(OrderPolicy::Lifo, WakePolicy::Broadcast));

    assert_eq!(outcome.produced.len(), 4000);
    assert_eq!(outcome.consumed.len(), 4000);
    assert!(outcome.duplicates().is_empty());
    assert!(outcome.missing().is_empty());
    assert!(outcome.is_lossless());
    assert_eq!(outcome.remaining, 0);
    assert!(outcome.peak_len <= 10);
}

#[test]
#[serial]
#[timeout(120000)]
fn four_by_four_drain_loses_nothing_with_every_policy() {
    for order in [OrderPolicy::Lifo, OrderPolicy::Fifo] {
        for wake in [WakePolicy::Broadcast, WakePolicy::Targeted] {
            let outcome = run_tagged_drain(plan(order, wake));
            assert!(outcome.is_lossless(), "{order}/{wake} lost or duplicated items");
            assert_eq!(outcome.remaining, 0, "{order}/{wake} left items behind");
            assert!(outcome.peak_len <= 10, "{order}/{wake} exceeded capacity");
        }
    }
}

#[test]
#[serial]
#[timeout(30000)]
fn uneven_thread_counts_still_drain_exactly() {
    let outcome = run_tagged_drain(DrainPlan {
        options: QueueOptions::new(1).wake(WakePolicy::Targeted),
        producers: 1,
        items_per_producer: 500,
        consumers: 7,
    });

    assert!(outcome.is_lossless());
    assert!(outcome.peak_len <= 1);
}
