//! Stress runs against [`BoundedQueue`].

use std::sync::Arc;

use conveyor_core::queue::{BoundedQueue, QueueOptions};

use super::{StressConfig, StressHarness, StressResult};

/// Runs a balanced put/take workload against a fresh queue.
///
/// Even numbered threads put, odd numbered threads take, so an even thread
/// count yields the same number of each. Every operation also checks that
/// the queue never reports more items than its capacity. A put or take
/// that waits longer than [`StressConfig::get_operation_timeout`] counts as
/// a failure.
///
/// # Examples
///
/// ```
/// use conveyor_core::queue::{QueueOptions, WakePolicy};
/// use conveyor_testing::stress::{queue::run_queue_stress, StressConfig};
///
/// let config = StressConfig::new().threads(4).iterations(200);
/// let result = run_queue_stress(config, QueueOptions::new(8).wake(WakePolicy::Targeted));
///
/// assert_eq!(result.failures, 0);
/// assert_eq!(result.successes, 800);
/// ```
///
/// # Panics
///
/// Panics if `options` carry a zero capacity.
#[must_use]
pub fn run_queue_stress(config: StressConfig, options: QueueOptions) -> StressResult {
    let queue = Arc::new(BoundedQueue::with_options(options).expect("valid queue options"));
    let capacity = queue.capacity();
    let timeout = config.get_operation_timeout();

    StressHarness::new(config).run(move |thread_id, iteration| {
        let applied = if thread_id % 2 == 0 {
            queue
                .put_timeout((thread_id, iteration), timeout)
                .is_ok()
        } else {
            queue.take_timeout(timeout).is_ok()
        };
        applied && queue.len() <= capacity
    })
}

/// Hammers a queue with non-blocking `try_put`/`try_take` calls.
///
/// Rejections (full or empty) are expected and count as successes as long
/// as the capacity invariant holds, so the run measures contention on the
/// lock rather than hand-offs.
///
/// # Panics
///
/// Panics if `options` carry a zero capacity.
#[must_use]
pub fn run_try_queue_stress(config: StressConfig, options: QueueOptions) -> StressResult {
    let queue = Arc::new(BoundedQueue::with_options(options).expect("valid queue options"));
    let capacity = queue.capacity();

    StressHarness::new(config).run(move |thread_id, iteration| {
        if thread_id % 2 == 0 {
            let _ = queue.try_put(iteration);
        } else {
            let _ = queue.try_take();
        }
        queue.len() <= capacity
    })
}
