//! Stress run framework.
//!
//! [`StressHarness`] spawns a configurable number of threads that call the
//! same operation repeatedly and counts how many calls succeeded.

use core::time::Duration;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

pub mod config;
pub mod queue;

pub use config::{StressConfig, DEFAULT_OPERATION_TIMEOUT};

/// Outcome of a stress run.
#[derive(Debug, Clone, PartialEq)]
pub struct StressResult {
    /// Operations that reported success
    pub successes: usize,
    /// Operations that reported failure
    pub failures: usize,
    /// Wall-clock time of the whole run
    pub duration: Duration,
    /// Number of threads used
    pub thread_count: usize,
}

impl StressResult {
    /// Total number of operations performed.
    #[must_use]
    pub const fn total_operations(&self) -> usize {
        self.successes + self.failures
    }

    /// Share of successful operations, between 0.0 and 1.0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.total_operations() == 0 {
            return 0.0;
        }
        self.successes as f64 / self.total_operations() as f64
    }
}

/// Runs one operation from many threads at once.
pub struct StressHarness {
    config: StressConfig,
}

impl StressHarness {
    /// Creates a harness for `config`.
    #[must_use]
    pub const fn new(config: StressConfig) -> Self {
        Self { config }
    }

    /// Calls `operation(thread_id, iteration)` from every thread until each
    /// thread used up its iterations or the time budget ran out.
    ///
    /// The operation returns `true` on success. A thread that panics counts
    /// its remaining iterations as lost, not as failures.
    ///
    /// # Panics
    ///
    /// Panics if a harness thread cannot be spawned.
    pub fn run<F>(self, operation: F) -> StressResult
    where
        F: Fn(usize, usize) -> bool + Send + Sync + 'static,
    {
        let started = Instant::now();
        let operation = Arc::new(operation);
        let successes = Arc::new(AtomicUsize::new(0));
        let failures = Arc::new(AtomicUsize::new(0));
        let deadline = self
            .config
            .get_duration()
            .and_then(|budget| started.checked_add(budget));
        let stop = Arc::new(AtomicBool::new(false));

        let thread_count = self.config.get_thread_count();
        let iterations = self.config.get_iterations();
        tracing::debug!(thread_count, iterations, ?deadline, "stress run starting");

        let handles: Vec<_> = (0..thread_count)
            .map(|thread_id| {
                let operation = Arc::clone(&operation);
                let successes = Arc::clone(&successes);
                let failures = Arc::clone(&failures);
                let stop = Arc::clone(&stop);

                thread::Builder::new()
                    .name(format!("stress-{thread_id}"))
                    .spawn(move || {
                        for iteration in 0..iterations {
                            if stop.load(Ordering::Acquire)
                                || deadline.is_some_and(|deadline| Instant::now() >= deadline)
                            {
                                stop.store(true, Ordering::Release);
                                break;
                            }

                            if operation(thread_id, iteration) {
                                successes.fetch_add(1, Ordering::Relaxed);
                            } else {
                                failures.fetch_add(1, Ordering::Relaxed);
                            }
                        }
                    })
                    .expect("should spawn stress thread")
            })
            .collect();

        for handle in handles {
            if handle.join().is_err() {
                tracing::error!("stress thread panicked");
            }
        }

        let result = StressResult {
            successes: successes.load(Ordering::Relaxed),
            failures: failures.load(Ordering::Relaxed),
            duration: started.elapsed(),
            thread_count,
        };
        tracing::debug!(?result, "stress run finished");
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::{StressConfig, StressHarness, StressResult};

    #[test]
    fn counts_every_operation() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);

        let result = StressHarness::new(StressConfig::new().threads(3).iterations(10)).run(
            move |_thread_id, iteration| {
                counter_clone.fetch_add(1, Ordering::Relaxed);
                iteration % 2 == 0
            },
        );

        assert_eq!(counter.load(Ordering::Relaxed), 30);
        assert_eq!(result.successes, 15);
        assert_eq!(result.failures, 15);
        assert_eq!(result.thread_count, 3);
    }

    #[test]
    fn time_budget_stops_threads_early() {
        let result = StressHarness::new(
            StressConfig::new()
                .threads(2)
                .iterations(usize::MAX)
                .duration(Duration::from_millis(30)),
        )
        .run(|_, _| {
            std::thread::sleep(Duration::from_millis(1));
            true
        });

        assert!(result.successes > 0);
        assert_eq!(result.failures, 0);
    }

    #[test]
    fn success_rate_of_empty_run_is_zero() {
        let result = StressResult {
            successes: 0,
            failures: 0,
            duration: Duration::ZERO,
            thread_count: 0,
        };
        assert!(result.success_rate().abs() < f64::EPSILON);
    }
}
