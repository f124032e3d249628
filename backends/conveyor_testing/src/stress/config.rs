//! Stress run configuration.

use core::time::Duration;

/// How long a single blocking queue operation may wait before it counts as
/// a failure, unless [`StressConfig::operation_timeout`] says otherwise.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for a queue stress run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StressConfig {
    /// Number of threads hammering the queue
    thread_count: usize,
    /// Operations each thread performs
    iterations: usize,
    /// Optional wall-clock budget after which threads stop early
    duration: Option<Duration>,
    /// Upper bound for one `put_timeout`/`take_timeout` call
    operation_timeout: Duration,
}

impl StressConfig {
    /// Creates a configuration with 4 threads, 1000 iterations, no time
    /// budget and [`DEFAULT_OPERATION_TIMEOUT`] per queue operation.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            thread_count: 4,
            iterations: 1000,
            duration: None,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Sets the number of threads to spawn.
    #[must_use]
    pub const fn threads(mut self, count: usize) -> Self {
        self.thread_count = count;
        self
    }

    /// Sets the number of operations per thread.
    #[must_use]
    pub const fn iterations(mut self, count: usize) -> Self {
        self.iterations = count;
        self
    }

    /// Stops every thread once `duration` elapsed, even if iterations remain.
    #[must_use]
    pub const fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Bounds how long a single blocking put or take may wait.
    #[must_use]
    pub const fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Returns the thread count.
    #[must_use]
    pub const fn get_thread_count(&self) -> usize {
        self.thread_count
    }

    /// Returns the iteration count.
    #[must_use]
    pub const fn get_iterations(&self) -> usize {
        self.iterations
    }

    /// Returns the optional time budget.
    #[must_use]
    pub const fn get_duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Returns the per-operation wait bound.
    #[must_use]
    pub const fn get_operation_timeout(&self) -> Duration {
        self.operation_timeout
    }
}

impl Default for StressConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use super::{StressConfig, DEFAULT_OPERATION_TIMEOUT};

    #[test]
    fn builder_overrides_only_what_it_is_given() {
        let config = StressConfig::new()
            .threads(8)
            .operation_timeout(Duration::from_millis(20));

        assert_eq!(config.get_thread_count(), 8);
        assert_eq!(config.get_iterations(), 1000);
        assert_eq!(config.get_duration(), None);
        assert_eq!(config.get_operation_timeout(), Duration::from_millis(20));
        assert_eq!(
            StressConfig::default().get_operation_timeout(),
            DEFAULT_OPERATION_TIMEOUT
        );
    }
}
