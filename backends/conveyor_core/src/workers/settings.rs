use std::time::Duration;

use super::{WorkerError, WorkerResult};

/// `PauseRange` is the window a worker sleeps in between two items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauseRange {
    min: Duration,
    max: Duration,
}

impl Default for PauseRange {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(50),
            max: Duration::from_millis(250),
        }
    }
}

impl PauseRange {
    /// # Errors
    ///
    /// Returns [`WorkerError::InvalidPause`] when `min` is above `max`.
    pub fn new(min: Duration, max: Duration) -> WorkerResult<Self> {
        if min > max {
            return Err(WorkerError::InvalidPause { min, max });
        }
        Ok(Self { min, max })
    }

    /// Never pauses.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn fixed(pause: Duration) -> Self {
        Self {
            min: pause,
            max: pause,
        }
    }

    #[must_use]
    pub const fn min(&self) -> Duration {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> Duration {
        self.max
    }

    /// Picks a pause uniformly within the range at microsecond resolution.
    #[must_use]
    pub fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let low = u64::try_from(self.min.as_micros()).unwrap_or(u64::MAX);
        let high = u64::try_from(self.max.as_micros()).unwrap_or(u64::MAX);
        Duration::from_micros(fastrand::u64(low..=high))
    }
}

/// Per-worker loop settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerSettings {
    limit: Option<u64>,
    pause: PauseRange,
}

impl WorkerSettings {
    #[must_use]
    pub const fn new(limit: Option<u64>, pause: PauseRange) -> Self {
        Self { limit, pause }
    }

    /// Stop after `limit` items. Without a limit the worker runs until
    /// the queue is closed.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn unlimited(mut self) -> Self {
        self.limit = None;
        self
    }

    #[must_use]
    pub const fn pause(mut self, pause: PauseRange) -> Self {
        self.pause = pause;
        self
    }

    #[must_use]
    pub const fn get_limit(&self) -> Option<u64> {
        self.limit
    }

    #[must_use]
    pub const fn get_pause(&self) -> PauseRange {
        self.pause
    }

    pub(crate) fn allows(&self, processed: u64) -> bool {
        self.limit.is_none_or(|limit| processed < limit)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{PauseRange, WorkerSettings};
    use crate::workers::WorkerError;

    #[test]
    fn inverted_pause_range_is_rejected() {
        let err = PauseRange::new(Duration::from_millis(20), Duration::from_millis(10))
            .expect_err("min above max must fail");
        assert!(matches!(err, WorkerError::InvalidPause { .. }));
    }

    #[test]
    fn samples_stay_within_range() {
        let range = PauseRange::new(Duration::from_millis(1), Duration::from_millis(3)).unwrap();
        for _ in 0..100 {
            let pause = range.sample();
            assert!(pause >= range.min() && pause <= range.max());
        }
        assert_eq!(PauseRange::none().sample(), Duration::ZERO);
        assert_eq!(
            PauseRange::fixed(Duration::from_millis(4)).sample(),
            Duration::from_millis(4)
        );
    }

    #[test]
    fn limit_bounds_the_loop() {
        let settings = WorkerSettings::default().limit(2);
        assert!(settings.allows(0));
        assert!(settings.allows(1));
        assert!(!settings.allows(2));

        assert!(settings.unlimited().allows(u64::MAX - 1));
    }
}
