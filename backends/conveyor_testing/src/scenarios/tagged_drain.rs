//! Producers put distinct tagged items, consumers drain an exact total.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use conveyor_core::queue::{BoundedQueue, QueueOptions};

/// Identifies one item: who produced it and its position in that
/// producer's sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    /// Index of the producing thread
    pub producer: usize,
    /// Per-producer sequence number
    pub sequence: usize,
}

/// Shape of a drain scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainPlan {
    /// Queue the scenario runs against
    pub options: QueueOptions,
    /// Number of producer threads
    pub producers: usize,
    /// Distinct items each producer puts
    pub items_per_producer: usize,
    /// Number of consumer threads sharing the drain
    pub consumers: usize,
}

impl Default for DrainPlan {
    fn default() -> Self {
        Self {
            options: QueueOptions::new(10),
            producers: 4,
            items_per_producer: 1000,
            consumers: 4,
        }
    }
}

impl DrainPlan {
    /// Total number of items the producers put.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.producers * self.items_per_producer
    }
}

/// What a drain scenario observed.
#[derive(Debug, Clone, Default)]
pub struct DrainOutcome {
    /// Every tag producers put
    pub produced: Vec<Tag>,
    /// Every tag consumers took, in no particular order
    pub consumed: Vec<Tag>,
    /// Items left in the queue once all threads finished
    pub remaining: usize,
    /// Largest length a watcher thread observed while the scenario ran
    pub peak_len: usize,
}

impl DrainOutcome {
    /// Tags taken more than once.
    #[must_use]
    pub fn duplicates(&self) -> Vec<Tag> {
        let mut seen = HashSet::with_capacity(self.consumed.len());
        self.consumed
            .iter()
            .filter(|tag| !seen.insert(**tag))
            .copied()
            .collect()
    }

    /// Tags that were put but never taken.
    #[must_use]
    pub fn missing(&self) -> Vec<Tag> {
        let consumed: HashSet<&Tag> = self.consumed.iter().collect();
        self.produced
            .iter()
            .filter(|tag| !consumed.contains(tag))
            .copied()
            .collect()
    }

    /// True when the consumed multiset equals the produced one.
    #[must_use]
    pub fn is_lossless(&self) -> bool {
        let mut produced = self.produced.clone();
        let mut consumed = self.consumed.clone();
        produced.sort_unstable();
        consumed.sort_unstable();
        produced == consumed
    }
}

/// Runs `plan` to completion and returns what was put and taken.
///
/// Consumers claim take slots from a shared counter, so exactly
/// `plan.total()` takes happen without closing the queue.
///
/// # Examples
///
/// ```
/// use conveyor_core::queue::QueueOptions;
/// use conveyor_testing::scenarios::{run_tagged_drain, DrainPlan};
///
/// let outcome = run_tagged_drain(DrainPlan {
///     options: QueueOptions::new(4),
///     producers: 2,
///     items_per_producer: 50,
///     consumers: 3,
/// });
///
/// assert!(outcome.is_lossless());
/// assert_eq!(outcome.remaining, 0);
/// ```
///
/// # Panics
///
/// Panics if the plan carries a zero capacity or a scenario thread panics.
#[must_use]
pub fn run_tagged_drain(plan: DrainPlan) -> DrainOutcome {
    let queue = Arc::new(BoundedQueue::with_options(plan.options).expect("valid queue options"));
    let total = plan.total();
    let claimed = Arc::new(AtomicUsize::new(0));
    let finished = Arc::new(AtomicBool::new(false));

    tracing::debug!(
        producers = plan.producers,
        consumers = plan.consumers,
        total,
        "tagged drain starting"
    );

    let watcher = {
        let queue = Arc::clone(&queue);
        let finished = Arc::clone(&finished);
        thread::spawn(move || {
            let mut peak = 0;
            while !finished.load(Ordering::Acquire) {
                peak = peak.max(queue.len());
                thread::yield_now();
            }
            peak
        })
    };

    let producers: Vec<_> = (0..plan.producers)
        .map(|producer| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                let mut produced = Vec::with_capacity(plan.items_per_producer);
                for sequence in 0..plan.items_per_producer {
                    let tag = Tag { producer, sequence };
                    queue.put(tag).expect("queue stays open");
                    produced.push(tag);
                }
                produced
            })
        })
        .collect();

    let consumers: Vec<_> = (0..plan.consumers)
        .map(|_| {
            let queue = Arc::clone(&queue);
            let claimed = Arc::clone(&claimed);
            thread::spawn(move || {
                let mut consumed = Vec::new();
                while claimed.fetch_add(1, Ordering::AcqRel) < total {
                    consumed.push(queue.take().expect("queue stays open"));
                }
                consumed
            })
        })
        .collect();

    let mut outcome = DrainOutcome::default();
    for producer in producers {
        outcome
            .produced
            .extend(producer.join().expect("producer thread finished"));
    }
    for consumer in consumers {
        outcome
            .consumed
            .extend(consumer.join().expect("consumer thread finished"));
    }

    finished.store(true, Ordering::Release);
    outcome.peak_len = watcher.join().expect("watcher thread finished");
    outcome.remaining = queue.len();

    tracing::debug!(
        produced = outcome.produced.len(),
        consumed = outcome.consumed.len(),
        peak_len = outcome.peak_len,
        "tagged drain finished"
    );
    outcome
}
