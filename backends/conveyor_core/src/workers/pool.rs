//! Spawns and joins the producer and consumer threads of one queue.

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::queue::BoundedQueue;

use super::{
    Console, Consumer, Job, Producer, Role, Worker, WorkerError, WorkerReport, WorkerResult,
    WorkerSettings,
};

/// How many workers of each kind to start and how they behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolPlan {
    producers: usize,
    consumers: usize,
    producer: WorkerSettings,
    consumer: WorkerSettings,
}

impl Default for PoolPlan {
    fn default() -> Self {
        Self::new(2, 2)
    }
}

impl PoolPlan {
    #[must_use]
    pub fn new(producers: usize, consumers: usize) -> Self {
        Self {
            producers,
            consumers,
            producer: WorkerSettings::default(),
            consumer: WorkerSettings::default(),
        }
    }

    #[must_use]
    pub fn producer_settings(mut self, settings: WorkerSettings) -> Self {
        self.producer = settings;
        self
    }

    /// Consumers with a limit may all stop while producers still have jobs
    /// to put; the last consumer to exit then closes the queue so those
    /// producers stop instead of waiting for a free slot forever.
    #[must_use]
    pub fn consumer_settings(mut self, settings: WorkerSettings) -> Self {
        self.consumer = settings;
        self
    }

    #[must_use]
    pub fn get_producers(&self) -> usize {
        self.producers
    }

    #[must_use]
    pub fn get_consumers(&self) -> usize {
        self.consumers
    }
}

/// Reports gathered from every worker of a pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolReport {
    pub producers: Vec<WorkerReport>,
    pub consumers: Vec<WorkerReport>,
}

impl PoolReport {
    #[must_use]
    pub fn produced(&self) -> u64 {
        self.producers.iter().map(|report| report.processed).sum()
    }

    #[must_use]
    pub fn consumed(&self) -> u64 {
        self.consumers.iter().map(|report| report.processed).sum()
    }
}

struct Handle {
    name: String,
    thread: JoinHandle<WorkerReport>,
}

/// Held by every consumer thread; the last one dropped closes the queue.
struct ConsumerExit {
    remaining: Arc<AtomicUsize>,
    queue: Arc<BoundedQueue<Job>>,
}

impl Drop for ConsumerExit {
    fn drop(&mut self) {
        if self.remaining.fetch_sub(1, Ordering::AcqRel) == 1 && self.queue.close() {
            tracing::debug!("last consumer exited, queue closed");
        }
    }
}

/// `WorkerPool` owns the threads of every worker sharing one queue.
pub struct WorkerPool {
    queue: Arc<BoundedQueue<Job>>,
    producers: Vec<Handle>,
    consumers: Vec<Handle>,
}

impl WorkerPool {
    /// Starts `plan.producers` producers named `producer-<i>` and
    /// `plan.consumers` consumers named `consumer-<i>`, each on its own
    /// named thread.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Spawn`] if a thread could not be created; the
    /// queue is closed and already started workers are joined first.
    pub fn spawn(
        queue: Arc<BoundedQueue<Job>>,
        console: Arc<Console>,
        plan: PoolPlan,
    ) -> WorkerResult<Self> {
        let mut pool = Self {
            queue,
            producers: Vec::with_capacity(plan.producers),
            consumers: Vec::with_capacity(plan.consumers),
        };

        let remaining = Arc::new(AtomicUsize::new(plan.consumers));
        for index in 0..plan.consumers {
            let consumer = Consumer::new(
                format!("consumer-{index}"),
                Arc::clone(&pool.queue),
                Arc::clone(&console),
                plan.consumer,
            );
            let exit = ConsumerExit {
                remaining: Arc::clone(&remaining),
                queue: Arc::clone(&pool.queue),
            };
            match spawn_worker(consumer, exit) {
                Ok(handle) => pool.consumers.push(handle),
                Err(err) => return Err(pool.abort(err)),
            }
        }

        for index in 0..plan.producers {
            let producer = Producer::new(
                format!("producer-{index}"),
                Arc::clone(&pool.queue),
                Arc::clone(&console),
                plan.producer,
            );
            match spawn_worker(producer, ()) {
                Ok(handle) => pool.producers.push(handle),
                Err(err) => return Err(pool.abort(err)),
            }
        }

        tracing::info!(
            producers = plan.producers,
            consumers = plan.consumers,
            "worker pool started"
        );
        Ok(pool)
    }

    fn abort(self, err: WorkerError) -> WorkerError {
        tracing::error!(%err, "failed to start worker pool");
        if let Err(join_err) = self.shutdown() {
            tracing::error!(%join_err, "worker failed while aborting pool start");
        }
        err
    }

    /// The queue every worker of this pool shares.
    #[must_use]
    pub fn queue(&self) -> &Arc<BoundedQueue<Job>> {
        &self.queue
    }

    /// Waits for every producer, closes the queue, then waits for the
    /// consumers to drain it.
    ///
    /// Producers without a limit only stop once somebody closes the queue,
    /// until then this call blocks.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Panicked`] for the first worker that
    /// panicked, after every other worker was joined.
    pub fn join(self) -> WorkerResult<PoolReport> {
        let mut failure = None;

        let producers = collect(self.producers, &mut failure);
        if self.queue.close() {
            tracing::debug!("producers finished, queue closed");
        }
        let consumers = collect(self.consumers, &mut failure);

        match failure {
            Some(err) => Err(err),
            None => Ok(PoolReport {
                producers,
                consumers,
            }),
        }
    }

    /// Closes the queue right away and joins every worker.
    ///
    /// Jobs still buffered are drained by the consumers before they exit.
    ///
    /// # Errors
    ///
    /// Same as [`WorkerPool::join`].
    pub fn shutdown(self) -> WorkerResult<PoolReport> {
        self.queue.close();
        self.join()
    }
}

/// Runs `worker` on its own named thread, keeping `guard` alive until the
/// worker returns or panics.
fn spawn_worker<W: Worker, G: Send + 'static>(worker: W, guard: G) -> WorkerResult<Handle> {
    let name = worker.name().to_string();
    let role: Role = worker.role();
    let thread = thread::Builder::new().name(name.clone()).spawn(move || {
        let _guard = guard;
        worker.run()
    })?;

    tracing::trace!(worker = %name, %role, "worker thread spawned");
    Ok(Handle { name, thread })
}

fn collect(handles: Vec<Handle>, failure: &mut Option<WorkerError>) -> Vec<WorkerReport> {
    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.thread.join() {
            Ok(report) => reports.push(report),
            Err(payload) => {
                let reason = panic_reason(payload.as_ref());
                tracing::error!(worker = %handle.name, %reason, "worker panicked");
                failure.get_or_insert(WorkerError::Panicked {
                    name: handle.name,
                    reason,
                });
            }
        }
    }
    reports
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("unknown panic payload")
    }
}
