use std::sync::Arc;
use std::thread;

use crate::queue::{BoundedQueue, TakeError};

use super::{Console, Job, Role, Worker, WorkerReport, WorkerSettings};

/// `Consumer` takes jobs off the shared queue and reports them.
pub struct Consumer {
    name: String,
    queue: Arc<BoundedQueue<Job>>,
    console: Arc<Console>,
    settings: WorkerSettings,
}

impl Consumer {
    pub fn new(
        name: impl Into<String>,
        queue: Arc<BoundedQueue<Job>>,
        console: Arc<Console>,
        settings: WorkerSettings,
    ) -> Self {
        Self {
            name: name.into(),
            queue,
            console,
            settings,
        }
    }
}

impl Worker for Consumer {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> Role {
        Role::Consumer
    }

    fn run(self) -> WorkerReport {
        tracing::debug!(worker = %self.name, limit = ?self.settings.get_limit(), "consumer started");

        let mut consumed: u64 = 0;
        while self.settings.allows(consumed) {
            let job = match self.queue.take() {
                Ok(job) => job,
                Err(TakeError::Closed) => {
                    tracing::debug!(worker = %self.name, "queue closed and drained, consumer stopping");
                    break;
                }
                Err(err) => {
                    tracing::warn!(worker = %self.name, %err, "unexpected take failure");
                    break;
                }
            };
            consumed += 1;

            if let Err(err) = self.console.line(format_args!(
                "{} consumed {} from {}",
                self.name, job.value, job.producer
            )) {
                tracing::warn!(worker = %self.name, %err, "failed to write console line");
            }

            thread::sleep(self.settings.get_pause().sample());
        }

        tracing::debug!(worker = %self.name, consumed, "consumer finished");
        WorkerReport::new(self.name, Role::Consumer, consumed)
    }
}
