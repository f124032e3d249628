use std::sync::Arc;
use std::thread;

use crate::queue::BoundedQueue;

use super::{Console, Job, Role, Worker, WorkerReport, WorkerSettings};

/// Upper bound (exclusive) of the values producers generate.
pub const MAX_JOB_VALUE: u32 = 1000;

/// `Producer` generates jobs and puts them on the shared queue.
pub struct Producer {
    name: String,
    queue: Arc<BoundedQueue<Job>>,
    console: Arc<Console>,
    settings: WorkerSettings,
}

impl Producer {
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

impl Worker for Producer {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> Role {
        Role::Producer
    }

    fn run(self) -> WorkerReport {
        tracing::debug!(worker = %self.name, limit = ?self.settings.get_limit(), "producer started");

        let mut produced: u64 = 0;
        while self.settings.allows(produced) {
            let value = fastrand::u32(..MAX_JOB_VALUE);
            let job = Job::new(self.name.as_str(), produced, value);

            if let Err(err) = self.queue.put(job) {
                tracing::debug!(worker = %self.name, %err, "queue closed, producer stopping");
                break;
            }
            produced += 1;

            if let Err(err) = self
                .console
                .line(format_args!("{} produced {value}", self.name))
            {
                tracing::warn!(worker = %self.name, %err, "failed to write console line");
            }

            thread::sleep(self.settings.get_pause().sample());
        }

        tracing::debug!(worker = %self.name, produced, "producer finished");
        WorkerReport::new(self.name, Role::Producer, produced)
    }
}
