//! Producer and consumer workers driving a shared [`BoundedQueue`].
//!
//! Workers are thin loops around [`BoundedQueue::put`] and
//! [`BoundedQueue::take`]: they generate or report a [`Job`], write a line
//! to the shared [`Console`] and sleep for a while. They stop when their
//! optional limit is reached or when the queue gets closed.
//!
//! [`BoundedQueue`]: crate::queue::BoundedQueue
//! [`BoundedQueue::put`]: crate::queue::BoundedQueue::put
//! [`BoundedQueue::take`]: crate::queue::BoundedQueue::take

mod console;
mod consumer;
mod job;
mod pool;
mod producer;
mod settings;

pub use console::*;
pub use consumer::*;
pub use job::*;
pub use pool::*;
pub use producer::*;
pub use settings::*;

use std::time::Duration;

pub type WorkerResult<T> = core::result::Result<T, WorkerError>;

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("worker thread {name} panicked: {reason}")]
    Panicked { name: String, reason: String },

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("invalid pause range: min {min:?} is greater than max {max:?}")]
    InvalidPause { min: Duration, max: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Producer,
    Consumer,
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Role::Producer => f.write_str("producer"),
            Role::Consumer => f.write_str("consumer"),
        }
    }
}

/// `WorkerReport` is what a worker hands back once its loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub name: String,
    pub role: Role,
    pub processed: u64,
}

impl WorkerReport {
    #[must_use]
    pub fn new(name: impl Into<String>, role: Role, processed: u64) -> Self {
        Self {
            name: name.into(),
            role,
            processed,
        }
    }
}

/// `Worker` is a loop that runs on its own thread until it decides to stop.
pub trait Worker: Send + 'static {
    fn name(&self) -> &str;

    fn role(&self) -> Role;

    /// Runs the loop to completion on the calling thread.
    fn run(self) -> WorkerReport;
}
