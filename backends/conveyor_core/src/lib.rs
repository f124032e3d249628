//! Core crate of the conveyor workspace.
//!
//! - [`queue`]: the bounded, blocking [`queue::BoundedQueue`] shared by
//!   producer and consumer threads.
//! - [`workers`]: demonstration producers and consumers plus the pool that
//!   runs them.

pub mod queue;
pub mod workers;

pub use queue::{BoundedQueue, OrderPolicy, PutError, QueueError, QueueOptions, TakeError, WakePolicy};
