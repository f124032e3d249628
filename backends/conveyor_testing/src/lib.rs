//! Reusable stress testing infrastructure for the conveyor bounded queue.
//!
//! This crate provides:
//! - **Stress test framework**: configurable high-contention runs
//! - **Queue stress runs**: balanced put/take workloads against a
//!   [`conveyor_core::BoundedQueue`]
//! - **Scenarios**: tagged producer/consumer drains that prove no item is
//!   lost or duplicated
//!
//! # Examples
//!
//! ```rust
//! use conveyor_testing::stress::{StressConfig, StressHarness};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let config = StressConfig::new()
//!     .threads(4)
//!     .iterations(100);
//!
//! let counter = Arc::new(AtomicUsize::new(0));
//! let harness = StressHarness::new(config);
//!
//! let counter_clone = Arc::clone(&counter);
//! let results = harness.run(move |_thread_id, _iteration| {
//!     counter_clone.fetch_add(1, Ordering::Relaxed);
//!     true
//! });
//!
//! assert_eq!(results.successes, 400);
//! assert!(results.success_rate() > 0.99);
//! ```

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod scenarios;
pub mod stress;

pub use scenarios::{DrainOutcome, DrainPlan, Tag};
pub use stress::{StressConfig, StressHarness, StressResult};
