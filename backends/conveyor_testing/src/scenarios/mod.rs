//! Producer/consumer scenarios with end-to-end bookkeeping.

pub mod tagged_drain;

pub use tagged_drain::{run_tagged_drain, DrainOutcome, DrainPlan, Tag};
