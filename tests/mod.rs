//! Workspace integration tests for the conveyor crates.
//!
//! Test binaries live under `backends/<crate>/` and are registered in this
//! package's manifest.
