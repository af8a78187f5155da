//! Test execution
//!
//! Drives the orchestrator over collected fixtures for each backend.

pub mod executor;

pub use executor::{TestRunner, TestTarget};
