//! Language-agnostic process orchestration.
//!
//! Core owns the child process lifecycle, output multiplexing, and the
//! post-exit drain window. Language-specific build/run templates live in
//! judge backends.

pub mod supervisor;
pub mod types;
pub mod watchdog;
