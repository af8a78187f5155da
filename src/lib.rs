//! puzzlebox: a multi-language harness for daily puzzle solutions
//! Builds and runs solver processes, parses their structured answers, and
//! checks them against fixture files.
//!
//! # Architecture
//!
//! ## Configuration ([`config`])
//! - [`config::types`]: Error taxonomy, part selector, shared closed enums
//! - [`config::manifest`]: Project manifest and launcher wrapping
//! - [`config::layout`]: Directory layout of puzzle data and solutions
//!
//! ## Process Orchestration ([`core`])
//! - [`core::supervisor`]: Build, spawn, readiness loop, post-exit drain
//! - [`core::watchdog`]: Grace-window cancellation token
//! - [`core::types`]: Command specs, resolved backends, parsed results
//!
//! ## Language Backends ([`judge`])
//! - [`judge::adapter`]: The `LanguageBackend` contract
//! - [`judge::registry`]: Static registry with alias normalisation
//! - [`judge::languages`]: Python, Go, C++ and Rust backends
//!
//! ## Fixtures ([`fixtures`])
//! - [`fixtures::collector`]: Fixture discovery and expected answers
//!
//! ## Test Execution ([`exec`]) and Verdicts ([`verdict`])
//! - [`exec::executor`]: Per-backend, per-fixture test runner
//! - [`verdict::verdict`]: Sub-test verdicts and aggregate report
//! - [`verdict::report`]: Reporter trait and console output
//!
//! ## Utilities ([`utils`])
//! - [`utils::output`]: Line splitting, result parsing, bounded output tail

// Configuration
pub mod config;

// Process orchestration core
pub mod core;

// Language backends (build/run command templates)
pub mod judge;

// Fixture discovery
pub mod fixtures;

// Test execution
pub mod exec;

// Verdicts & reporting
pub mod verdict;

// Utilities
pub mod utils;

// CLI entrypoint wiring for the puzzlebox binary.
pub mod cli;

// Re-export commonly used types for convenience
pub use config::types::*;
pub use crate::core::supervisor::Orchestrator;
