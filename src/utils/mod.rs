//! Utilities
//!
//! Child output line handling and structured result parsing.

pub mod output;
