//! Configuration
//!
//! Project manifest, on-disk layout, and shared type definitions.

pub mod layout;
pub mod manifest;
pub mod types;
