//! Fixture discovery.
//!
//! Fixtures live next to a day's solutions as `test_[p<part>_]<index>_<in|out>.txt`.
//! A file without a part prefix applies to both parts.

pub mod collector;

pub use collector::{collect, parse_fixture_name, Fixture, FixtureName};
