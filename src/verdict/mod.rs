//! Sub-test verdicts and reporting
//!
//! Verdicts are derived by the test runner; reporters render them.

pub mod report;
pub mod verdict;

pub use report::{ConsoleReporter, SilentReporter, TestReporter};
pub use verdict::{BackendReport, SubTestResult, SubTestVerdict, TestReport, TestSummary};
