//! Test run reporting.
//!
//! The runner calls into a [`TestReporter`] as sub-tests complete, so output
//! formats stay separate from execution.

use crate::verdict::verdict::{SubTestResult, SubTestVerdict, TestReport};

/// Callbacks fired by the test runner.
pub trait TestReporter {
    /// Called once per backend before any of its sub-tests run.
    fn on_backend_start(&mut self, _backend_id: &str, _sub_test_count: usize) {}

    /// Called when a backend could not be resolved or built.
    fn on_backend_aborted(&mut self, backend_id: &str, error: &str);

    fn on_sub_test_complete(&mut self, backend_id: &str, result: &SubTestResult);

    fn on_run_complete(&mut self, report: &TestReport);
}

/// Default console reporter: one status line per sub-test on stderr.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    pub verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl TestReporter for ConsoleReporter {
    fn on_backend_start(&mut self, backend_id: &str, sub_test_count: usize) {
        if sub_test_count == 0 {
            eprintln!("[{backend_id}] no fixtures collected");
        } else if self.verbose {
            eprintln!("[{backend_id}] running {sub_test_count} sub-test(s)");
        }
    }

    fn on_backend_aborted(&mut self, backend_id: &str, error: &str) {
        eprintln!("[{backend_id}] ABORTED");
        eprintln!("{error}");
    }

    fn on_sub_test_complete(&mut self, backend_id: &str, result: &SubTestResult) {
        eprintln!(
            "[{backend_id}] {} ... {} ({} ms)",
            result.name(),
            result.verdict.label(),
            result.duration_ms
        );
        match &result.verdict {
            SubTestVerdict::Passed => {}
            SubTestVerdict::WrongAnswer { expected, actual } => {
                eprintln!("    {result}");
                eprintln!("    expected: {expected}");
                eprintln!("    actual:   {actual}");
            }
            SubTestVerdict::Errored { message } => {
                eprintln!("    {result}");
                for line in message.lines() {
                    eprintln!("    {line}");
                }
            }
        }
    }

    fn on_run_complete(&mut self, report: &TestReport) {
        let summary = &report.summary;
        let aborted = report.backends.iter().filter(|b| b.error.is_some()).count();

        let mut parts = vec![
            format!("{} passed", summary.passed),
            format!("{} failed", summary.failed),
        ];
        if aborted > 0 {
            parts.push(format!("{aborted} backend(s) aborted"));
        }
        eprintln!();
        eprintln!(
            "====== {} ({} evaluated) in {:.2}s ======",
            parts.join(", "),
            summary.evaluated,
            report.duration_ms as f64 / 1000.0
        );
    }
}

/// Reporter that prints nothing; used when the JSON report owns stdout.
#[derive(Debug, Default)]
pub struct SilentReporter;

impl TestReporter for SilentReporter {
    fn on_backend_aborted(&mut self, _backend_id: &str, _error: &str) {}

    fn on_sub_test_complete(&mut self, _backend_id: &str, _result: &SubTestResult) {}

    fn on_run_complete(&mut self, _report: &TestReport) {}
}
