/// Sub-test verdicts and the aggregate test report.
/// Verdicts are pure data: the runner derives them, reporters only render.
use crate::config::types::Part;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one `(fixture index, part)` evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubTestVerdict {
    Passed,
    WrongAnswer { expected: String, actual: String },
    /// Fixture validation or invocation failure.
    Errored { message: String },
}

impl SubTestVerdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, SubTestVerdict::Passed)
    }

    /// Short status label for console output.
    pub fn label(&self) -> &'static str {
        match self {
            SubTestVerdict::Passed => "PASSED",
            SubTestVerdict::WrongAnswer { .. } => "FAILED",
            SubTestVerdict::Errored { .. } => "ERROR",
        }
    }

    /// Compare an answer against the expected one. Exact string equality.
    pub fn judge(expected: &str, actual: &str) -> Self {
        if expected == actual {
            SubTestVerdict::Passed
        } else {
            SubTestVerdict::WrongAnswer {
                expected: expected.to_string(),
                actual: actual.to_string(),
            }
        }
    }
}

/// One named sub-result keyed by `(index, part)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTestResult {
    pub index: u64,
    pub part: Part,
    pub verdict: SubTestVerdict,
    pub duration_ms: u64,
}

impl SubTestResult {
    pub fn name(&self) -> String {
        format!("test_{}_p{}", self.index, self.part)
    }
}

impl fmt::Display for SubTestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "index={} part={}", self.index, self.part)
    }
}

/// Results for one backend. `error` is set when the backend could not be
/// resolved or built; no sub-tests run in that case.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendReport {
    pub backend_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub results: Vec<SubTestResult>,
}

impl BackendReport {
    pub fn new(backend_id: impl Into<String>) -> Self {
        Self {
            backend_id: backend_id.into(),
            error: None,
            results: Vec::new(),
        }
    }

    pub fn aborted(backend_id: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::new(backend_id)
        }
    }

    pub fn summary(&self) -> TestSummary {
        TestSummary::from_results(&self.results)
    }
}

/// Sub-test counts. The enclosing aggregate run is never counted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSummary {
    pub evaluated: usize,
    pub passed: usize,
    pub failed: usize,
}

impl TestSummary {
    pub fn from_results(results: &[SubTestResult]) -> Self {
        let evaluated = results.len();
        let passed = results.iter().filter(|r| r.verdict.is_pass()).count();
        Self {
            evaluated,
            passed,
            failed: evaluated - passed,
        }
    }

    fn add(&mut self, other: TestSummary) {
        self.evaluated += other.evaluated;
        self.passed += other.passed;
        self.failed += other.failed;
    }
}

impl fmt::Display for TestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sub-test(s) evaluated, {} passed, {} failed",
            self.evaluated, self.passed, self.failed
        )
    }
}

/// Aggregate report across backends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestReport {
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub backends: Vec<BackendReport>,
    pub summary: TestSummary,
}

impl TestReport {
    pub fn new(started_at: DateTime<Utc>, duration_ms: u64, backends: Vec<BackendReport>) -> Self {
        let mut summary = TestSummary::default();
        for backend in &backends {
            summary.add(backend.summary());
        }
        Self {
            started_at,
            duration_ms,
            backends,
            summary,
        }
    }

    /// True when every evaluated sub-test passed and no backend aborted.
    pub fn is_success(&self) -> bool {
        self.summary.failed == 0 && self.backends.iter().all(|b| b.error.is_none())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(index: u64, part: Part, verdict: SubTestVerdict) -> SubTestResult {
        SubTestResult {
            index,
            part,
            verdict,
            duration_ms: 0,
        }
    }

    #[test]
    fn test_judge_is_exact() {
        assert_eq!(SubTestVerdict::judge("7", "7"), SubTestVerdict::Passed);
        assert_eq!(
            SubTestVerdict::judge("7", "07"),
            SubTestVerdict::WrongAnswer {
                expected: "7".to_string(),
                actual: "07".to_string()
            }
        );
    }

    #[test]
    fn test_summary_counts_only_sub_tests() {
        let mut ok = BackendReport::new("python");
        ok.results.push(result(1, Part::One, SubTestVerdict::Passed));
        ok.results.push(result(
            1,
            Part::Two,
            SubTestVerdict::Errored {
                message: "boom".to_string(),
            },
        ));
        let aborted = BackendReport::aborted("cpp", "build failed");

        let report = TestReport::new(Utc::now(), 5, vec![ok, aborted]);
        assert_eq!(
            report.summary,
            TestSummary {
                evaluated: 2,
                passed: 1,
                failed: 1
            }
        );
        assert!(!report.is_success());
    }

    #[test]
    fn test_aborted_backend_fails_report_without_sub_tests() {
        let report = TestReport::new(
            Utc::now(),
            0,
            vec![BackendReport::aborted("fortran", "unknown language backend: fortran")],
        );
        assert_eq!(report.summary.evaluated, 0);
        assert!(!report.is_success());
    }

    #[test]
    fn test_json_shape() {
        let mut backend = BackendReport::new("go");
        backend.results.push(result(
            2,
            Part::One,
            SubTestVerdict::WrongAnswer {
                expected: "7".to_string(),
                actual: "8".to_string(),
            },
        ));
        let report = TestReport::new(Utc::now(), 1, vec![backend]);
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        let sub = &value["backends"][0]["results"][0];
        assert_eq!(sub["part"], "1");
        assert_eq!(sub["verdict"]["status"], "wrong_answer");
        assert_eq!(sub["verdict"]["actual"], "8");
        assert!(value["backends"][0].get("error").is_none());
        assert_eq!(value["summary"]["failed"], 1);
    }
}
