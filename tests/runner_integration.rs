//! End-to-end tests: fixture collection, orchestration, and verdicts.

use puzzlebox::config::layout::Layout;
use puzzlebox::config::manifest::ProjectConfig;
use puzzlebox::config::types::{HarnessError, Part, Result};
use puzzlebox::core::supervisor::Orchestrator;
use puzzlebox::core::types::{CommandSpec, OrchestratorConfig, ResolvedBackend};
use puzzlebox::exec::TestRunner;
use puzzlebox::fixtures;
use puzzlebox::verdict::{SilentReporter, SubTestVerdict, TestReport, TestSummary};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn printing(answer: &str) -> ResolvedBackend {
    ResolvedBackend {
        backend_id: "sh".to_string(),
        entrypoint: PathBuf::from("solver.sh"),
        build: None,
        run: CommandSpec::new(
            vec![
                "sh".to_string(),
                "-c".to_string(),
                format!("echo 'reading input'; echo 'Part 1 solution: {answer}'"),
                "sh".to_string(),
            ],
            ".",
        ),
    }
}

fn write_fixture(dir: &Path) {
    fs::write(dir.join("test_p1_1_in.txt"), "3\n4").unwrap();
    fs::write(dir.join("test_p1_1_out.txt"), "7").unwrap();
}

fn run(dir: &Path, backends: Vec<(String, Result<ResolvedBackend>)>) -> TestReport {
    let fixtures = fixtures::collect(dir).unwrap();
    let layout = Layout::new(dir);
    let project = ProjectConfig::default();
    let orchestrator = Orchestrator::new(OrchestratorConfig {
        grace_window: Duration::from_millis(500),
        echo: false,
        ..OrchestratorConfig::default()
    });
    let runner = TestRunner::new(&layout, &project, orchestrator);
    runner.run_resolved(backends, &fixtures, Some(Part::One), &mut SilentReporter)
}

#[test]
fn test_matching_answer_passes() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let report = run(dir.path(), vec![("sh".to_string(), Ok(printing("7")))]);

    assert_eq!(
        report.summary,
        TestSummary {
            evaluated: 1,
            passed: 1,
            failed: 0
        }
    );
    assert!(report.is_success());
    let sub = &report.backends[0].results[0];
    assert_eq!((sub.index, sub.part), (1, Part::One));
}

#[test]
fn test_wrong_answer_reports_expected_and_actual() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let report = run(dir.path(), vec![("sh".to_string(), Ok(printing("8")))]);

    assert_eq!(report.summary.evaluated, 1);
    assert_eq!(report.summary.passed, 0);
    assert_eq!(
        report.backends[0].results[0].verdict,
        SubTestVerdict::WrongAnswer {
            expected: "7".to_string(),
            actual: "8".to_string()
        }
    );
    assert!(!report.is_success());
}

#[test]
fn test_build_failure_aborts_only_that_backend() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let mut broken = printing("7");
    broken.backend_id = "broken".to_string();
    broken.build = Some(CommandSpec::new(
        vec!["sh".to_string(), "-c".to_string(), "exit 1".to_string()],
        ".",
    ));

    let report = run(
        dir.path(),
        vec![
            ("broken".to_string(), Ok(broken)),
            (
                "cobol".to_string(),
                Err(HarnessError::UnknownBackend("cobol".to_string())),
            ),
            ("sh".to_string(), Ok(printing("7"))),
        ],
    );

    assert!(report.backends[0]
        .error
        .as_deref()
        .is_some_and(|e| e.starts_with("build failed")));
    assert!(report.backends[0].results.is_empty());
    assert!(report.backends[1].error.is_some());
    assert_eq!(report.backends[2].summary().passed, 1);
    assert_eq!(report.summary.evaluated, 1);
    assert!(!report.is_success());
}

#[test]
fn test_failing_solver_is_an_errored_sub_test() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    fs::write(dir.path().join("test_p1_2_in.txt"), "1").unwrap();
    fs::write(dir.path().join("test_p1_2_out.txt"), "7\n").unwrap();

    let crashing = ResolvedBackend {
        run: CommandSpec::new(
            vec![
                "sh".to_string(),
                "-c".to_string(),
                "case \"$2\" in *_2_in.txt) echo crash >&2; exit 2;; esac; echo 'Part 1 solution: 7'"
                    .to_string(),
                "sh".to_string(),
            ],
            ".",
        ),
        ..printing("7")
    };

    let report = run(dir.path(), vec![("sh".to_string(), Ok(crashing))]);
    let results = &report.backends[0].results;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].verdict, SubTestVerdict::Passed);
    match &results[1].verdict {
        SubTestVerdict::Errored { message } => {
            assert!(message.contains("exit code 2"));
            assert!(message.contains("crash"));
        }
        other => panic!("unexpected verdict: {other:?}"),
    }
}
