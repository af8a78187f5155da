use crate::config::layout::Layout;
use crate::config::manifest::ProjectConfig;
use crate::config::types::{HarnessError, Part, Result};
use crate::core::supervisor::Orchestrator;
use crate::core::types::ResolvedBackend;
use crate::fixtures::Fixture;
use crate::judge;
use crate::verdict::{BackendReport, SubTestResult, SubTestVerdict, TestReport, TestReporter};
/// Fixture-driven test runner
use chrono::Utc;
use std::path::PathBuf;
use std::time::Instant;

/// A backend id plus the entrypoint to test it against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestTarget {
    pub backend_id: String,
    pub entrypoint: PathBuf,
}

impl TestTarget {
    pub fn new(backend_id: impl Into<String>, entrypoint: impl Into<PathBuf>) -> Self {
        Self {
            backend_id: backend_id.into(),
            entrypoint: entrypoint.into(),
        }
    }
}

/// Runs every fixture against every backend and records one sub-result per
/// `(index, part)`.
///
/// Sub-test failures are isolated; only resolution or build failures abort a
/// backend, and never its siblings.
pub struct TestRunner<'a> {
    layout: &'a Layout,
    project: &'a ProjectConfig,
    orchestrator: Orchestrator,
}

impl<'a> TestRunner<'a> {
    pub fn new(layout: &'a Layout, project: &'a ProjectConfig, orchestrator: Orchestrator) -> Self {
        Self {
            layout,
            project,
            orchestrator,
        }
    }

    /// Resolve each target and test it against `fixtures`.
    pub fn run_tests(
        &self,
        targets: &[TestTarget],
        fixtures: &[Fixture],
        part: Option<Part>,
        reporter: &mut dyn TestReporter,
    ) -> TestReport {
        let resolved = targets.iter().map(|target| {
            let backend = judge::resolve(
                &target.backend_id,
                &target.entrypoint,
                self.layout,
                self.project,
            );
            (target.backend_id.clone(), backend)
        });
        self.run_resolved(resolved, fixtures, part, reporter)
    }

    /// Test already-resolved backends. A resolution error aborts only its own
    /// backend.
    pub fn run_resolved<I>(
        &self,
        backends: I,
        fixtures: &[Fixture],
        part: Option<Part>,
        reporter: &mut dyn TestReporter,
    ) -> TestReport
    where
        I: IntoIterator<Item = (String, Result<ResolvedBackend>)>,
    {
        let started_at = Utc::now();
        let started = Instant::now();

        let selected: Vec<&Fixture> = fixtures
            .iter()
            .filter(|fixture| part.map_or(true, |p| p == fixture.part))
            .collect();

        let reports = backends
            .into_iter()
            .map(|(backend_id, backend)| match backend {
                Ok(backend) => self.run_backend(&backend, &selected, reporter),
                Err(e) => {
                    log::error!("Cannot resolve backend {}: {}", backend_id, e);
                    reporter.on_backend_aborted(&backend_id, &e.to_string());
                    BackendReport::aborted(backend_id, e)
                }
            })
            .collect();

        let report = TestReport::new(started_at, started.elapsed().as_millis() as u64, reports);
        log::info!("{}", report.summary);
        reporter.on_run_complete(&report);
        report
    }

    fn run_backend(
        &self,
        backend: &ResolvedBackend,
        fixtures: &[&Fixture],
        reporter: &mut dyn TestReporter,
    ) -> BackendReport {
        let backend_id = backend.backend_id.as_str();
        reporter.on_backend_start(backend_id, fixtures.len());

        if let Err(e) = self.orchestrator.build(backend) {
            log::error!("Build failed for {}", backend_id);
            reporter.on_backend_aborted(backend_id, &e.to_string());
            return BackendReport::aborted(backend_id, e);
        }

        let mut report = BackendReport::new(backend_id);
        for fixture in fixtures {
            let started = Instant::now();
            let verdict = match self.evaluate(backend, fixture) {
                Ok(verdict) => verdict,
                Err(e) => SubTestVerdict::Errored {
                    message: e.to_string(),
                },
            };
            let result = SubTestResult {
                index: fixture.index,
                part: fixture.part,
                verdict,
                duration_ms: started.elapsed().as_millis() as u64,
            };
            log::debug!("{} {}: {}", backend_id, result, result.verdict.label());
            reporter.on_sub_test_complete(backend_id, &result);
            report.results.push(result);
        }
        report
    }

    fn evaluate(&self, backend: &ResolvedBackend, fixture: &Fixture) -> Result<SubTestVerdict> {
        let expected = fixture.expected_answer()?;
        let (input, _) = fixture.validate()?;

        let results = self
            .orchestrator
            .execute(backend, input, Some(fixture.part))?;
        let actual = results
            .into_iter()
            .find(|result| result.part == fixture.part)
            .ok_or_else(|| HarnessError::MissingSolutionOutput {
                command: backend.run_command_for(input, Some(fixture.part)).to_string(),
                missing: vec![fixture.part],
            })?;

        Ok(SubTestVerdict::judge(&expected, &actual.answer))
    }
}
