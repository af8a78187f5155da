//! Language backends.
//!
//! Core orchestration stays language-agnostic. Backends define build/run
//! command templates, working directory, and environment for each language;
//! [`resolve`] turns one of them into concrete commands for an entrypoint.

pub mod adapter;
pub mod languages;
pub mod registry;

use crate::config::layout::{Layout, PuzzleId};
use crate::config::manifest::ProjectConfig;
use crate::config::types::Result;
use crate::core::types::{CommandSpec, ResolvedBackend};
use crate::judge::adapter::LanguageBackend;
use std::path::{Path, PathBuf};

pub use registry::{all_backends, backend_for};

/// Look up `backend_id` and template its commands for `entrypoint`.
///
/// Pure apart from reading optional per-language flag files; a missing
/// entrypoint surfaces later as a spawn or build failure.
pub fn resolve(
    backend_id: &str,
    entrypoint: &Path,
    layout: &Layout,
    project: &ProjectConfig,
) -> Result<ResolvedBackend> {
    let backend = backend_for(backend_id)?;
    Ok(resolve_with(backend, entrypoint, layout, project))
}

pub fn resolve_with(
    backend: &dyn LanguageBackend,
    entrypoint: &Path,
    layout: &Layout,
    project: &ProjectConfig,
) -> ResolvedBackend {
    let id = backend.id();
    let language_root = layout.language_root(id);
    let cwd = backend.working_dir(&language_root, entrypoint);
    let environment = backend.environment(&language_root);

    let template = |argv: Vec<String>| CommandSpec {
        argv: project.wrap(id, argv),
        cwd: cwd.clone(),
        environment: environment.clone(),
    };

    let build = backend
        .build_command(&language_root, entrypoint)
        .map(&template);
    let run = template(backend.run_command(entrypoint));

    ResolvedBackend {
        backend_id: id.to_string(),
        entrypoint: entrypoint.to_path_buf(),
        build,
        run,
    }
}

/// Entrypoint of `backend_id`'s solution for one puzzle.
pub fn daily_entrypoint(backend_id: &str, layout: &Layout, puzzle: PuzzleId) -> Result<PathBuf> {
    let backend = backend_for(backend_id)?;
    Ok(layout
        .daily_solution_root(backend.id(), puzzle)
        .join(backend.entrypoint_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::manifest::Launcher;
    use crate::config::types::HarnessError;

    fn project() -> ProjectConfig {
        ProjectConfig::new(Launcher::default(), vec!["cpp".to_string()])
    }

    #[test]
    fn test_resolve_compiled_backend() {
        let layout = Layout::new("/nonexistent/advent");
        let entry = PathBuf::from("/nonexistent/advent/solutions/cpp/events/y2023/d06/main.cpp");
        let resolved = resolve("cpp", &entry, &layout, &project()).unwrap();

        let build = resolved.build.expect("cpp has a build step");
        assert_eq!(
            &build.argv[..6],
            &["pixi", "-q", "run", "-e", "cpp", "clang++"].map(String::from)
        );
        assert_eq!(
            resolved.run.argv,
            vec!["pixi", "-q", "run", "-e", "cpp", "./a.out"]
        );
        assert_eq!(resolved.run.cwd, PathBuf::from("/nonexistent/advent/solutions/cpp"));
    }

    #[test]
    fn test_resolve_interpreted_backend_without_environment() {
        let layout = Layout::new("/nonexistent/advent");
        let entry = PathBuf::from("/nonexistent/advent/solutions/python/events/y2024/d05/main.py");
        let resolved = resolve("py", &entry, &layout, &project()).unwrap();

        assert_eq!(resolved.backend_id, "python");
        assert!(resolved.build.is_none());
        assert_eq!(
            resolved.run.argv,
            vec!["pixi", "-q", "run", "python", "-OO", entry.to_str().unwrap()]
        );
        assert_eq!(
            resolved.run.environment,
            vec![(
                "PYTHONPATH".to_string(),
                "/nonexistent/advent/solutions/python".to_string()
            )]
        );
    }

    #[test]
    fn test_resolve_unknown_backend() {
        let layout = Layout::new(".");
        let err = resolve("fortran", Path::new("main.f90"), &layout, &project()).unwrap_err();
        assert!(matches!(err, HarnessError::UnknownBackend(_)));
    }

    #[test]
    fn test_daily_entrypoint() {
        let layout = Layout::new("/a");
        let puzzle = PuzzleId::new(2025, 3);
        assert_eq!(
            daily_entrypoint("rust", &layout, puzzle).unwrap(),
            PathBuf::from("/a/solutions/rust/events/y2025/d03/src/main.rs")
        );
        assert_eq!(
            daily_entrypoint("golang", &layout, puzzle).unwrap(),
            PathBuf::from("/a/solutions/go/events/y2025/d03/main.go")
        );
    }
}
