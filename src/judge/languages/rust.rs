use crate::judge::adapter::LanguageBackend;
use std::path::{Path, PathBuf};

/// Each day is its own cargo package; `cargo run` builds and runs in one step.
#[derive(Debug, Clone, Default)]
pub struct RustBackend;

impl LanguageBackend for RustBackend {
    fn id(&self) -> &'static str {
        "rust"
    }

    fn toolchain(&self) -> &'static str {
        "cargo"
    }

    fn entrypoint_name(&self) -> &'static str {
        "src/main.rs"
    }

    fn working_dir(&self, language_root: &Path, entrypoint: &Path) -> PathBuf {
        // <crate>/src/main.rs -> <crate>
        entrypoint
            .parent()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| language_root.to_path_buf())
    }

    fn run_command(&self, _entrypoint: &Path) -> Vec<String> {
        vec![
            "cargo".to_string(),
            "run".to_string(),
            "--release".to_string(),
            "--quiet".to_string(),
            "--".to_string(),
        ]
    }
}
