use std::path::{Path, PathBuf};

/// Language backend contract: build/run command templates for one language.
///
/// Argument lists returned here are language-level only; the launcher prefix
/// and the invocation arguments (`-i`, `-p`) are added by the caller.
pub trait LanguageBackend: Send + Sync {
    fn id(&self) -> &'static str;

    /// Binary probed by `check-deps`.
    fn toolchain(&self) -> &'static str;

    /// Entrypoint path relative to the daily solution root.
    fn entrypoint_name(&self) -> &'static str;

    fn working_dir(&self, language_root: &Path, _entrypoint: &Path) -> PathBuf {
        language_root.to_path_buf()
    }

    fn environment(&self, _language_root: &Path) -> Vec<(String, String)> {
        Vec::new()
    }

    /// `None` when the run command needs no prior build.
    fn build_command(&self, _language_root: &Path, _entrypoint: &Path) -> Option<Vec<String>> {
        None
    }

    fn run_command(&self, entrypoint: &Path) -> Vec<String>;
}
