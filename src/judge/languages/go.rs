use crate::judge::adapter::LanguageBackend;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct GoBackend;

impl LanguageBackend for GoBackend {
    fn id(&self) -> &'static str {
        "go"
    }

    fn toolchain(&self) -> &'static str {
        "go"
    }

    fn entrypoint_name(&self) -> &'static str {
        "main.go"
    }

    fn run_command(&self, entrypoint: &Path) -> Vec<String> {
        vec![
            "go".to_string(),
            "run".to_string(),
            entrypoint.to_string_lossy().to_string(),
        ]
    }
}
