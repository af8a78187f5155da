use crate::judge::adapter::LanguageBackend;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct PythonBackend;

impl LanguageBackend for PythonBackend {
    fn id(&self) -> &'static str {
        "python"
    }

    fn toolchain(&self) -> &'static str {
        "python"
    }

    fn entrypoint_name(&self) -> &'static str {
        "main.py"
    }

    fn environment(&self, language_root: &Path) -> Vec<(String, String)> {
        // Shared helpers live next to the events tree.
        vec![(
            "PYTHONPATH".to_string(),
            language_root.to_string_lossy().to_string(),
        )]
    }

    fn run_command(&self, entrypoint: &Path) -> Vec<String> {
        vec![
            "python".to_string(),
            "-OO".to_string(),
            entrypoint.to_string_lossy().to_string(),
        ]
    }
}
