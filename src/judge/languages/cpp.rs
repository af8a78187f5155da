use crate::judge::adapter::LanguageBackend;
use std::path::Path;

/// Compiled binary name, relative to the language root.
pub const EXECUTABLE_NAME: &str = "a.out";

#[derive(Debug, Clone, Default)]
pub struct CppBackend;

/// Read `compile_flags.txt` from the language root, one flag per line.
///
/// Relative include directories (`-I./elf`) are made absolute so the flags
/// stay valid regardless of the compiler's working directory.
fn compile_flags(language_root: &Path) -> Vec<String> {
    let path = language_root.join("compile_flags.txt");
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            log::warn!("Ignoring unreadable {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|flag| match flag.strip_prefix("-I") {
            Some(include) if include.starts_with('.') => {
                let absolute = language_root.join(include);
                let absolute = absolute.canonicalize().unwrap_or(absolute);
                format!("-I{}", absolute.to_string_lossy())
            }
            _ => flag.to_string(),
        })
        .collect()
}

impl LanguageBackend for CppBackend {
    fn id(&self) -> &'static str {
        "cpp"
    }

    fn toolchain(&self) -> &'static str {
        "clang++"
    }

    fn entrypoint_name(&self) -> &'static str {
        "main.cpp"
    }

    fn build_command(&self, language_root: &Path, entrypoint: &Path) -> Option<Vec<String>> {
        let mut argv = vec!["clang++".to_string()];
        argv.extend(compile_flags(language_root));
        argv.push("-o".to_string());
        argv.push(EXECUTABLE_NAME.to_string());
        argv.push(entrypoint.to_string_lossy().to_string());
        Some(argv)
    }

    fn run_command(&self, _entrypoint: &Path) -> Vec<String> {
        vec![format!("./{EXECUTABLE_NAME}")]
    }
}
