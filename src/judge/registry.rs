use crate::config::types::{HarnessError, Result};
use crate::judge::adapter::LanguageBackend;
use crate::judge::languages::{
    cpp::CppBackend, go::GoBackend, python::PythonBackend, rust::RustBackend,
};

static BACKENDS: [&dyn LanguageBackend; 4] =
    [&PythonBackend, &GoBackend, &CppBackend, &RustBackend];

/// Map common aliases onto registry identifiers.
pub fn normalize_id(id: &str) -> String {
    match id.trim().to_lowercase().as_str() {
        "py" | "python3" => "python".to_string(),
        "golang" => "go".to_string(),
        "c++" | "cxx" | "cc" => "cpp".to_string(),
        "rs" => "rust".to_string(),
        other => other.to_string(),
    }
}

pub fn backend_for(id: &str) -> Result<&'static dyn LanguageBackend> {
    let normalized = normalize_id(id);
    BACKENDS
        .iter()
        .copied()
        .find(|backend| backend.id() == normalized)
        .ok_or_else(|| HarnessError::UnknownBackend(id.to_string()))
}

pub fn all_backends() -> &'static [&'static dyn LanguageBackend] {
    &BACKENDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_with_aliases() {
        assert_eq!(backend_for("python").unwrap().id(), "python");
        assert_eq!(backend_for("py").unwrap().id(), "python");
        assert_eq!(backend_for("golang").unwrap().id(), "go");
        assert_eq!(backend_for("C++").unwrap().id(), "cpp");
        assert_eq!(backend_for("rs").unwrap().id(), "rust");
    }

    #[test]
    fn test_unknown_backend() {
        match backend_for("cobol") {
            Err(HarnessError::UnknownBackend(id)) => assert_eq!(id, "cobol"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(backend) => panic!("unexpected backend: {}", backend.id()),
        }
    }

    #[test]
    fn test_registry_ids_are_unique() {
        let mut ids: Vec<_> = all_backends().iter().map(|b| b.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), all_backends().len());
    }
}
