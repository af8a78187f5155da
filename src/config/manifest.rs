/// Project manifest loading
///
/// The manifest is read once at startup. Only the `[environments]` table and an
/// optional `[puzzlebox.launcher]` table are consulted; everything else in the
/// file belongs to the package manager that owns it.
use crate::config::types::{HarnessError, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

pub const DEFAULT_MANIFEST_NAME: &str = "pixi.toml";

fn default_prefix() -> Vec<String> {
    vec!["pixi".to_string(), "-q".to_string(), "run".to_string()]
}

fn default_environment_flag() -> String {
    "-e".to_string()
}

/// Command prefix inserted ahead of every language invocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Launcher {
    #[serde(default = "default_prefix")]
    pub prefix: Vec<String>,
    #[serde(default = "default_environment_flag")]
    pub environment_flag: String,
}

impl Default for Launcher {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            environment_flag: default_environment_flag(),
        }
    }
}

impl Launcher {
    /// Launcher that runs commands as-is.
    pub fn direct() -> Self {
        Self {
            prefix: Vec::new(),
            environment_flag: String::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawManifest {
    #[serde(default)]
    environments: BTreeMap<String, toml::Value>,
    #[serde(default)]
    puzzlebox: RawToolSection,
}

#[derive(Debug, Default, Deserialize)]
struct RawToolSection {
    launcher: Option<Launcher>,
}

/// Immutable, process-wide project configuration.
///
/// Built once by the entrypoint and passed by reference into backend
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub launcher: Launcher,
    pub managed_environments: BTreeSet<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            launcher: Launcher::direct(),
            managed_environments: BTreeSet::new(),
        }
    }
}

impl ProjectConfig {
    pub fn new(launcher: Launcher, managed_environments: impl IntoIterator<Item = String>) -> Self {
        Self {
            launcher,
            managed_environments: managed_environments.into_iter().collect(),
        }
    }

    /// Load from a manifest path. A missing file yields direct execution.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!(
                "No project manifest at {}; running commands directly",
                path.display()
            );
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw).map_err(|e| match e {
            HarnessError::Manifest(msg) => {
                HarnessError::Manifest(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        log::info!(
            "Loaded project manifest {} (managed environments: {:?})",
            path.display(),
            config.managed_environments
        );
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let manifest: RawManifest =
            toml::from_str(raw).map_err(|e| HarnessError::Manifest(e.to_string()))?;
        Ok(Self {
            launcher: manifest.puzzlebox.launcher.unwrap_or_default(),
            managed_environments: manifest.environments.into_keys().collect(),
        })
    }

    pub fn is_managed(&self, backend_id: &str) -> bool {
        self.managed_environments.contains(backend_id)
    }

    /// Prepend the launcher prefix (and environment selector when the backend
    /// owns a managed environment) to a language-level argv.
    pub fn wrap(&self, backend_id: &str, argv: Vec<String>) -> Vec<String> {
        if self.launcher.prefix.is_empty() {
            return argv;
        }

        let mut wrapped = self.launcher.prefix.clone();
        if self.is_managed(backend_id) && !self.launcher.environment_flag.is_empty() {
            wrapped.push(self.launcher.environment_flag.clone());
            wrapped.push(backend_id.to_string());
        }
        wrapped.extend(argv);
        wrapped
    }
}
