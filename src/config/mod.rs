//! Project configuration (`modsync.toml`)
//!
//! The configuration file is optional. Every field has a default, so a
//! repository without `modsync.toml` behaves exactly like one with an empty file.
//!
//! # Resolution Order
//!
//! 1. `--config <path>` on the command line
//! 2. `MODSYNC_CONFIG` environment variable
//! 3. `<repository root>/modsync.toml`
//! 4. Built-in defaults
//!
//! An explicitly named file (1 or 2) that does not exist is an error; a missing
//! default file (3) is not.
//!
//! # Example
//!
//! ```toml
//! [layout]
//! modules_dir = "modules"
//! enablers_dir = "enablers"
//! dist_dir = "dist"
//!
//! [git]
//! timeout_secs = 300
//!
//! [tasks]
//! file = ".tasks.ps1"
//! program = "pwsh"
//! args = ["-NoProfile", "-File", "{file}", "{task}"]
//! timeout_secs = 600
//! ```

use crate::constants::{
    CALLBACK_TIMEOUT, CONFIG_ENV_VAR, CONFIG_FILE, DEFAULT_DIST_DIR, DEFAULT_ENABLERS_DIR,
    DEFAULT_MODULES_DIR, DEFAULT_TASK_FILE, DEFAULT_TASK_PROGRAM, GIT_CLONE_TIMEOUT,
};
use crate::core::{ArtifactKind, ModsyncError};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Top-level project configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Where modules, enablers and archives live
    pub layout: Layout,
    /// Remote fetch settings
    pub git: GitConfig,
    /// Enabler callback runner
    pub tasks: TaskConfig,
}

/// Directory layout, relative to the repository root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Layout {
    /// Directory holding `<name>/module.manifest.json`
    pub modules_dir: String,
    /// Directory holding `<name>/enabler.manifest.json`
    pub enablers_dir: String,
    /// Directory holding `<name>/<name>.<version>.zip`
    pub dist_dir: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            modules_dir: DEFAULT_MODULES_DIR.to_string(),
            enablers_dir: DEFAULT_ENABLERS_DIR.to_string(),
            dist_dir: DEFAULT_DIST_DIR.to_string(),
        }
    }
}

impl Layout {
    /// Repository-relative directory of an artifact, e.g. `modules/sample`.
    #[must_use]
    pub fn artifact_dir(&self, kind: ArtifactKind, name: &str) -> String {
        let base = match kind {
            ArtifactKind::Module => &self.modules_dir,
            ArtifactKind::Enabler => &self.enablers_dir,
        };
        format!("{}/{name}", base.trim_end_matches('/'))
    }

    /// Repository-relative manifest path, e.g. `modules/sample/module.manifest.json`.
    #[must_use]
    pub fn manifest_path(&self, kind: ArtifactKind, name: &str) -> String {
        format!("{}/{}", self.artifact_dir(kind, name), kind.manifest_file_name())
    }

    /// Repository-relative dist directory of an artifact, e.g. `dist/sample`.
    #[must_use]
    pub fn dist_dir(&self, name: &str) -> String {
        format!("{}/{name}", self.dist_dir.trim_end_matches('/'))
    }

    /// Repository-relative directory holding every artifact of `kind`.
    #[must_use]
    pub fn kind_dir(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::Module => &self.modules_dir,
            ArtifactKind::Enabler => &self.enablers_dir,
        }
    }
}

/// Remote fetch settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Clone timeout in seconds; 0 disables the timeout
    pub timeout_secs: u64,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            timeout_secs: GIT_CLONE_TIMEOUT.as_secs(),
        }
    }
}

impl GitConfig {
    /// The clone timeout, or `None` when disabled.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        timeout_from_secs(self.timeout_secs)
    }
}

/// How enabler lifecycle callbacks are executed.
///
/// `args` are passed to `program` after substituting `{file}` with the task
/// file path and `{task}` with the callback name (`install`, `upgrade`, `remove`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaskConfig {
    /// Task file name inside the enabler directory
    pub file: String,
    /// Program that runs the task file
    pub program: String,
    /// Argument template
    pub args: Vec<String>,
    /// Callback timeout in seconds; 0 disables the timeout
    pub timeout_secs: u64,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            file: DEFAULT_TASK_FILE.to_string(),
            program: DEFAULT_TASK_PROGRAM.to_string(),
            args: ["-NoProfile", "-File", "{file}", "{task}"].map(String::from).to_vec(),
            timeout_secs: CALLBACK_TIMEOUT.as_secs(),
        }
    }
}

impl TaskConfig {
    /// The callback timeout, or `None` when disabled.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        timeout_from_secs(self.timeout_secs)
    }

    /// Expand the argument template for one invocation.
    #[must_use]
    pub fn render_args(&self, file: &Path, task: &str) -> Vec<String> {
        let file = file.display().to_string();
        self.args.iter().map(|arg| arg.replace("{file}", &file).replace("{task}", task)).collect()
    }
}

const fn timeout_from_secs(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}

impl ProjectConfig {
    /// Load configuration for the repository at `root`.
    ///
    /// `explicit` is the `--config` flag; when absent, `MODSYNC_CONFIG` is consulted,
    /// then `<root>/modsync.toml`.
    pub async fn load_with_optional(root: &Path, explicit: Option<PathBuf>) -> Result<Self> {
        let explicit = explicit.or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ModsyncError::ConfigError {
                    message: format!("Configuration file {} does not exist", path.display()),
                }
                .into());
            }
            return Self::load_from(&path).await;
        }

        let default_path = root.join(CONFIG_FILE);
        if default_path.exists() {
            Self::load_from(&default_path).await
        } else {
            tracing::debug!("No {} at {}, using defaults", CONFIG_FILE, root.display());
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content).map_err(|e| ModsyncError::ConfigError {
            message: format!("{}: {e}", path.display()),
        })?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
