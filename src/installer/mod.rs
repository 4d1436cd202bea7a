//! The reconciliation engine: module and enabler lifecycle operations.
//!
//! An [`Installer`] owns the three capabilities every operation needs:
//! - a [`Workspace`] over the repository root (the only place files change)
//! - a [`Fetcher`] that turns a remote reference into a staging checkout
//! - a [`Callback`] that runs an enabler's lifecycle task
//!
//! # Operations
//!
//! | Operation | Source | Deletes | Copies |
//! |-----------|--------|---------|--------|
//! | [`pack`](Installer::pack) | workspace | legacy archives | `dist/<name>/<name>.<version>.zip` |
//! | [`unpack`](Installer::unpack) | archive in `dist/` | none | archive include set |
//! | [`clone`](Installer::clone_module) | git tag | none | checkout include set |
//! | [`update`](Installer::update_module) | git tag | installed include set | checkout include set |
//! | [`remove`](Installer::remove_module) | none | installed include set | none |
//!
//! The enabler operations follow clone/update/remove and add a callback.
//!
//! # Ordering
//!
//! Each operation locates its manifest, resolves the file set and builds a
//! complete [`Plan`] before the first mutation. Staging roots are dropped, and
//! therefore deleted, on every exit path.

mod archive_ops;
mod enabler;
mod inspect;
pub mod plan;
mod remote;
pub mod report;
mod sources;


pub use inspect::{InstalledArtifact, ValidationReport};
pub use plan::{CopyStep, Plan};
pub use report::{ArchiveSummary, Operation, OperationReport};

use crate::config::{Layout, ProjectConfig};
use crate::core::{ArtifactKind, ModsyncError};
use crate::hooks::{Callback, TaskRunner};
use crate::manifest::Manifest;
use crate::source::{Fetcher, GitFetcher};
use crate::workspace::{FsWorkspace, Workspace};
use anyhow::Result;
use std::path::PathBuf;

/// Arguments shared by clone, update, install-enabler and upgrade-enabler.
#[derive(Debug, Clone, Default)]
pub struct RemoteRequest {
    pub name: String,
    pub version: String,
    /// Repository URL; overrides `source.git` of an installed manifest
    pub git: Option<String>,
    /// Tag prefix; overrides `source.tagPrefix` of an installed manifest
    pub tag_prefix: Option<String>,
    /// Compute and report the plan without applying it
    pub dry_run: bool,
}

impl RemoteRequest {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_git(mut self, url: impl Into<String>) -> Self {
        self.git = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_tag_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.tag_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Lifecycle engine over one repository.
pub struct Installer<W = FsWorkspace, F = GitFetcher, C = TaskRunner> {
    workspace: W,
    layout: Layout,
    fetcher: F,
    callback: C,
}

impl Installer {
    /// The production engine: filesystem workspace, git fetcher, task runner.
    pub fn from_config(root: impl Into<PathBuf>, config: &ProjectConfig) -> Self {
        Self::new(
            FsWorkspace::new(root),
            config.layout.clone(),
            GitFetcher::new(config.git.timeout()),
            TaskRunner::new(config.tasks.clone()),
        )
    }
}

impl<W: Workspace, F: Fetcher, C: Callback> Installer<W, F, C> {
    pub const fn new(workspace: W, layout: Layout, fetcher: F, callback: C) -> Self {
        Self {
            workspace,
            layout,
            fetcher,
            callback,
        }
    }

    #[must_use]
    pub const fn workspace(&self) -> &W {
        &self.workspace
    }

    #[must_use]
    pub const fn callback(&self) -> &C {
        &self.callback
    }

    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Load and check the installed manifest of `kind` `name`.
    fn load_local(&self, kind: ArtifactKind, name: &str) -> Result<(Manifest, String)> {
        check_name(name)?;
        let relative = self.layout.manifest_path(kind, name);
        if !self.workspace.exists(&relative) {
            return Err(ModsyncError::LocalManifestNotFound {
                kind: kind.to_string(),
                path: relative,
            }
            .into());
        }

        let path = self.workspace.absolute(&relative);
        let manifest = Manifest::load(&path)?;
        manifest.validate_location(&path)?;
        Ok((manifest, relative))
    }

    /// Warn when a manifest's file set does not carry the manifest itself.
    fn check_own_path(&self, kind: ArtifactKind, name: &str, files: &[String]) {
        let own = self.layout.manifest_path(kind, name);
        if !files.iter().any(|f| *f == own) {
            tracing::warn!("{kind} '{name}' does not include its own manifest {own}");
        }
    }
}

/// Reject names that cannot be a single lowercase directory component.
fn check_name(name: &str) -> Result<(), ModsyncError> {
    let problem = if name.trim().is_empty() {
        Some("is not a valid artifact name")
    } else if name.trim() != name {
        Some("has leading or trailing whitespace")
    } else if name.chars().any(char::is_uppercase) {
        Some("must be lowercase")
    } else if name.contains(['/', '\\']) || name == "." || name == ".." {
        Some("is not a valid artifact name")
    } else {
        None
    };
    match problem {
        None => Ok(()),
        Some(problem) => Err(ModsyncError::ManifestValidationError {
            field: "name".to_string(),
            reason: format!("'{name}' {problem}"),
        }),
    }
}

/// Report `origin` instead of a staging directory when no manifest matched.
fn searched_in(error: ModsyncError, origin: impl Into<String>) -> ModsyncError {
    match error {
        ModsyncError::ManifestNotFound {
            name,
            version,
            ..
        } => ModsyncError::ManifestNotFound {
            name,
            version,
            searched: origin.into(),
        },
        other => other,
    }
}
