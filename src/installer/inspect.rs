//! Read-only inspection: validating and listing installed artifacts.

use super::{Installer, check_name};
use crate::core::{ArtifactKind, ModsyncError};
use crate::hooks::Callback;
use crate::manifest::Manifest;
use crate::resolver::resolve;
use crate::source::Fetcher;
use crate::workspace::Workspace;
use anyhow::{Context, Result};
use serde::Serialize;

/// Result of validating an installed manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub kind: ArtifactKind,
    pub name: String,
    pub version: String,
    /// Root-relative manifest path
    pub manifest: String,
    pub valid: bool,
    pub errors: Vec<String>,
    /// Resolved file set, empty when invalid
    pub files: Vec<String>,
}

/// One row of `list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledArtifact {
    pub kind: ArtifactKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git: Option<String>,
    /// Root-relative manifest path
    pub manifest: String,
    /// Why the manifest could not be read, if it could not
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<W: Workspace, F: Fetcher, C: Callback> Installer<W, F, C> {
    /// Check every manifest rule for an installed artifact and resolve its files.
    ///
    /// A missing or unparseable manifest is an error; rule violations are
    /// collected into the report instead.
    pub fn validate(&self, kind: ArtifactKind, name: &str) -> Result<ValidationReport> {
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
        let root = self.workspace.root();

        let mut errors: Vec<String> = manifest
            .validation_errors(root)
            .into_iter()
            .map(|e| e.to_string())
            .collect();
        if let Err(e) = manifest.validate_location(&path) {
            errors.push(e.to_string());
        }

        let mut files = Vec::new();
        if errors.is_empty() {
            match resolve(&manifest, root) {
                Ok(set) => files = set.to_vec(),
                Err(e) => errors.push(e.to_string()),
            }
            self.check_own_path(kind, name, &files);
        }

        Ok(ValidationReport {
            kind,
            name: name.to_string(),
            version: manifest.version,
            manifest: relative,
            valid: errors.is_empty(),
            errors,
            files,
        })
    }

    /// Every module and enabler with a manifest in its layout directory, sorted by kind then name.
    pub fn list(&self) -> Result<Vec<InstalledArtifact>> {
        let mut rows = Vec::new();

        for kind in ArtifactKind::all() {
            let dir = self.layout.kind_dir(kind);
            let absolute = self.workspace.absolute(dir);
            if !absolute.is_dir() {
                continue;
            }

            let mut names = Vec::new();
            for entry in std::fs::read_dir(&absolute)
                .with_context(|| format!("Failed to read {}", absolute.display()))?
            {
                let entry = entry?;
                if entry.file_type()?.is_dir() {
                    names.push(entry.file_name().to_string_lossy().into_owned());
                }
            }
            names.sort();

            for name in names {
                let manifest = self.layout.manifest_path(kind, &name);
                if !self.workspace.exists(&manifest) {
                    continue;
                }
                let row = match Manifest::load(&self.workspace.absolute(&manifest)) {
                    Ok(parsed) => InstalledArtifact {
                        kind,
                        git: parsed.git_url().map(String::from),
                        version: Some(parsed.version),
                        name,
                        manifest,
                        error: None,
                    },
                    Err(e) => {
                        tracing::warn!("Skipping invalid manifest {manifest}: {e:#}");
                        InstalledArtifact {
                            kind,
                            name,
                            version: None,
                            git: None,
                            manifest,
                            error: Some(format!("{e:#}")),
                        }
                    }
                };
                rows.push(row);
            }
        }

        Ok(rows)
    }
}
