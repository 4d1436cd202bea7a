//! Manifest discovery inside checkouts and expanded archives.
//!
//! A staging root may contain any number of manifests (fixtures, other modules,
//! the artifact we want). [`locate`] walks it and returns the manifest whose name
//! and version match the request.
//!
//! Traversal is sorted by file name, so when several manifests match the result
//! is still deterministic: the first in sorted depth-first order wins and the
//! others are reported as warnings.

use crate::core::{ArtifactKind, ModsyncError};
use crate::manifest::Manifest;
use crate::utils::fs::to_relative;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A manifest found on disk, with the root it was found under.
#[derive(Debug, Clone)]
pub struct LocatedManifest {
    /// The parsed manifest
    pub manifest: Manifest,
    /// Absolute path of the manifest file
    pub path: PathBuf,
    /// Root the manifest's paths are relative to
    pub root: PathBuf,
}

impl LocatedManifest {
    /// The manifest's own path relative to its root, with forward slashes.
    #[must_use]
    pub fn relative_path(&self) -> Option<String> {
        to_relative(&self.root, &self.path)
    }
}

/// Find the manifest of `kind` under `root` whose name and version match.
///
/// Names are compared case-insensitively, versions exactly. Candidates that fail
/// to parse are skipped with a warning; a malformed unrelated manifest must not
/// block finding the right one. Version control metadata (`.git`) is not searched.
///
/// # Errors
///
/// [`ModsyncError::ManifestNotFound`] when no candidate matches.
pub fn locate(
    root: &Path,
    kind: ArtifactKind,
    name: &str,
    version: &str,
) -> Result<LocatedManifest, ModsyncError> {
    let file_name = kind.manifest_file_name();
    let mut found: Option<LocatedManifest> = None;

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || entry.file_name() != ".git");

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry while locating manifest: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() || entry.file_name() != file_name {
            continue;
        }

        let manifest = match Manifest::load(entry.path()) {
            Ok(manifest) => manifest,
            Err(e) => {
                tracing::warn!("Skipping unparseable manifest {}: {e:#}", entry.path().display());
                continue;
            }
        };

        if !manifest.matches(name, version) {
            tracing::debug!(
                "Manifest {} declares {}@{}, not {name}@{version}",
                entry.path().display(),
                manifest.name,
                manifest.version
            );
            continue;
        }

        match &found {
            Some(first) => tracing::warn!(
                "Multiple manifests match {name}@{version}; using {} and ignoring {}",
                first.path.display(),
                entry.path().display()
            ),
            None => {
                tracing::debug!("Located {name}@{version} at {}", entry.path().display());
                found = Some(LocatedManifest {
                    manifest,
                    path: entry.path().to_path_buf(),
                    root: root.to_path_buf(),
                });
            }
        }
    }

    found.ok_or_else(|| ModsyncError::ManifestNotFound {
        name: name.to_string(),
        version: version.to_string(),
        searched: root.display().to_string(),
    })
}
