//! Path set resolution: from a manifest's `include`/`exclude` to concrete files.
//!
//! The resolved set is `expand(include) − expand(exclude)`, where `expand` turns a
//! file entry into itself and a directory entry into every regular file beneath
//! it. The result is a [`BTreeSet`], so it is deduplicated and iterates in sorted
//! order; archives built from it are reproducible.
//!
//! The set is never persisted. Each operation recomputes it from the manifest
//! and the root it is working against.
//!
//! # Strict vs. Installed Resolution
//!
//! - [`resolve`] is used before copying: every declared path must exist, and an
//!   empty result is an error.
//! - [`resolve_installed`] is used before deleting: entries already missing from
//!   the workspace are skipped, because the goal is removal.

use crate::core::ModsyncError;
use crate::manifest::Manifest;
use crate::utils::fs::{join_relative, to_relative};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;


/// The materialized file list of a manifest against one root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSet {
    root: PathBuf,
    files: BTreeSet<String>,
}

impl ResolvedSet {
    /// Root the paths are relative to.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Root-relative, forward-slash file paths in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(String::as_str)
    }

    /// Number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True when no file survived resolution.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// True when `path` is part of the set.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains(path)
    }

    /// Absolute location of a member path.
    #[must_use]
    pub fn absolute(&self, relative: &str) -> PathBuf {
        join_relative(&self.root, relative)
    }

    /// The paths as an owned, sorted vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.files.iter().cloned().collect()
    }
}

/// Resolve a manifest against `root`, requiring every declared path to exist.
///
/// # Errors
///
/// - [`ModsyncError::ManifestValidationError`] for malformed fields
/// - [`ModsyncError::MissingPath`] for the first declared path absent under `root`
/// - [`ModsyncError::EmptyFileSet`] when excludes cancel every included file
pub fn resolve(manifest: &Manifest, root: &Path) -> Result<ResolvedSet, ModsyncError> {
    manifest.validate(root)?;

    let include = manifest.normalized_include()?;
    let exclude = manifest.normalized_exclude()?;

    let resolved = build(root, &include, &exclude);
    if resolved.is_empty() {
        return Err(ModsyncError::EmptyFileSet {
            name: manifest.name.clone(),
        });
    }

    tracing::debug!(
        "Resolved {}@{} to {} file(s) under {}",
        manifest.name,
        manifest.version,
        resolved.len(),
        root.display()
    );
    Ok(resolved)
}

/// Resolve the files an installed manifest currently owns under `root`.
///
/// Declared entries that no longer exist are skipped. The result may be empty.
pub fn resolve_installed(manifest: &Manifest, root: &Path) -> Result<ResolvedSet, ModsyncError> {
    let include = manifest.normalized_include()?;
    let exclude = manifest.normalized_exclude()?;

    for entry in include.iter().chain(exclude.iter()) {
        if !join_relative(root, entry).exists() {
            tracing::debug!("Installed path {entry} already absent under {}", root.display());
        }
    }

    Ok(build(root, &include, &exclude))
}

fn build(root: &Path, include: &[String], exclude: &[String]) -> ResolvedSet {
    let mut files = BTreeSet::new();
    for entry in include {
        expand(root, entry, &mut files);
    }

    let mut excluded = BTreeSet::new();
    for entry in exclude {
        expand(root, entry, &mut excluded);
    }

    for path in &excluded {
        if files.remove(path) {
            tracing::debug!("Excluded {path}");
        }
    }

    ResolvedSet {
        root: root.to_path_buf(),
        files,
    }
}

/// Expand one declared entry into the files it designates. Missing entries expand to nothing.
pub(crate) fn expand(root: &Path, entry: &str, out: &mut BTreeSet<String>) {
    let path = join_relative(root, entry);

    if path.is_file() {
        out.insert(entry.to_string());
        return;
    }
    if !path.is_dir() {
        return;
    }

    // Symlinked files and directories count as their targets
    for item in WalkDir::new(&path).follow_links(true).sort_by_file_name() {
        let item = match item {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {entry}: {e}");
                continue;
            }
        };
        if item.file_type().is_file()
            && let Some(relative) = to_relative(root, item.path())
        {
            out.insert(relative);
        }
    }
}
