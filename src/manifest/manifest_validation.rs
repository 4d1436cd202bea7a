//! Validation operations for manifests.
//!
//! Rules are checked in a fixed order and each has its own failure reason:
//! 1. `name` present, non-empty, lowercase
//! 2. `version` present, non-empty, usable as a file name component
//! 3. `include` present, non-empty, every entry a well-formed relative path
//! 4. every `include` and `exclude` entry exists under the given root
//!
//! Whether the manifest lists its own path is a convention, not a rule; the
//! resolver only warns about it.

use crate::core::ModsyncError;
use crate::manifest::Manifest;
use crate::utils::fs::{join_relative, normalize_entry};
use std::path::Path;

impl Manifest {
    /// Check rules 1–3, which need no filesystem access.
    pub fn validate_fields(&self) -> Result<(), ModsyncError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(invalid("name", "is required and must not be empty"));
        }
        if name != self.name {
            return Err(invalid("name", format!("'{}' has leading or trailing whitespace", self.name)));
        }
        if name.chars().any(char::is_uppercase) {
            return Err(invalid("name", format!("'{name}' must be lowercase")));
        }
        if name.contains(['/', '\\']) {
            return Err(invalid("name", format!("'{name}' must not contain path separators")));
        }

        check_version(&self.version)?;

        if self.include.is_empty() {
            return Err(invalid("include", "must list at least one path"));
        }
        self.normalized_include()?;
        self.normalized_exclude()?;

        Ok(())
    }

    /// Run every validation rule against `root` and collect all failures.
    ///
    /// Field errors stop the check early (paths cannot be resolved from a
    /// malformed manifest); missing paths are all reported.
    #[must_use]
    pub fn validation_errors(&self, root: &Path) -> Vec<ModsyncError> {
        if let Err(e) = self.validate_fields() {
            return vec![e];
        }

        // validate_fields guarantees both normalize cleanly
        let include = self.normalized_include().unwrap_or_default();
        let exclude = self.normalized_exclude().unwrap_or_default();

        include
            .iter()
            .chain(exclude.iter())
            .filter(|entry| !join_relative(root, entry).exists())
            .map(|entry| ModsyncError::MissingPath {
                path: entry.clone(),
                root: root.display().to_string(),
            })
            .collect()
    }

    /// Validate against `root`, failing with the first violated rule.
    pub fn validate(&self, root: &Path) -> Result<(), ModsyncError> {
        match self.validation_errors(root).into_iter().next() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Check that the manifest's name equals the directory that contains it.
    pub fn validate_location(&self, manifest_path: &Path) -> Result<(), ModsyncError> {
        let dir_name = manifest_path
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if dir_name != self.name {
            return Err(invalid(
                "name",
                format!("'{}' does not match its directory '{dir_name}'", self.name),
            ));
        }
        Ok(())
    }

    /// Normalized `include` entries in declaration order.
    pub fn normalized_include(&self) -> Result<Vec<String>, ModsyncError> {
        normalize_all("include", &self.include)
    }

    /// Normalized `exclude` entries in declaration order.
    pub fn normalized_exclude(&self) -> Result<Vec<String>, ModsyncError> {
        normalize_all("exclude", &self.exclude)
    }
}

/// Reject versions that cannot be embedded in an archive file name or tag.
pub fn check_version(version: &str) -> Result<(), ModsyncError> {
    if version.trim().is_empty() {
        return Err(invalid("version", "is required and must not be empty"));
    }
    if version.contains(['/', '\\']) || version.contains("..") {
        return Err(invalid("version", format!("'{version}' must not contain path separators or '..'")));
    }
    Ok(())
}

fn normalize_all(field: &str, entries: &[String]) -> Result<Vec<String>, ModsyncError> {
    entries
        .iter()
        .map(|entry| normalize_entry(entry).map_err(|e| invalid(field, e.to_string())))
        .collect()
}

fn invalid(field: &str, reason: impl Into<String>) -> ModsyncError {
    ModsyncError::ManifestValidationError {
        field: field.to_string(),
        reason: reason.into(),
    }
}
