//! Two-phase reconciliation plans.
//!
//! A [`Plan`] is computed in full before the workspace is touched: the list of
//! installed paths to delete, the list of files to copy in, and the artifact
//! directory to prune afterwards. [`Plan::validate`] checks every copy source
//! before the first deletion, so a missing file in a checkout or archive fails
//! the operation while the workspace is still intact.
//!
//! Applying a plan is best-effort, not transactional. All deletions complete
//! before the first copy begins; an I/O failure after that point leaves the old
//! files deleted and the new files partially written.

use crate::core::ModsyncError;
use crate::utils::fs::to_relative;
use crate::workspace::Workspace;
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

/// One file to materialize in the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyStep {
    /// Absolute source file inside a staging root
    pub source: PathBuf,
    /// Root-relative destination path
    pub destination: String,
}

/// Deletes, copies and a prune target, applied in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Plan {
    deletes: Vec<String>,
    copies: Vec<CopyStep>,
    prune: Option<String>,
}

/// What applying a plan actually changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Applied {
    pub deleted: Vec<String>,
    pub copied: Vec<String>,
}

impl Plan {
    /// An empty plan that prunes `prune` (root-relative) after applying, if set.
    #[must_use]
    pub fn new(prune: Option<String>) -> Self {
        Self {
            deletes: Vec::new(),
            copies: Vec::new(),
            prune,
        }
    }

    pub fn with_deletes(mut self, deletes: impl IntoIterator<Item = String>) -> Self {
        self.deletes.extend(deletes);
        self
    }

    pub fn with_copies(mut self, copies: impl IntoIterator<Item = CopyStep>) -> Self {
        self.copies.extend(copies);
        self
    }

    #[must_use]
    pub fn deletes(&self) -> &[String] {
        &self.deletes
    }

    #[must_use]
    pub fn copies(&self) -> &[CopyStep] {
        &self.copies
    }

    /// Destination paths of every copy step.
    #[must_use]
    pub fn destinations(&self) -> Vec<String> {
        self.copies.iter().map(|step| step.destination.clone()).collect()
    }

    /// Check that every copy source is still a readable file.
    pub fn validate(&self) -> Result<(), ModsyncError> {
        for step in &self.copies {
            if !step.source.is_file() {
                let root = step
                    .source
                    .parent()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                return Err(ModsyncError::MissingPath {
                    path: step.destination.clone(),
                    root,
                });
            }
        }
        Ok(())
    }

    /// Validate, then delete, then copy, then prune.
    pub fn apply<W: Workspace>(&self, workspace: &W) -> Result<Applied> {
        self.validate()?;
        let mut applied = Applied::default();

        for path in &self.deletes {
            if workspace.delete(path)? {
                applied.deleted.push(path.clone());
            } else {
                tracing::debug!("{path} was already absent");
            }
        }

        for step in &self.copies {
            workspace.copy_in(&step.source, &step.destination)?;
            applied.copied.push(step.destination.clone());
        }

        if let Some(dir) = &self.prune {
            workspace.prune_empty(dir)?;
        }

        tracing::debug!(
            "Applied plan: {} deleted, {} copied",
            applied.deleted.len(),
            applied.copied.len()
        );
        Ok(applied)
    }

    /// Render copy sources relative to `staging` for display.
    #[must_use]
    pub fn describe_copies(&self, staging: &std::path::Path) -> Vec<String> {
        self.copies
            .iter()
            .map(|step| {
                let from = to_relative(staging, &step.source)
                    .unwrap_or_else(|| step.source.display().to_string());
                if from == step.destination {
                    step.destination.clone()
                } else {
                    format!("{} (from {from})", step.destination)
                }
            })
            .collect()
    }
}
