//! Operation reports returned by every lifecycle operation.

use crate::core::ArtifactKind;
use crate::hooks::CallbackOutcome;
use serde::Serialize;
use std::fmt;

/// The lifecycle operation that produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    Pack,
    Unpack,
    Clone,
    Update,
    Remove,
    InstallEnabler,
    UpgradeEnabler,
    RemoveEnabler,
}

impl Operation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pack => "pack",
            Self::Unpack => "unpack",
            Self::Clone => "clone",
            Self::Update => "update",
            Self::Remove => "remove",
            Self::InstallEnabler => "install-enabler",
            Self::UpgradeEnabler => "upgrade-enabler",
            Self::RemoveEnabler => "remove-enabler",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The archive written by `pack`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveSummary {
    /// Root-relative archive path
    pub path: String,
    /// Hex SHA-256 of the archive bytes
    pub digest: String,
    pub entries: usize,
}

/// Outcome of one lifecycle operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationReport {
    pub operation: Operation,
    pub kind: ArtifactKind,
    pub name: String,
    pub version: String,
    /// True when the plan was computed but not applied
    pub dry_run: bool,
    /// Paths deleted (or, in a dry run, that would be deleted)
    pub deleted: Vec<String>,
    /// Paths written (or, in a dry run, that would be written)
    pub copied: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<ArchiveSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback: Option<CallbackOutcome>,
}

impl OperationReport {
    #[must_use]
    pub fn new(operation: Operation, kind: ArtifactKind, name: &str, version: &str) -> Self {
        Self {
            operation,
            kind,
            name: name.to_string(),
            version: version.to_string(),
            dry_run: false,
            deleted: Vec::new(),
            copied: Vec::new(),
            archive: None,
            callback: None,
        }
    }

    /// One-line summary for terminal output.
    #[must_use]
    pub fn summary(&self) -> String {
        let (done, todo) = match self.operation {
            Operation::Pack => ("Packed", "pack"),
            Operation::Unpack => ("Unpacked", "unpack"),
            Operation::Clone => ("Cloned", "clone"),
            Operation::Update | Operation::UpgradeEnabler => ("Updated", "update"),
            Operation::Remove | Operation::RemoveEnabler => ("Removed", "remove"),
            Operation::InstallEnabler => ("Installed", "install"),
        };
        let verb = if self.dry_run { format!("Would {todo}") } else { done.to_string() };
        format!(
            "{verb} {} {}@{} ({} deleted, {} copied)",
            self.kind,
            self.name,
            self.version,
            self.deleted.len(),
            self.copied.len()
        )
    }
}
