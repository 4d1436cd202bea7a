//! Artifact kinds managed by modsync.
//!
//! A repository carries two structurally parallel kinds of artifacts:
//! - **Modules**: pluggable automation units under `modules/<name>/`
//! - **Enablers**: optional toolchain integrations under `enablers/<name>/` with
//!   their own lifecycle callbacks
//!
//! The kind decides the manifest file name and the layout directory; everything
//! else (resolution, packing, reconciliation) is shared.

use crate::constants::{ENABLER_MANIFEST_FILE, MODULE_MANIFEST_FILE};
use crate::core::ModsyncError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of artifact a manifest describes.
///
/// # Examples
///
/// ```rust
/// use modsync_cli::core::ArtifactKind;
///
/// let kind: ArtifactKind = "enabler".parse().unwrap();
/// assert_eq!(kind.manifest_file_name(), "enabler.manifest.json");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// A module (`module.manifest.json`)
    Module,
    /// An enabler (`enabler.manifest.json`)
    Enabler,
}

impl ArtifactKind {
    /// File name of this kind's manifest.
    #[must_use]
    pub const fn manifest_file_name(self) -> &'static str {
        match self {
            Self::Module => MODULE_MANIFEST_FILE,
            Self::Enabler => ENABLER_MANIFEST_FILE,
        }
    }

    /// Lowercase display name used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Enabler => "enabler",
        }
    }

    /// Both kinds, modules first.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Module, Self::Enabler]
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ArtifactKind {
    type Err = ModsyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "module" | "modules" => Ok(Self::Module),
            "enabler" | "enablers" => Ok(Self::Enabler),
            _ => Err(ModsyncError::Other {
                message: format!("Unknown artifact kind '{s}' (expected 'module' or 'enabler')"),
            }),
        }
    }
}
