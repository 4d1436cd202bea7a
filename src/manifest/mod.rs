//! Manifest parsing and validation for modules and enablers.
//!
//! A manifest is the JSON descriptor of one distributable artifact: its name,
//! its version, and the set of repository-relative paths that make it up.
//!
//! # File Format
//!
//! ```json
//! {
//!   "$schema": "https://example.com/module.schema.json",
//!   "name": "sample",
//!   "version": "0.2.0",
//!   "description": "Sample automation module",
//!   "include": [
//!     "modules/sample/.tasks.ps1",
//!     "modules/sample/module.manifest.json"
//!   ],
//!   "exclude": ["modules/sample/local.settings.json"],
//!   "source": { "git": "https://github.com/org/modules.git", "tagPrefix": "v" },
//!   "install": { "instructions": { "human": "Run the setup task once." } }
//! }
//! ```
//!
//! Parsing is deliberately lenient about *missing* fields (they default to empty)
//! so that [`Manifest::validate`] can report them as field-level validation
//! errors. Malformed JSON or wrongly-typed fields fail at parse time.
//!
//! # Immutability
//!
//! Once located, a manifest is treated as an immutable value: operations never
//! write a modified manifest back. A changed file set means a new version.

mod manifest_validation;
pub mod locator;

#[cfg(test)]
mod manifest_validation_tests;

pub use locator::{LocatedManifest, locate};
pub use manifest_validation::check_version;

use crate::constants::DEFAULT_TAG_PREFIX;
use crate::core::ModsyncError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Descriptor for a module or enabler.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Optional JSON schema reference; carried through untouched.
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Lowercase identifier; must equal the containing directory name.
    #[serde(default)]
    pub name: String,

    /// Opaque version string; combined with the tag prefix to select a remote tag.
    #[serde(default)]
    pub version: String,

    /// Free text with no behavioral effect.
    #[serde(default)]
    pub description: String,

    /// Repository-relative, forward-slash paths that make up the artifact.
    #[serde(default)]
    pub include: Vec<String>,

    /// Paths subtracted from `include` after expansion.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,

    /// Canonical remote origin used by update when no override is supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,

    /// Onboarding instructions; informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install: Option<Install>,
}

/// Remote origin of an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Repository URL
    pub git: String,

    /// Prefix prepended to the version to form the tag.
    ///
    /// `None` (field absent) means the default `"v"`; `Some("")` means no prefix.
    #[serde(rename = "tagPrefix", default, skip_serializing_if = "Option::is_none")]
    pub tag_prefix: Option<String>,
}

impl Source {
    /// The effective tag prefix after default resolution.
    #[must_use]
    pub fn tag_prefix(&self) -> &str {
        self.tag_prefix.as_deref().unwrap_or(DEFAULT_TAG_PREFIX)
    }
}

/// Onboarding instructions for people and automated assistants.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Install {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Instructions>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Instructions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copilot: Option<String>,
}

impl Manifest {
    /// Parse manifest JSON.
    ///
    /// # Errors
    ///
    /// [`ModsyncError::ManifestParseError`] for malformed JSON or wrongly-typed fields.
    pub fn parse(bytes: &[u8]) -> Result<Self, ModsyncError> {
        Self::parse_named(bytes, "<input>")
    }

    fn parse_named(bytes: &[u8], file: &str) -> Result<Self, ModsyncError> {
        serde_json::from_slice(bytes).map_err(|e| ModsyncError::ManifestParseError {
            file: file.to_string(),
            reason: e.to_string(),
        })
    }

    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        Ok(Self::parse_named(&bytes, &path.display().to_string())?)
    }

    /// Serialize as pretty-printed JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Tag prefix declared by `source`, or the default when there is no source.
    #[must_use]
    pub fn tag_prefix(&self) -> &str {
        self.source.as_ref().map_or(DEFAULT_TAG_PREFIX, Source::tag_prefix)
    }

    /// Repository URL declared by `source.git`, if any.
    #[must_use]
    pub fn git_url(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.git.as_str()).filter(|url| !url.trim().is_empty())
    }

    /// True when `name` equals this manifest's name, ignoring ASCII case.
    #[must_use]
    pub fn matches(&self, name: &str, version: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim()) && self.version == version
    }
}
