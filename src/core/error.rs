//! Error handling for modsync
//!
//! This module provides the error types and operator-facing error reporting for the
//! module lifecycle manager. The error system follows two principles:
//! 1. **Strongly-typed errors** so callers (and tests) can match on the exact failure
//! 2. **Operator-friendly messages** that name the violated precondition and suggest a fix
//!
//! # Architecture
//!
//! - [`ModsyncError`] - one variant per failure reason of a lifecycle operation
//! - [`ErrorContext`] - wrapper that adds a suggestion and details for CLI display
//!
//! # Error Categories
//!
//! - **Validation**: [`ModsyncError::ManifestParseError`], [`ModsyncError::ManifestValidationError`],
//!   [`ModsyncError::VersionMismatch`], [`ModsyncError::EmptyFileSet`]
//! - **Missing paths**: [`ModsyncError::MissingPath`]
//! - **Lookup**: [`ModsyncError::ManifestNotFound`], [`ModsyncError::LocalManifestNotFound`],
//!   [`ModsyncError::ArchiveNotFound`]
//! - **Fetch**: [`ModsyncError::FetchFailed`], [`ModsyncError::GitNotFound`],
//!   [`ModsyncError::GitCommandError`]
//! - **Preconditions**: [`ModsyncError::PreconditionFailed`], [`ModsyncError::NoGitSource`]
//!
//! Use [`user_friendly_error`] to turn any [`anyhow::Error`] into an [`ErrorContext`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use modsync_cli::core::{ModsyncError, user_friendly_error};
//!
//! let error = ModsyncError::MissingPath {
//!     path: "modules/sample/run.ps1".to_string(),
//!     root: "/repo".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for modsync operations.
///
/// Every variant names the exact input that violated a precondition so the
/// message can be surfaced to the operator verbatim.
#[derive(Error, Debug, Clone)]
pub enum ModsyncError {
    /// A manifest file could not be parsed as JSON or is missing required fields.
    #[error("Invalid manifest file {file}: {reason}")]
    ManifestParseError {
        /// Path to the manifest that failed to parse
        file: String,
        /// Parser message
        reason: String,
    },

    /// A manifest parsed but violates one of the validation rules.
    #[error("Manifest validation failed for field '{field}': {reason}")]
    ManifestValidationError {
        /// The offending manifest field (`name`, `version`, `include`, ...)
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// A declared include/exclude path does not exist under the root it was resolved against.
    #[error("Declared path '{path}' does not exist under {root}")]
    MissingPath {
        /// The repository-relative path as declared
        path: String,
        /// The root the path was resolved against
        root: String,
    },

    /// No manifest matching the requested coordinates was found in a staging root.
    #[error("No manifest named '{name}' with version '{version}' found in {searched}")]
    ManifestNotFound {
        /// Requested artifact name
        name: String,
        /// Requested version
        version: String,
        /// The checkout, archive or directory that was searched
        searched: String,
    },

    /// The artifact has no manifest in the local workspace.
    #[error("No {kind} manifest found at {path}")]
    LocalManifestNotFound {
        /// `module` or `enabler`
        kind: String,
        /// Expected manifest location
        path: String,
    },

    /// No packed archive exists for the requested artifact version.
    #[error("No archive for '{name}' version '{version}' found in {dist}")]
    ArchiveNotFound {
        /// Artifact name
        name: String,
        /// Requested version
        version: String,
        /// The dist directory that was searched
        dist: String,
    },

    /// A shallow clone of a remote tag failed.
    #[error("Failed to fetch {url} at tag '{tag}': {reason}")]
    FetchFailed {
        /// Repository URL (credentials stripped)
        url: String,
        /// Tag that was requested
        tag: String,
        /// Underlying cause
        reason: String,
    },

    /// Git executable not found in PATH.
    #[error("Git is not installed or not found in PATH")]
    GitNotFound,

    /// A git command other than clone returned a non-zero exit code.
    #[error("Git operation failed: {operation}")]
    GitCommandError {
        /// The git operation that failed
        operation: String,
        /// Error output from git
        stderr: String,
    },

    /// A precondition checked before any mutation did not hold.
    #[error("Precondition failed: {reason}")]
    PreconditionFailed {
        /// The violated precondition
        reason: String,
    },

    /// The requested version does not match the version declared by the manifest.
    #[error("Version mismatch for '{name}': requested {requested}, manifest declares {declared}")]
    VersionMismatch {
        /// Artifact name
        name: String,
        /// Version supplied by the operator
        requested: String,
        /// Version in the manifest
        declared: String,
    },

    /// No repository URL was given and the manifest declares no `source.git`.
    #[error("No git source for '{name}': pass --git or declare source.git in the manifest")]
    NoGitSource {
        /// Artifact name
        name: String,
    },

    /// The manifest resolves to no files once excludes are applied.
    #[error("Manifest '{name}' resolves to an empty file set")]
    EmptyFileSet {
        /// Artifact name
        name: String,
    },

    /// Reading or writing an archive failed.
    #[error("Archive error for {path}: {reason}")]
    ArchiveError {
        /// Archive location or entry name
        path: String,
        /// Codec message
        reason: String,
    },

    /// Configuration file problems.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// A filesystem operation failed on a specific path.
    #[error("File system error during {operation}: {path}")]
    FileSystemError {
        /// What was being attempted
        operation: String,
        /// The path involved
        path: String,
    },

    /// Anything else
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// Error wrapper carrying operator-facing suggestions and details.
///
/// The binary prints this through [`ErrorContext::display`]; library callers can
/// format it with `{}` for logs.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: ModsyncError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: ModsyncError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add an actionable suggestion, shown in green.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error, shown in yellow.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details, and suggestion to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to an [`ErrorContext`] with actionable suggestions.
///
/// [`ModsyncError`] values anywhere in the error chain get tailored suggestions;
/// I/O errors get filesystem guidance; everything else keeps its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(modsync_error) = error.chain().find_map(|e| e.downcast_ref::<ModsyncError>()) {
        let mut ctx = create_error_context(modsync_error.clone());
        // Keep outer anyhow context (e.g. "Failed to update module 'x'") visible
        let outer = error.to_string();
        if outer != modsync_error.to_string() {
            ctx.details = Some(match ctx.details.take() {
                Some(details) => format!("{outer}\n{details}"),
                None => outer,
            });
        }
        return ctx;
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(ModsyncError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check file ownership and permissions in the repository")
                .with_details(io_error.to_string());
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(ModsyncError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct")
                .with_details(io_error.to_string());
            }
            _ => {}
        }
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(ModsyncError::Other {
        message,
    })
}

fn create_error_context(error: ModsyncError) -> ErrorContext {
    match &error {
        ModsyncError::ManifestParseError {
            file,
            ..
        } => {
            let suggestion = format!(
                "Check the JSON syntax in {file}. Required fields: name, version, description, include"
            );
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        ModsyncError::ManifestValidationError {
            field,
            ..
        } => {
            let suggestion = match field.as_str() {
                "name" => "Use a lowercase name that matches the directory containing the manifest",
                "version" => "Set a non-empty version string such as \"1.0.0\"",
                "include" => {
                    "List repository-relative paths with forward slashes and no trailing slash"
                }
                _ => "Fix the manifest field and run 'modsync validate' again",
            };
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        ModsyncError::MissingPath {
            path,
            ..
        } => {
            let suggestion = format!(
                "Create '{path}' or remove it from the manifest's include/exclude lists"
            );
            ErrorContext::new(error)
                .with_suggestion(suggestion)
                .with_details("Every declared path must exist before an operation mutates the workspace")
        }
        ModsyncError::ManifestNotFound {
            version,
            ..
        } => {
            let details = format!(
                "The tag or archive was found, but no manifest in it declares version '{version}'"
            );
            ErrorContext::new(error)
                .with_suggestion("Verify the requested name and version against the remote manifest")
                .with_details(details)
        }
        ModsyncError::LocalManifestNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Clone or unpack the artifact first, or check the name for typos"),
        ModsyncError::ArchiveNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Run 'modsync pack' for that version or copy the archive into dist/"),
        ModsyncError::FetchFailed {
            url,
            tag,
            ..
        } => {
            let suggestion = format!(
                "Verify that {url} is reachable and that tag '{tag}' exists (git ls-remote --tags {url})"
            );
            ErrorContext::new(error)
                .with_suggestion(suggestion)
                .with_details("Fetches are not retried automatically; remote tags are immutable")
        }
        ModsyncError::GitNotFound => ErrorContext::new(error)
            .with_suggestion("Install git from https://git-scm.com/ or your package manager (e.g., 'brew install git', 'apt install git')")
            .with_details("modsync requires git on PATH to fetch remote modules"),
        ModsyncError::PreconditionFailed {
            ..
        } => ErrorContext::new(error)
            .with_details("The workspace was not modified"),
        ModsyncError::VersionMismatch {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Omit the version to use the manifest's, or bump the manifest version first"),
        ModsyncError::NoGitSource {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Add \"source\": { \"git\": \"<url>\" } to the manifest or pass --git <url>",
        ),
        ModsyncError::EmptyFileSet {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check that the exclude list does not cancel every include entry"),
        _ => ErrorContext::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_error_display() {
        let error = ModsyncError::GitNotFound;
        assert_eq!(error.to_string(), "Git is not installed or not found in PATH");

        let error = ModsyncError::MissingPath {
            path: "modules/sample/a.ps1".to_string(),
            root: "/repo".to_string(),
        };
        assert_eq!(error.to_string(), "Declared path 'modules/sample/a.ps1' does not exist under /repo");
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new(ModsyncError::GitNotFound)
            .with_suggestion("Install git")
            .with_details("Git is required");

        let rendered = format!("{ctx}");
        assert!(rendered.contains("Git is not installed"));
        assert!(rendered.contains("Details: Git is required"));
        assert!(rendered.contains("Suggestion: Install git"));
    }

    #[test]
    fn test_user_friendly_error_finds_nested_modsync_error() {
        let result: anyhow::Result<()> = Err(ModsyncError::NoGitSource {
            name: "sample".to_string(),
        }
        .into());
        let error = result.context("Failed to update module 'sample'").unwrap_err();

        let ctx = user_friendly_error(error);
        assert!(matches!(ctx.error, ModsyncError::NoGitSource { .. }));
        assert!(ctx.suggestion.unwrap().contains("source"));
        assert_eq!(ctx.details.as_deref(), Some("Failed to update module 'sample'"));
    }

    #[test]
    fn test_user_friendly_error_prepends_context_to_details() {
        let result: anyhow::Result<()> = Err(ModsyncError::FetchFailed {
            url: "file:///srv/sample".to_string(),
            tag: "v9.9.9".to_string(),
            reason: "exit status 128".to_string(),
        }
        .into());
        let error = result.context("Tag 'v9.9.9' does not exist; available tags: v0.2.0").unwrap_err();

        let details = user_friendly_error(error).details.unwrap();
        assert!(details.starts_with("Tag 'v9.9.9' does not exist"));
        assert!(details.contains("not retried"));
    }

    #[test]
    fn test_user_friendly_error_without_context_keeps_details() {
        let ctx = user_friendly_error(ModsyncError::GitNotFound.into());
        assert_eq!(ctx.details.as_deref(), Some("modsync requires git on PATH to fetch remote modules"));
    }

    #[test]
    fn test_user_friendly_error_generic_keeps_chain() {
        let error = anyhow::anyhow!("root cause").context("outer");
        let ctx = user_friendly_error(error);
        match ctx.error {
            ModsyncError::Other {
                message,
            } => {
                assert!(message.starts_with("outer"));
                assert!(message.contains("1: root cause"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validation_suggestion_by_field() {
        let ctx = create_error_context(ModsyncError::ManifestValidationError {
            field: "name".to_string(),
            reason: "must be lowercase".to_string(),
        });
        assert!(ctx.suggestion.unwrap().contains("lowercase"));
    }

    #[test]
    fn test_error_clone() {
        let error = ModsyncError::FetchFailed {
            url: "https://example.com/repo.git".to_string(),
            tag: "v1.0.0".to_string(),
            reason: "not found".to_string(),
        };
        assert_eq!(error.clone().to_string(), error.to_string());
    }
}
