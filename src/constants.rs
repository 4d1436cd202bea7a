//! Global constants used throughout the modsync codebase.
//!
//! File names, directory conventions, and timeouts that more than one
//! module depends on live here so the on-disk layout is defined in one place.

use std::time::Duration;

/// File name of a module manifest (`modules/<name>/module.manifest.json`).
pub const MODULE_MANIFEST_FILE: &str = "module.manifest.json";

/// File name of an enabler manifest (`enablers/<name>/enabler.manifest.json`).
pub const ENABLER_MANIFEST_FILE: &str = "enabler.manifest.json";

/// Name of the optional project configuration file at the repository root.
pub const CONFIG_FILE: &str = "modsync.toml";

/// Environment variable that points at an alternative configuration file.
pub const CONFIG_ENV_VAR: &str = "MODSYNC_CONFIG";

/// Default directory holding modules, relative to the repository root.
pub const DEFAULT_MODULES_DIR: &str = "modules";

/// Default directory holding enablers, relative to the repository root.
pub const DEFAULT_ENABLERS_DIR: &str = "enablers";

/// Default directory holding packed archives, relative to the repository root.
pub const DEFAULT_DIST_DIR: &str = "dist";

/// Tag prefix used when a manifest's `source` omits `tagPrefix`.
pub const DEFAULT_TAG_PREFIX: &str = "v";

/// Stem of archives produced by older tooling (`Module.zip`, `Module.<version>.zip`).
///
/// Recognized when unpacking, deleted when packing, never written.
pub const LEGACY_ARCHIVE_STEM: &str = "Module";

/// Extension of packed archives.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Default enabler task file, relative to the enabler directory.
pub const DEFAULT_TASK_FILE: &str = ".tasks.ps1";

/// Default program used to run enabler task files.
pub const DEFAULT_TASK_PROGRAM: &str = "pwsh";

/// Timeout for a shallow clone (300 seconds).
///
/// Tags are immutable, so a clone that has not finished in this window is
/// reported as a fetch failure instead of being retried.
pub const GIT_CLONE_TIMEOUT: Duration = Duration::from_secs(300);

/// Timeout for an enabler lifecycle callback (600 seconds).
pub const CALLBACK_TIMEOUT: Duration = Duration::from_secs(600);

/// Prefix of staging directories created under the system temp dir.
pub const STAGING_PREFIX: &str = "modsync";

/// Number of attempts made to find an unused staging directory name.
pub const STAGING_NAME_ATTEMPTS: usize = 8;
