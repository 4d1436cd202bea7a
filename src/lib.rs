//! modsync: a manifest-driven lifecycle manager for automation modules.
//!
//! A repository carries **modules** (`modules/<name>/`) and **enablers**
//! (`enablers/<name>/`), each described by a JSON manifest that declares its
//! name, version and the repository-relative files it owns. modsync keeps the
//! working tree in sync with those declarations:
//!
//! - **pack / unpack**: a deterministic zip archive in `dist/<name>/`
//! - **clone / update / remove**: versions fetched from a tagged git repository
//! - **enabler install / upgrade / remove**: the same, plus a lifecycle task
//!
//! # Architecture
//!
//! - [`manifest`]: the manifest model, its validation rules and the locator
//!   that finds a manifest by name and version in a checkout
//! - [`resolver`]: include/exclude expansion into a sorted file set
//! - [`archive`]: deterministic zip packing and safe extraction
//! - [`git`] and [`source`]: shallow tag clones behind the
//!   [`Fetcher`](source::Fetcher) trait
//! - [`workspace`]: the only place repository files are written or deleted
//! - [`hooks`]: enabler lifecycle tasks behind the [`Callback`](hooks::Callback) trait
//! - [`installer`]: the reconciliation engine tying the above together
//! - [`config`]: the optional `modsync.toml`
//! - [`cli`]: the `modsync` command line
//!
//! # Example
//!
//! ```rust,no_run
//! use modsync_cli::config::ProjectConfig;
//! use modsync_cli::installer::{Installer, RemoteRequest};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let root = std::path::Path::new(".");
//! let config = ProjectConfig::load_with_optional(root, None).await?;
//! let installer = Installer::from_config(root, &config);
//!
//! let request = RemoteRequest::new("sample", "0.3.0").dry_run(true);
//! let report = installer.update_module(&request).await?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

// Manifest model and file sets
pub mod archive;
pub mod manifest;
pub mod resolver;

// Remote fetching
pub mod git;
pub mod source;

// Reconciliation
pub mod hooks;
pub mod installer;
pub mod workspace;

// Supporting modules
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
