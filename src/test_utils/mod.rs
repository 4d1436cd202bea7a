//! Test utilities for modsync
//!
//! Shared by unit tests and, through the `test-utils` feature, by the
//! integration tests under `tests/`.
//!
//! - [`init_test_logging`] - one-time tracing setup honoring `RUST_LOG`
//! - [`fixtures`] - manifests and artifact trees written to a directory
//! - [`fakes`] - a directory-backed [`Fetcher`](crate::source::Fetcher), a
//!   fault-injecting [`Workspace`](crate::workspace::Workspace) and a recording
//!   [`Callback`](crate::hooks::Callback)
//! - [`git_helper`] - [`TestGit`] for building tagged local repositories
//!
//! # Example
//!
//! ```rust,no_run
//! use modsync_cli::test_utils::ArtifactFixture;
//!
//! # fn example() -> anyhow::Result<()> {
//! let temp = tempfile::tempdir()?;
//! ArtifactFixture::module("sample", "0.2.0")
//!     .file(".tasks.ps1", "task default {}")
//!     .write_to(temp.path())?;
//! # Ok(())
//! # }
//! ```

pub mod fakes;
pub mod fixtures;
pub mod git_helper;

pub use fakes::{CallbackRecord, DirectoryFetcher, FaultyWorkspace, RecordingCallback, WorkspaceEvent};
pub use fixtures::ArtifactFixture;
pub use git_helper::TestGit;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests, once per process.
///
/// With `level` set that level is used; otherwise `RUST_LOG` decides, and
/// without it logging stays off.
///
/// ```bash
/// RUST_LOG=modsync_cli=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
