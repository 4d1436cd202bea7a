//! Staging roots: exclusively-owned temporary directories with RAII cleanup.
//!
//! Every fetch and every unpack materializes into a [`StagingRoot`]. The directory
//! is removed when the value is dropped, which covers success, `?`-propagated
//! failures, and panics alike.

use crate::constants::{STAGING_NAME_ATTEMPTS, STAGING_PREFIX};
use crate::utils::fs::dirs::remove_dir_all;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// A temporary directory owned by a single operation.
///
/// Named `modsync_{purpose}_{uuid}` under the system temp dir. The name is
/// collision-checked: creation uses `create_dir`, which refuses existing paths,
/// and a fresh UUID is drawn on collision.
///
/// # Examples
///
/// ```rust,no_run
/// use modsync_cli::utils::fs::StagingRoot;
///
/// # fn example() -> anyhow::Result<()> {
/// let path = {
///     let staging = StagingRoot::new("clone")?;
///     std::fs::write(staging.path().join("file.txt"), "temporary data")?;
///     staging.path().to_path_buf()
/// };
/// assert!(!path.exists());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct StagingRoot {
    path: PathBuf,
}

impl StagingRoot {
    /// Create a fresh staging directory under the system temp dir.
    pub fn new(purpose: &str) -> Result<Self> {
        Self::new_in(&std::env::temp_dir(), purpose)
    }

    /// Create a fresh staging directory under `parent`.
    pub fn new_in(parent: &Path, purpose: &str) -> Result<Self> {
        crate::utils::fs::ensure_dir(parent)?;

        for _ in 0..STAGING_NAME_ATTEMPTS {
            let name = format!("{STAGING_PREFIX}_{purpose}_{}", uuid::Uuid::new_v4().simple());
            let path = parent.join(name);
            match std::fs::create_dir(&path) {
                Ok(()) => {
                    tracing::debug!("Created staging root {}", path.display());
                    return Ok(Self {
                        path,
                    });
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to create staging directory {}", path.display())
                    });
                }
            }
        }

        Err(anyhow::anyhow!(
            "Could not find an unused staging directory name in {}",
            parent.display()
        ))
    }

    /// Path of the staging directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagingRoot {
    fn drop(&mut self) {
        match remove_dir_all(&self.path) {
            Ok(()) => tracing::debug!("Removed staging root {}", self.path.display()),
            Err(e) => tracing::warn!("Failed to remove staging root {}: {e:#}", self.path.display()),
        }
    }
}
