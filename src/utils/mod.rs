//! Cross-platform utilities and helpers
//!
//! - [`fs`] - directory helpers, atomic writes, staging roots and path normalization
//! - [`platform`] - git executable lookup and Windows long-path handling
//!
//! # Example
//!
//! ```rust,no_run
//! use modsync_cli::utils::fs::{ensure_dir, StagingRoot};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! ensure_dir(Path::new("dist/sample"))?;
//!
//! let staging = StagingRoot::new("unpack")?;
//! assert!(staging.path().exists());
//! # Ok(())
//! # }
//! ```

pub mod fs;
pub mod platform;

pub use fs::{StagingRoot, atomic_write, ensure_dir, ensure_parent_dir, remove_dir_all};
pub use platform::{command_exists, get_git_command, is_windows};

/// Remove userinfo (credentials) from a URL so it can be logged safely.
///
/// `https://token@github.com/org/repo.git` becomes `https://github.com/org/repo.git`.
/// Inputs without a scheme (scp-style `git@host:org/repo`, local paths) are returned unchanged.
#[must_use]
pub fn strip_auth_from_url(url: &str) -> String {
    if let Some((scheme, rest)) = url.split_once("://") {
        let (authority, path) = match rest.find('/') {
            Some(idx) => rest.split_at(idx),
            None => (rest, ""),
        };
        if let Some(at) = authority.rfind('@') {
            return format!("{scheme}://{}{path}", &authority[at + 1..]);
        }
    }
    url.to_string()
}
