//! Git operations via the system `git` executable
//!
//! Like Cargo, modsync shells out to the installed `git` rather than linking a
//! Git library: authentication, proxies and credential helpers then behave
//! exactly as they do for the operator's own git commands.
//!
//! The only network operation the lifecycle engine needs is a shallow,
//! single-branch clone of one tag ([`shallow_clone`]). Everything goes through
//! [`command_builder::GitCommand`] for consistent timeouts, logging and error
//! mapping.

pub mod command_builder;

use crate::core::ModsyncError;
use crate::git::command_builder::GitCommand;
use anyhow::Result;
use std::path::Path;
use std::time::Duration;

/// Check whether the git executable is available.
#[must_use]
pub fn is_git_installed() -> bool {
    crate::utils::platform::command_exists(crate::utils::platform::get_git_command())
}

/// Fail with [`ModsyncError::GitNotFound`] when git is not on PATH.
pub fn ensure_git_available() -> Result<()> {
    if !is_git_installed() {
        return Err(ModsyncError::GitNotFound.into());
    }
    Ok(())
}

/// Clone `url` at `reference` with depth 1 into `target`.
///
/// `target` must not exist or be empty. Failures, including timeouts, surface as
/// [`ModsyncError::FetchFailed`]; nothing is retried.
pub async fn shallow_clone(
    url: &str,
    reference: &str,
    target: &Path,
    timeout: Option<Duration>,
    context: &str,
) -> Result<()> {
    GitCommand::shallow_clone(url, reference, target)
        .with_timeout(timeout)
        .with_context(context)
        .execute_success()
        .await
}

/// List tag names advertised by `url`.
pub async fn list_remote_tags(url: &str) -> Result<Vec<String>> {
    let stdout = GitCommand::ls_remote_tags(url).execute_stdout().await?;
    Ok(stdout
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .filter_map(|reference| reference.strip_prefix("refs/tags/"))
        .filter(|tag| !tag.ends_with("^{}"))
        .map(String::from)
        .collect())
}
