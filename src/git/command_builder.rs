//! Type-safe Git command builder for consistent command execution
//!
//! This module provides a fluent API for building and executing Git commands so
//! that timeout handling, logging and error mapping live in one place.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::GIT_CLONE_TIMEOUT;
use crate::core::ModsyncError;
use crate::utils::platform::get_git_command;
use crate::utils::strip_auth_from_url;

/// Builder for constructing and executing Git commands.
///
/// # Examples
///
/// ```rust,no_run
/// use modsync_cli::git::command_builder::GitCommand;
///
/// # async fn example() -> anyhow::Result<()> {
/// let version = GitCommand::new().arg("--version").execute_stdout().await?;
///
/// GitCommand::shallow_clone("https://github.com/org/modules.git", "v1.2.0", "/tmp/checkout")
///     .with_context("sample")
///     .execute_success()
///     .await?;
/// # Ok(())
/// # }
/// ```
///
/// # Defaults
///
/// - **Timeout**: 5 minutes
/// - **Output capture**: enabled
/// - **Terminal prompts**: disabled (`GIT_TERMINAL_PROMPT=0`), so a missing
///   credential fails fast instead of hanging
pub struct GitCommand {
    /// Command arguments to pass to Git
    args: Vec<String>,

    /// Working directory (passed as `-C`)
    current_dir: Option<PathBuf>,

    /// Environment variables to set for the Git process
    env_vars: Vec<(String, String)>,

    /// Maximum duration to wait for command completion (None = no timeout)
    timeout_duration: Option<Duration>,

    /// Optional context string prefixed to log lines
    context: Option<String>,

    /// For clone commands, the URL and ref, so failures map to a fetch error
    clone_target: Option<(String, String)>,
}

impl Default for GitCommand {
    fn default() -> Self {
        Self {
            args: Vec::new(),
            current_dir: None,
            env_vars: vec![("GIT_TERMINAL_PROMPT".to_string(), "0".to_string())],
            timeout_duration: Some(GIT_CLONE_TIMEOUT),
            context: None,
            clone_target: None,
        }
    }
}

impl GitCommand {
    /// Creates a new Git command builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the working directory for Git command execution.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Adds a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Adds an environment variable for the Git process.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Set a custom timeout for the command (None for no timeout).
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Set a context for logging (e.g., the artifact name).
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    fn log_prefix(&self) -> String {
        self.context.as_ref().map(|ctx| format!("({ctx}) ")).unwrap_or_default()
    }

    /// Arguments as they appear in logs, with credentials stripped from URLs.
    fn display_args(&self, full_args: &[String]) -> String {
        full_args.iter().map(|a| strip_auth_from_url(a)).collect::<Vec<_>>().join(" ")
    }

    /// Execute the command and return its output.
    pub async fn execute(self) -> Result<GitCommandOutput> {
        let start = std::time::Instant::now();
        let git_command = get_git_command();
        let mut cmd = Command::new(git_command);

        let mut full_args = Vec::new();
        if let Some(ref dir) = self.current_dir {
            full_args.push("-C".to_string());
            full_args.push(dir.display().to_string());
        }
        full_args.extend(self.args.iter().cloned());
        cmd.args(&full_args);

        let prefix = self.log_prefix();
        let shown = self.display_args(&full_args);
        tracing::debug!(target: "git", "{prefix}Executing command: {git_command} {shown}");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let output_future = cmd.output();
        let output = if let Some(duration) = self.timeout_duration {
            if let Ok(result) = timeout(duration, output_future).await {
                result.with_context(|| format!("Failed to execute git {shown}"))?
            } else {
                tracing::warn!(
                    target: "git",
                    "{prefix}Command timed out after {} seconds: git {shown}",
                    duration.as_secs()
                );
                let reason = format!("timed out after {} seconds", duration.as_secs());
                return Err(self.failure(reason).into());
            }
        } else {
            output_future.await.with_context(|| format!("Failed to execute git {shown}"))?
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                target: "git",
                "{prefix}Command failed with exit code: {:?}",
                output.status.code()
            );
            if !stderr.is_empty() {
                tracing::debug!(target: "git", "{prefix}Error: {}", stderr.trim());
            }
            let reason = if stderr.trim().is_empty() { stdout.trim() } else { stderr.trim() };
            return Err(self.failure(reason.to_string()).into());
        }

        if !stdout.is_empty() {
            tracing::debug!(target: "git", "{prefix}{}", stdout.trim());
        }
        if !stderr.is_empty() {
            tracing::debug!(target: "git", "{prefix}{}", stderr.trim());
        }

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::info!(target: "git::perf", "{prefix}Git {} took {:.2}s", self.operation(), elapsed.as_secs_f64());
        } else if elapsed.as_millis() > 100 {
            tracing::debug!(target: "git::perf", "{prefix}Git {} took {}ms", self.operation(), elapsed.as_millis());
        }

        Ok(GitCommandOutput {
            stdout,
            stderr,
        })
    }

    /// Execute the command and return only stdout as a trimmed string.
    pub async fn execute_stdout(self) -> Result<String> {
        let output = self.execute().await?;
        Ok(output.stdout.trim().to_string())
    }

    /// Execute the command, discarding its output.
    pub async fn execute_success(self) -> Result<()> {
        self.execute().await?;
        Ok(())
    }

    fn operation(&self) -> String {
        self.args
            .iter()
            .find(|arg| !arg.starts_with('-') && !arg.contains('='))
            .cloned()
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn failure(&self, reason: String) -> ModsyncError {
        match &self.clone_target {
            Some((url, tag)) => ModsyncError::FetchFailed {
                url: strip_auth_from_url(url),
                tag: tag.clone(),
                reason,
            },
            None => ModsyncError::GitCommandError {
                operation: self.operation(),
                stderr: reason,
            },
        }
    }
}

/// Output from a Git command
pub struct GitCommandOutput {
    /// Standard output from the Git command
    pub stdout: String,
    /// Standard error output from the Git command
    pub stderr: String,
}

// Convenience builders for common Git operations

impl GitCommand {
    /// Create a depth-1, single-branch clone of `reference` (a tag or branch).
    pub fn shallow_clone(url: &str, reference: &str, target: impl AsRef<Path>) -> Self {
        let mut cmd = Self::new().args([
            "-c",
            "advice.detachedHead=false",
            "clone",
            "--quiet",
            "--depth",
            "1",
            "--single-branch",
            "--branch",
            reference,
            "--",
            url,
        ]);
        cmd.args.push(target.as_ref().display().to_string());
        cmd.clone_target = Some((url.to_string(), reference.to_string()));
        cmd
    }

    /// Create an `ls-remote --tags` command for `url`.
    pub fn ls_remote_tags(url: &str) -> Self {
        Self::new().args(["ls-remote", "--tags", "--refs", url])
    }
}
