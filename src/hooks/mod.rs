//! Enabler lifecycle callbacks.
//!
//! An enabler may ship a task file (`.tasks.ps1` by default) next to its
//! manifest. After its files are installed or upgraded, and before they are
//! removed, the engine asks a [`Callback`] to run the matching task. The answer
//! is one of three outcomes, so "did it exist" and "did it succeed" stay
//! separate:
//!
//! - [`CallbackOutcome::Invoked`]: the task ran and exited successfully
//! - [`CallbackOutcome::Skipped`]: there was nothing to run
//! - [`CallbackOutcome::Failed`]: the task ran (or tried to) and failed
//!
//! Failures never roll back file changes; the engine logs them as warnings and
//! records them in the operation report.

use crate::config::TaskConfig;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Environment variable carrying the enabler name.
pub const ENV_ENABLER_NAME: &str = "MODSYNC_ENABLER_NAME";
/// Environment variable carrying the enabler version.
pub const ENV_ENABLER_VERSION: &str = "MODSYNC_ENABLER_VERSION";
/// Environment variable carrying the repository root.
pub const ENV_ROOT: &str = "MODSYNC_ROOT";

/// The lifecycle task a callback is asked to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CallbackTask {
    Install,
    Upgrade,
    Remove,
}

impl CallbackTask {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Upgrade => "upgrade",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for CallbackTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a callback is invoked for.
#[derive(Debug, Clone)]
pub struct CallbackRequest {
    pub task: CallbackTask,
    /// Enabler name
    pub name: String,
    /// Enabler version being installed, upgraded to, or removed
    pub version: String,
    /// Repository root; the process runs here
    pub root: PathBuf,
    /// Absolute enabler directory holding the task file
    pub artifact_dir: PathBuf,
}

/// Result of trying to run a callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "lowercase")]
pub enum CallbackOutcome {
    Invoked,
    Skipped,
    Failed(String),
}

impl fmt::Display for CallbackOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invoked => f.write_str("invoked"),
            Self::Skipped => f.write_str("skipped"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Runs an enabler's lifecycle task if it has one.
pub trait Callback {
    /// Try to run `request.task`. Never returns an error; failures are an outcome.
    fn try_invoke(&self, request: &CallbackRequest) -> impl Future<Output = CallbackOutcome> + Send;
}

/// Runs tasks from the enabler's task file with a configured program.
///
/// With the default [`TaskConfig`] this is
/// `pwsh -NoProfile -File <enabler>/.tasks.ps1 <task>`.
#[derive(Debug, Clone, Default)]
pub struct TaskRunner {
    tasks: TaskConfig,
}

impl TaskRunner {
    #[must_use]
    pub const fn new(tasks: TaskConfig) -> Self {
        Self {
            tasks,
        }
    }

    /// Location of the task file for an enabler directory.
    #[must_use]
    pub fn task_file(&self, artifact_dir: &Path) -> PathBuf {
        artifact_dir.join(&self.tasks.file)
    }

    async fn run(&self, request: &CallbackRequest, task_file: &Path) -> Result<(), String> {
        let args = self.tasks.render_args(task_file, request.task.as_str());
        tracing::debug!(
            target: "callback",
            "({}) Running {} {}",
            request.name,
            self.tasks.program,
            args.join(" ")
        );

        let mut cmd = Command::new(&self.tasks.program);
        cmd.args(&args)
            .current_dir(&request.root)
            .env(ENV_ENABLER_NAME, &request.name)
            .env(ENV_ENABLER_VERSION, &request.version)
            .env(ENV_ROOT, &request.root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output_future = cmd.output();
        let output = match self.tasks.timeout() {
            Some(duration) => tokio::time::timeout(duration, output_future)
                .await
                .map_err(|_| format!("timed out after {} seconds", duration.as_secs()))?,
            None => output_future.await,
        }
        .map_err(|e| format!("could not start {}: {e}", self.tasks.program))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            tracing::debug!(target: "callback", "({}) {}", request.name, stdout.trim());
        }

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = output.status.code().map_or_else(|| "signal".to_string(), |c| c.to_string());
            Err(format!("exit status {code}: {}", stderr.trim()))
        }
    }
}

impl Callback for TaskRunner {
    async fn try_invoke(&self, request: &CallbackRequest) -> CallbackOutcome {
        let task_file = self.task_file(&request.artifact_dir);
        if !task_file.is_file() {
            tracing::debug!(
                target: "callback",
                "({}) No task file at {}, skipping {}",
                request.name,
                task_file.display(),
                request.task
            );
            return CallbackOutcome::Skipped;
        }

        match self.run(request, &task_file).await {
            Ok(()) => {
                tracing::info!(target: "callback", "({}) {} task completed", request.name, request.task);
                CallbackOutcome::Invoked
            }
            Err(reason) => CallbackOutcome::Failed(reason),
        }
    }
}
