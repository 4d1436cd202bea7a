//! Enabler install, upgrade and remove.
//!
//! Enablers reconcile exactly like modules and then run their own lifecycle
//! task. A failed task is logged and reported; the files stay in place.

use super::report::{Operation, OperationReport};
use super::{Installer, RemoteRequest};
use crate::core::{ArtifactKind, ModsyncError};
use crate::hooks::{Callback, CallbackOutcome, CallbackRequest, CallbackTask};
use crate::resolver::resolve;
use crate::source::Fetcher;
use crate::workspace::Workspace;
use anyhow::Result;

impl<W: Workspace, F: Fetcher, C: Callback> Installer<W, F, C> {
    /// Install an enabler, then run its `install` task.
    ///
    /// With a git URL the enabler is cloned first and must not exist yet.
    /// Without one it must already be present locally at the requested version,
    /// and only the task runs.
    pub async fn install_enabler(&self, request: &RemoteRequest) -> Result<OperationReport> {
        let kind = ArtifactKind::Enabler;
        let mut report = if request.git.is_some() {
            let (report, _) = self.clone_artifact(kind, request).await?;
            report
        } else {
            let (manifest, _) = self.load_local(kind, &request.name)?;
            if manifest.version != request.version {
                return Err(ModsyncError::VersionMismatch {
                    name: request.name.clone(),
                    requested: request.version.clone(),
                    declared: manifest.version,
                }
                .into());
            }
            resolve(&manifest, self.workspace.root())?;
            tracing::info!("Enabler {} is already materialized, running install task only", request.name);
            let mut report = OperationReport::new(Operation::InstallEnabler, kind, &request.name, &request.version);
            report.dry_run = request.dry_run;
            report
        };

        if !report.dry_run {
            report.callback = Some(self.run_callback(CallbackTask::Install, &request.name, &request.version).await);
        }
        Ok(report)
    }

    /// Upgrade an installed enabler, then run its `upgrade` task.
    pub async fn upgrade_enabler(&self, request: &RemoteRequest) -> Result<OperationReport> {
        let mut report = self.update_artifact(ArtifactKind::Enabler, request).await?;
        if !report.dry_run {
            report.callback = Some(self.run_callback(CallbackTask::Upgrade, &request.name, &request.version).await);
        }
        Ok(report)
    }

    /// Run an enabler's `remove` task, then delete its files.
    pub async fn remove_enabler(&self, name: &str, dry_run: bool) -> Result<OperationReport> {
        let kind = ArtifactKind::Enabler;
        let (plan, manifest) = self.removal_plan(kind, name)?;

        let outcome = if dry_run {
            None
        } else {
            Some(self.run_callback(CallbackTask::Remove, name, &manifest.version).await)
        };

        let mut report = self.finish_removal(Operation::RemoveEnabler, kind, &manifest, &plan, dry_run)?;
        report.callback = outcome;
        Ok(report)
    }

    async fn run_callback(&self, task: CallbackTask, name: &str, version: &str) -> CallbackOutcome {
        let request = CallbackRequest {
            task,
            name: name.to_string(),
            version: version.to_string(),
            root: self.workspace.root().to_path_buf(),
            artifact_dir: self.workspace.absolute(&self.layout.artifact_dir(ArtifactKind::Enabler, name)),
        };

        let outcome = self.callback.try_invoke(&request).await;
        if let CallbackOutcome::Failed(reason) = &outcome {
            tracing::warn!("Enabler {name} {task} task failed: {reason}");
        }
        outcome
    }
}
