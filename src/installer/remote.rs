//! clone, update and remove.

use super::report::{Operation, OperationReport};
use super::sources::copy_steps;
use super::{Installer, Plan, RemoteRequest, check_name, searched_in};
use crate::core::{ArtifactKind, ModsyncError};
use crate::hooks::Callback;
use crate::manifest::{Manifest, check_version, locate};
use crate::resolver::resolve_installed;
use crate::source::{Fetcher, RemoteReference};
use crate::utils::fs::StagingRoot;
use crate::workspace::Workspace;
use anyhow::Result;

impl<W: Workspace, F: Fetcher, C: Callback> Installer<W, F, C> {
    /// Clone a module that is not installed yet.
    pub async fn clone_module(&self, request: &RemoteRequest) -> Result<OperationReport> {
        let (report, _) = self.clone_artifact(ArtifactKind::Module, request).await?;
        Ok(report)
    }

    /// Replace an installed module with another version.
    pub async fn update_module(&self, request: &RemoteRequest) -> Result<OperationReport> {
        self.update_artifact(ArtifactKind::Module, request).await
    }

    /// Delete an installed module's files.
    pub async fn remove_module(&self, name: &str, dry_run: bool) -> Result<OperationReport> {
        let (plan, manifest) = self.removal_plan(ArtifactKind::Module, name)?;
        self.finish_removal(Operation::Remove, ArtifactKind::Module, &manifest, &plan, dry_run)
    }

    pub(super) async fn clone_artifact(
        &self,
        kind: ArtifactKind,
        request: &RemoteRequest,
    ) -> Result<(OperationReport, Manifest)> {
        check_name(&request.name)?;
        check_version(&request.version)?;
        let dir = self.layout.artifact_dir(kind, &request.name);
        if self.workspace.exists(&dir) {
            return Err(ModsyncError::PreconditionFailed {
                reason: format!("{kind} directory {dir} already exists; use update instead"),
            }
            .into());
        }
        let url = request.git.clone().ok_or_else(|| ModsyncError::NoGitSource {
            name: request.name.clone(),
        })?;

        let reference = RemoteReference::new(url, &request.version)
            .with_tag_prefix(request.tag_prefix.clone());
        let (staging, manifest) = self.fetch_manifest(kind, request, &reference).await?;

        let steps = copy_steps(&manifest, staging.path(), None)?;
        let plan = Plan::new(None).with_copies(steps);
        self.check_own_path(kind, &request.name, &plan.destinations());

        let operation = match kind {
            ArtifactKind::Module => Operation::Clone,
            ArtifactKind::Enabler => Operation::InstallEnabler,
        };
        let report = self.finish(operation, kind, request, &plan)?;
        Ok((report, manifest))
    }

    pub(super) async fn update_artifact(
        &self,
        kind: ArtifactKind,
        request: &RemoteRequest,
    ) -> Result<OperationReport> {
        let (installed, _) = self.load_local(kind, &request.name)?;
        check_version(&request.version)?;
        let url = request
            .git
            .clone()
            .or_else(|| installed.git_url().map(String::from))
            .ok_or_else(|| ModsyncError::NoGitSource {
                name: request.name.clone(),
            })?;
        let prefix = request
            .tag_prefix
            .clone()
            .or_else(|| installed.source.as_ref().and_then(|s| s.tag_prefix.clone()));
        tracing::info!(
            "Updating {kind} {} from {} to {}",
            request.name,
            installed.version,
            request.version
        );

        let reference = RemoteReference::new(url, &request.version).with_tag_prefix(prefix);
        let (staging, manifest) = self.fetch_manifest(kind, request, &reference).await?;

        let steps = copy_steps(&manifest, staging.path(), None)?;
        let old = resolve_installed(&installed, self.workspace.root())?;
        let plan = Plan::new(Some(self.layout.artifact_dir(kind, &request.name)))
            .with_deletes(old.to_vec())
            .with_copies(steps);
        self.check_own_path(kind, &request.name, &plan.destinations());

        let operation = match kind {
            ArtifactKind::Module => Operation::Update,
            ArtifactKind::Enabler => Operation::UpgradeEnabler,
        };
        self.finish(operation, kind, request, &plan)
    }

    /// Fetch `reference` and locate the requested manifest inside the checkout.
    ///
    /// The located manifest must carry exactly the requested name, so its files
    /// land in the directory the caller checked.
    async fn fetch_manifest(
        &self,
        kind: ArtifactKind,
        request: &RemoteRequest,
        reference: &RemoteReference,
    ) -> Result<(StagingRoot, Manifest)> {
        let staging = self.fetcher.fetch(reference).await?;
        let located = locate(staging.path(), kind, &request.name, &request.version)
            .map_err(|e| searched_in(e, reference.to_string()))?;
        located.manifest.validate_fields()?;
        if located.manifest.name != request.name {
            return Err(ModsyncError::PreconditionFailed {
                reason: format!(
                    "{reference} declares {kind} '{}', not '{}'",
                    located.manifest.name, request.name
                ),
            }
            .into());
        }
        tracing::debug!(
            "Using {} from {reference}",
            located.relative_path().unwrap_or_else(|| located.path.display().to_string())
        );
        Ok((staging, located.manifest))
    }

    /// Apply `plan` unless this is a dry run, and report.
    fn finish(
        &self,
        operation: Operation,
        kind: ArtifactKind,
        request: &RemoteRequest,
        plan: &Plan,
    ) -> Result<OperationReport> {
        let mut report = OperationReport::new(operation, kind, &request.name, &request.version);
        if request.dry_run {
            plan.validate()?;
            report.dry_run = true;
            report.deleted = plan.deletes().to_vec();
            report.copied = plan.destinations();
            return Ok(report);
        }

        let applied = plan.apply(&self.workspace)?;
        report.deleted = applied.deleted;
        report.copied = applied.copied;
        tracing::info!("{}", report.summary());
        Ok(report)
    }

    pub(super) fn removal_plan(&self, kind: ArtifactKind, name: &str) -> Result<(Plan, Manifest)> {
        let (manifest, relative) = match self.load_local(kind, name) {
            Ok(found) => found,
            Err(e) => {
                if let Some(ModsyncError::LocalManifestNotFound {
                    path,
                    ..
                }) = e.downcast_ref::<ModsyncError>()
                {
                    return Err(ModsyncError::PreconditionFailed {
                        reason: format!("{kind} '{name}' is not installed (no manifest at {path})"),
                    }
                    .into());
                }
                return Err(e);
            }
        };
        tracing::debug!("Removing {kind} {name} declared by {relative}");

        let installed = resolve_installed(&manifest, self.workspace.root())?;
        let plan = Plan::new(Some(self.layout.artifact_dir(kind, name))).with_deletes(installed.to_vec());
        Ok((plan, manifest))
    }

    pub(super) fn finish_removal(
        &self,
        operation: Operation,
        kind: ArtifactKind,
        manifest: &Manifest,
        plan: &Plan,
        dry_run: bool,
    ) -> Result<OperationReport> {
        let request = RemoteRequest::new(&manifest.name, &manifest.version).dry_run(dry_run);
        self.finish(operation, kind, &request, plan)
    }
}
