//! pack and unpack.

use super::report::{ArchiveSummary, Operation, OperationReport};
use super::sources::copy_steps;
use super::{Installer, Plan, check_name, searched_in};
use crate::archive;
use crate::core::{ArtifactKind, ModsyncError};
use crate::hooks::Callback;
use crate::manifest::{check_version, locate};
use crate::resolver::resolve;
use crate::source::Fetcher;
use crate::workspace::Workspace;
use anyhow::Result;

impl<W: Workspace, F: Fetcher, C: Callback> Installer<W, F, C> {
    /// Pack the installed artifact into `dist/<name>/<name>.<version>.zip`.
    ///
    /// When `version` is given it must equal the manifest's version. Legacy
    /// `Module.zip` and `Module.<version>.zip` archives are deleted first and an
    /// existing archive for the same version is overwritten.
    pub async fn pack(
        &self,
        kind: ArtifactKind,
        name: &str,
        version: Option<&str>,
    ) -> Result<OperationReport> {
        let (manifest, _) = self.load_local(kind, name)?;
        check_version(&manifest.version)?;
        if let Some(requested) = version
            && requested != manifest.version
        {
            return Err(ModsyncError::VersionMismatch {
                name: name.to_string(),
                requested: requested.to_string(),
                declared: manifest.version.clone(),
            }
            .into());
        }

        let set = resolve(&manifest, self.workspace.root())?;
        self.check_own_path(kind, name, &set.to_vec());
        let bytes = archive::pack(&set)?;

        let dist = self.layout.dist_dir(name);
        let mut report = OperationReport::new(Operation::Pack, kind, name, &manifest.version);
        for legacy in archive::legacy_file_names(&manifest.version) {
            let relative = format!("{dist}/{legacy}");
            if self.workspace.delete(&relative)? {
                tracing::info!("Deleted legacy archive {relative}");
                report.deleted.push(relative);
            }
        }

        let relative = format!("{dist}/{}", archive::archive_file_name(name, &manifest.version));
        self.workspace.write_file(&relative, &bytes)?;
        let digest = archive::digest(&bytes);
        tracing::info!("Packed {name}@{} into {relative} (sha256 {digest})", manifest.version);

        report.copied = set.to_vec();
        report.archive = Some(ArchiveSummary {
            path: relative,
            digest,
            entries: set.len(),
        });
        Ok(report)
    }

    /// Unpack `dist/<name>/<name>.<version>.zip` (or a legacy archive) into the workspace.
    pub async fn unpack(
        &self,
        kind: ArtifactKind,
        name: &str,
        version: &str,
    ) -> Result<OperationReport> {
        check_name(name)?;
        check_version(version)?;
        let dist = self.layout.dist_dir(name);
        let relative = archive::archive_candidates(name, version)
            .into_iter()
            .map(|candidate| format!("{dist}/{candidate}"))
            .find(|candidate| self.workspace.exists(candidate))
            .ok_or_else(|| ModsyncError::ArchiveNotFound {
                name: name.to_string(),
                version: version.to_string(),
                dist: dist.clone(),
            })?;
        tracing::debug!("Unpacking {relative}");

        let bytes = self.workspace.read(&relative)?;
        let staging = archive::unpack(&bytes)?;

        let located =
            locate(staging.path(), kind, name, version).map_err(|e| searched_in(e, relative.clone()))?;
        located.manifest.validate_fields()?;

        let steps = copy_steps(&located.manifest, staging.path(), Some(staging.path()))?;
        let plan = Plan::new(None).with_copies(steps);
        self.check_own_path(kind, name, &plan.destinations());

        let applied = plan.apply(&self.workspace)?;
        let mut report = OperationReport::new(Operation::Unpack, kind, name, version);
        report.copied = applied.copied;
        tracing::info!("Unpacked {name}@{version} from {relative}");
        Ok(report)
    }
}
