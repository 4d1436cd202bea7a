//! The repository working tree as an explicit capability.
//!
//! Every lifecycle operation reads and mutates the repository only through a
//! [`Workspace`], never through ambient paths. [`FsWorkspace`] is the real
//! implementation; tests wrap it to observe or fail individual primitives.
//!
//! All paths are root-relative and forward-slash, exactly as they appear in a
//! manifest's `include` list.

use crate::utils::fs::{atomic_write, copy_file, join_relative, prune_empty_dirs};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Read, write and delete primitives over one repository root.
pub trait Workspace {
    /// Absolute repository root.
    fn root(&self) -> &Path;

    /// Absolute location of a root-relative path.
    fn absolute(&self, relative: &str) -> PathBuf {
        join_relative(self.root(), relative)
    }

    /// True when `relative` names an existing file or directory.
    fn exists(&self, relative: &str) -> bool {
        self.absolute(relative).exists()
    }

    /// Read a file's bytes.
    fn read(&self, relative: &str) -> Result<Vec<u8>> {
        let path = self.absolute(relative);
        std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    /// Write `bytes` to `relative`, creating parent directories.
    fn write_file(&self, relative: &str, bytes: &[u8]) -> Result<()>;

    /// Copy the file at absolute `source` to `relative`, creating parent directories.
    fn copy_in(&self, source: &Path, relative: &str) -> Result<()>;

    /// Delete the file at `relative`. Returns false when it was already absent.
    fn delete(&self, relative: &str) -> Result<bool>;

    /// Remove empty directories beneath `relative`, then `relative` itself if empty.
    fn prune_empty(&self, relative: &str) -> Result<bool>;
}

/// A [`Workspace`] backed by the local filesystem.
#[derive(Debug, Clone)]
pub struct FsWorkspace {
    root: PathBuf,
}

impl FsWorkspace {
    /// Create a workspace rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }
}

impl Workspace for FsWorkspace {
    fn root(&self) -> &Path {
        &self.root
    }

    fn write_file(&self, relative: &str, bytes: &[u8]) -> Result<()> {
        let path = self.absolute(relative);
        atomic_write(&path, bytes)?;
        tracing::debug!("Wrote {relative} ({} bytes)", bytes.len());
        Ok(())
    }

    fn copy_in(&self, source: &Path, relative: &str) -> Result<()> {
        copy_file(source, &self.absolute(relative))?;
        tracing::debug!("Copied {relative}");
        Ok(())
    }

    fn delete(&self, relative: &str) -> Result<bool> {
        let path = self.absolute(relative);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!("Deleted {relative}");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to delete {}", path.display())),
        }
    }

    fn prune_empty(&self, relative: &str) -> Result<bool> {
        prune_empty_dirs(&self.absolute(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_copy_delete() {
        let temp = tempdir().unwrap();
        let workspace = FsWorkspace::new(temp.path());

        workspace.write_file("dist/sample/sample.1.0.0.zip", b"zip").unwrap();
        assert!(workspace.exists("dist/sample/sample.1.0.0.zip"));
        assert_eq!(workspace.read("dist/sample/sample.1.0.0.zip").unwrap(), b"zip");

        let source = temp.path().join("source.txt");
        std::fs::write(&source, "hello").unwrap();
        workspace.copy_in(&source, "modules/sample/nested/copy.txt").unwrap();
        assert_eq!(std::fs::read_to_string(temp.path().join("modules/sample/nested/copy.txt")).unwrap(), "hello");

        assert!(workspace.delete("modules/sample/nested/copy.txt").unwrap());
        assert!(!workspace.delete("modules/sample/nested/copy.txt").unwrap());
    }

    #[test]
    fn test_prune_keeps_directories_with_files() {
        let temp = tempdir().unwrap();
        let workspace = FsWorkspace::new(temp.path());
        std::fs::create_dir_all(temp.path().join("modules/sample/empty/deeper")).unwrap();
        std::fs::write(temp.path().join("modules/sample/local.settings.json"), "{}").unwrap();

        assert!(!workspace.prune_empty("modules/sample").unwrap());
        assert!(!workspace.exists("modules/sample/empty"));
        assert!(workspace.exists("modules/sample/local.settings.json"));

        workspace.delete("modules/sample/local.settings.json").unwrap();
        assert!(workspace.prune_empty("modules/sample").unwrap());
        assert!(!workspace.exists("modules/sample"));
        assert!(workspace.exists("modules"));
    }
}
