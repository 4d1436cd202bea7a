//! Directory creation, copying, and pruning helpers.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Ensure a directory exists, creating it and any missing parents.
///
/// Fails if the path exists but is not a directory.
pub fn ensure_dir(path: &Path) -> Result<()> {
    let safe_path = crate::utils::platform::windows_long_path(path);

    if !safe_path.exists() {
        fs::create_dir_all(&safe_path).with_context(|| {
            let platform_help = if crate::utils::platform::is_windows() {
                "On Windows: Check that the path length is < 260 chars or that long path support is enabled"
            } else {
                "Check directory permissions and path validity"
            };

            format!("Failed to create directory: {}\n\n{}", path.display(), platform_help)
        })?;
    } else if !safe_path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    Ok(())
}

/// Copy a single file, creating the destination's parent directories.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    ensure_parent_dir(dst)?;
    fs::copy(src, dst).with_context(|| {
        format!("Failed to copy file from {} to {}", src.display(), dst.display())
    })?;
    Ok(())
}

/// Remove a directory tree if it exists.
pub fn remove_dir_all(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove directory: {}", path.display()))?;
    }
    Ok(())
}

/// Remove empty directories beneath `dir` bottom-up, then `dir` itself if it ended up empty.
///
/// Returns true when `dir` was removed. Non-empty directories are left alone.
pub fn prune_empty_dirs(dir: &Path) -> Result<bool> {
    if !dir.is_dir() {
        return Ok(false);
    }

    for entry in
        fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            prune_empty_dirs(&entry.path())?;
        }
    }

    let is_empty = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .next()
        .is_none();
    if is_empty {
        fs::remove_dir(dir)
            .with_context(|| format!("Failed to remove empty directory: {}", dir.display()))?;
        tracing::debug!("Pruned empty directory {}", dir.display());
    }
    Ok(is_empty)
}
