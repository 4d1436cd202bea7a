//! Repository-relative path handling.
//!
//! Manifest paths are stored as forward-slash strings relative to a root. These
//! helpers normalize separators, reject entries that could escape the root, and
//! convert between the string form and native paths.

use anyhow::Result;
use std::path::{Component, Path, PathBuf};

/// Normalize a declared manifest path.
///
/// Backslashes become `/` and a leading `./` is dropped. The result is rejected
/// when it is empty, absolute, carries a trailing separator, or contains `.`/`..`
/// segments.
///
/// # Examples
///
/// ```rust
/// use modsync_cli::utils::fs::normalize_entry;
///
/// assert_eq!(normalize_entry(r"modules\sample\run.ps1").unwrap(), "modules/sample/run.ps1");
/// assert!(normalize_entry("modules/sample/").is_err());
/// assert!(normalize_entry("../outside").is_err());
/// ```
pub fn normalize_entry(raw: &str) -> Result<String> {
    let mut path = raw.trim().replace('\\', "/");
    while let Some(stripped) = path.strip_prefix("./") {
        path = stripped.to_string();
    }

    if path.is_empty() {
        anyhow::bail!("path is empty");
    }
    if path.ends_with('/') {
        anyhow::bail!("path '{raw}' must not end with a separator");
    }
    if path.starts_with('/') || Path::new(&path).is_absolute() || has_drive_prefix(&path) {
        anyhow::bail!("path '{raw}' must be relative to the repository root");
    }
    if path.split('/').any(|segment| segment.is_empty() || segment == "." || segment == "..") {
        anyhow::bail!("path '{raw}' must not contain empty, '.' or '..' segments");
    }

    Ok(path)
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Join a forward-slash relative path onto a native root.
#[must_use]
pub fn join_relative(root: &Path, relative: &str) -> PathBuf {
    relative.split('/').filter(|s| !s.is_empty()).fold(root.to_path_buf(), |acc, s| acc.join(s))
}

/// Express `path` relative to `root` with forward slashes.
///
/// Returns `None` when `path` is not beneath `root`.
#[must_use]
pub fn to_relative(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Find the repository root for `start`.
///
/// Walks up from `start` to the nearest directory containing `modsync.toml`
/// or `.git`; falls back to `start` itself.
#[must_use]
pub fn find_repository_root(start: &Path) -> PathBuf {
    let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());
    let mut current = start.clone();

    loop {
        if current.join(crate::constants::CONFIG_FILE).exists() || current.join(".git").exists() {
            return current;
        }
        if !current.pop() {
            return start;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_normalize_entry_accepts_and_rewrites() {
        assert_eq!(normalize_entry("modules/sample/a.ps1").unwrap(), "modules/sample/a.ps1");
        assert_eq!(normalize_entry("./modules/sample").unwrap(), "modules/sample");
        assert_eq!(normalize_entry(r"modules\sample\a.ps1").unwrap(), "modules/sample/a.ps1");
    }

    #[test]
    fn test_normalize_entry_rejects() {
        assert!(normalize_entry("").is_err());
        assert!(normalize_entry("modules/sample/").is_err());
        assert!(normalize_entry("/etc/passwd").is_err());
        assert!(normalize_entry("C:/Windows").is_err());
        assert!(normalize_entry("modules/../secrets").is_err());
        assert!(normalize_entry("modules//sample").is_err());
    }

    #[test]
    fn test_join_and_relative_roundtrip() {
        let root = Path::new("/repo");
        let joined = join_relative(root, "modules/sample/a.ps1");
        assert_eq!(joined, Path::new("/repo").join("modules").join("sample").join("a.ps1"));
        assert_eq!(to_relative(root, &joined).as_deref(), Some("modules/sample/a.ps1"));
        assert_eq!(to_relative(root, Path::new("/elsewhere/a")), None);
    }

    #[test]
    fn test_find_repository_root() {
        let temp = tempdir().unwrap();
        let project = temp.path().join("project");
        let nested = project.join("modules").join("sample");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(project.join("modsync.toml"), "").unwrap();

        let root = find_repository_root(&nested);
        assert_eq!(root, project.canonicalize().unwrap());
    }
}
