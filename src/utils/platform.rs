//! Platform-specific helpers.
//!
//! Only the pieces the lifecycle engine needs: locating the git executable,
//! probing for commands on PATH, and Windows long-path handling.

use std::path::{Path, PathBuf};

/// Returns true when compiled for Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Platform-appropriate name of the git executable.
#[must_use]
pub const fn get_git_command() -> &'static str {
    if is_windows() {
        "git.exe"
    } else {
        "git"
    }
}

/// Check whether a command can be found on PATH.
#[must_use]
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Prefix paths longer than `MAX_PATH` with `\\?\` so Win32 APIs accept them.
#[cfg(windows)]
pub fn windows_long_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    if path_str.len() > 260 && !path_str.starts_with(r"\\?\") {
        let absolute_path = if path.is_relative() {
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(path)
        } else {
            path.to_path_buf()
        };

        let absolute_str = absolute_path.to_string_lossy();
        if absolute_str.len() > 260 {
            if let Some(stripped) = absolute_str.strip_prefix(r"\\") {
                PathBuf::from(format!(r"\\?\UNC\{}", stripped))
            } else {
                PathBuf::from(format!(r"\\?\{}", absolute_str))
            }
        } else {
            absolute_path
        }
    } else {
        path.to_path_buf()
    }
}

/// No-op outside Windows.
#[cfg(not(windows))]
#[must_use]
pub fn windows_long_path(path: &Path) -> PathBuf {
    path.to_path_buf()
}
