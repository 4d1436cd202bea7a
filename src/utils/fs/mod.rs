//! File system utilities for the lifecycle engine
//!
//! - [`dirs`] - directory creation, file copy and empty-directory pruning
//! - [`atomic`] - temp-file-and-rename writes for archives
//! - [`temp`] - [`StagingRoot`], the RAII staging directory
//! - [`paths`] - manifest path normalization and root-relative conversion

pub mod atomic;
pub mod dirs;
pub mod paths;
pub mod temp;

pub use atomic::atomic_write;
pub use dirs::{copy_file, ensure_dir, ensure_parent_dir, prune_empty_dirs, remove_dir_all};
pub use paths::{find_repository_root, join_relative, normalize_entry, to_relative};
pub use temp::StagingRoot;
