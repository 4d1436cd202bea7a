//! Integration test suite for modsync
//!
//! End-to-end tests that run the `modsync` binary against temporary
//! repositories. Git-backed tests serve tags from local repositories through
//! `file://` URLs and are skipped when git is not installed.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: argument handling, output formats and error reporting
//! - **clone_update**: clone and update from tagged git repositories
//! - **enabler**: enabler install, upgrade and remove with task callbacks
//! - **pack_unpack**: archive creation, determinism and restore
//! - **remove**: module removal and pruning

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod cli;
mod clone_update;
mod enabler;
mod pack_unpack;
mod remove;
