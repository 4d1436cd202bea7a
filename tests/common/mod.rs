//! Common test utilities for modsync integration tests
//!
//! A [`TestRepo`] is a temporary repository root plus a sibling directory for
//! git "remotes". Commands run the real `modsync` binary against it.

// Not every test file uses every helper
#![allow(dead_code)]

use anyhow::{Context, Result};
use modsync_cli::manifest::Manifest;
use modsync_cli::test_utils::{ArtifactFixture, TestGit};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// True when a `git` executable is on PATH; git-backed tests skip otherwise.
pub fn git_available() -> bool {
    modsync_cli::git::is_git_installed()
}

/// Temporary repository root with a place for source repositories.
pub struct TestRepo {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    root: PathBuf,
    sources_dir: PathBuf,
}

impl TestRepo {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().join("repo");
        let sources_dir = temp_dir.path().join("sources");
        fs::create_dir_all(&root)?;
        fs::create_dir_all(&sources_dir)?;

        Ok(Self {
            _temp_dir: temp_dir,
            root,
            sources_dir,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a repository-relative path.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Write an artifact fixture into the repository.
    pub fn install(&self, fixture: &ArtifactFixture) -> Result<Manifest> {
        fixture.write_to(&self.root)
    }

    /// Write `modsync.toml` at the repository root.
    pub fn write_config(&self, content: &str) -> Result<()> {
        let path = self.root.join("modsync.toml");
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
    }

    pub fn write_file(&self, relative: &str, content: &str) -> Result<()> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(())
    }

    /// Create an empty git repository under the sources directory.
    pub fn create_source_repo(&self, name: &str) -> Result<TestSourceRepo> {
        let path = self.sources_dir.join(name);
        let git = TestGit::new(&path);
        git.init()?;
        Ok(TestSourceRepo {
            path,
            git,
        })
    }

    /// Run the `modsync` binary with `--root` pointing at this repository.
    pub fn run_modsync(&self, args: &[&str]) -> Result<CommandOutput> {
        let binary = env!("CARGO_BIN_EXE_modsync");
        let output = Command::new(binary)
            .arg("--root")
            .arg(&self.root)
            .args(args)
            .current_dir(&self.root)
            .env_remove("MODSYNC_CONFIG")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .output()
            .context("Failed to run modsync")?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

/// A git repository serving tagged artifact versions.
pub struct TestSourceRepo {
    pub path: PathBuf,
    pub git: TestGit,
}

impl TestSourceRepo {
    /// Write `fixture` into the repository, commit and tag it.
    pub fn publish(&self, fixture: &ArtifactFixture, tag: &str) -> Result<()> {
        fixture.write_to(&self.path)?;
        self.git.commit_and_tag(tag)
    }

    pub fn file_url(&self) -> String {
        self.git.file_url()
    }
}

/// Captured output of one `modsync` run
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success,
            "Command failed with code {:?}\nStdout: {}\nStderr: {}",
            self.code, self.stdout, self.stderr
        );
        self
    }

    pub fn assert_failure(&self) -> &Self {
        assert!(!self.success, "Command unexpectedly succeeded\nStdout: {}", self.stdout);
        assert_eq!(self.code, Some(1), "Stderr: {}", self.stderr);
        self
    }

    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Expected stdout to contain '{text}'\nActual stdout: {}",
            self.stdout
        );
        self
    }

    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "Expected stderr to contain '{text}'\nActual stderr: {}",
            self.stderr
        );
        self
    }
}

/// File assertion helpers
pub struct FileAssert;

impl FileAssert {
    pub fn exists(path: impl AsRef<Path>) {
        let path = path.as_ref();
        assert!(path.exists(), "Expected file to exist: {}", path.display());
    }

    pub fn not_exists(path: impl AsRef<Path>) {
        let path = path.as_ref();
        assert!(!path.exists(), "Expected file to not exist: {}", path.display());
    }

    pub fn contains(path: impl AsRef<Path>, expected: &str) {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()));
        assert!(
            content.contains(expected),
            "Expected {} to contain '{expected}'\nActual: {content}",
            path.display()
        );
    }
}
