//! Git test helper utilities
//!
//! Builds local repositories with tagged commits so fetch paths can be tested
//! against `file://` URLs without network access.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git command wrapper for tests.
pub struct TestGit {
    repo_path: PathBuf,
}

impl TestGit {
    fn run_git_command(&self, args: &[&str], action: &str) -> Result<std::process::Output> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .with_context(|| action.to_string())?;

        if !output.status.success() {
            bail!("{} failed: {}", action, String::from_utf8_lossy(&output.stderr));
        }

        Ok(output)
    }

    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }

    /// Initialize a repository with a committer identity configured.
    pub fn init(&self) -> Result<()> {
        std::fs::create_dir_all(&self.repo_path)?;
        self.run_git_command(&["init", "--quiet"], "Failed to initialize git repository")?;
        self.run_git_command(
            &["config", "user.email", "test@modsync.example"],
            "Failed to configure git user email",
        )?;
        self.run_git_command(&["config", "user.name", "Test User"], "Failed to configure git user name")?;
        self.run_git_command(&["config", "commit.gpgsign", "false"], "Failed to disable signing")?;
        Ok(())
    }

    pub fn add_all(&self) -> Result<()> {
        self.run_git_command(&["add", "--all", "."], "Failed to add files to git")?;
        Ok(())
    }

    pub fn commit(&self, message: &str) -> Result<()> {
        self.run_git_command(
            &["commit", "--quiet", "--allow-empty", "-m", message],
            "Failed to create git commit",
        )?;
        Ok(())
    }

    pub fn tag(&self, tag_name: &str) -> Result<()> {
        self.run_git_command(&["tag", tag_name], &format!("Failed to create tag: {tag_name}"))?;
        Ok(())
    }

    /// Stage everything, commit and tag in one step.
    pub fn commit_and_tag(&self, tag_name: &str) -> Result<()> {
        self.add_all()?;
        self.commit(&format!("Release {tag_name}"))?;
        self.tag(tag_name)
    }

    /// Remove a file from the working tree (and the index on the next `add_all`).
    pub fn remove_file(&self, relative: &str) -> Result<()> {
        std::fs::remove_file(self.repo_path.join(relative))
            .with_context(|| format!("Failed to remove {relative}"))
    }

    #[must_use]
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// `file://` URL of the repository.
    #[must_use]
    pub fn file_url(&self) -> String {
        let path = self.repo_path.display().to_string().replace('\\', "/");
        if path.starts_with('/') {
            format!("file://{path}")
        } else {
            format!("file:///{path}")
        }
    }
}
