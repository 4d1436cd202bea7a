//! Pieces shared by every subcommand.

use crate::config::ProjectConfig;
use crate::core::{ArtifactKind, ModsyncError};
use crate::hooks::CallbackOutcome;
use crate::installer::{Installer, OperationReport, RemoteRequest};
use crate::utils::fs::find_repository_root;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::CliConfig;

/// Repository root and configuration a command runs against.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub root: PathBuf,
    pub config: ProjectConfig,
    /// Print every planned path
    pub verbose: bool,
}

impl CommandContext {
    /// Resolve the root and load the configuration for `cli`.
    pub async fn load(cli: &CliConfig) -> Result<Self> {
        let root = match &cli.root {
            Some(root) => {
                if !root.is_dir() {
                    return Err(ModsyncError::ConfigError {
                        message: format!("Repository root {} is not a directory", root.display()),
                    }
                    .into());
                }
                root.clone()
            }
            None => {
                let cwd = std::env::current_dir().context("Failed to read the current directory")?;
                find_repository_root(&cwd)
            }
        };
        tracing::debug!("Repository root: {}", root.display());

        let config = ProjectConfig::load_with_optional(&root, cli.config_path.clone()).await?;
        Ok(Self {
            root,
            config,
            verbose: cli.verbose,
        })
    }

    /// The production engine for this repository.
    #[must_use]
    pub fn installer(&self) -> Installer {
        Installer::from_config(&self.root, &self.config)
    }
}

/// `--kind` values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum KindArg {
    #[default]
    Module,
    Enabler,
}

impl From<KindArg> for ArtifactKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Module => Self::Module,
            KindArg::Enabler => Self::Enabler,
        }
    }
}

/// Arguments of commands that fetch a tagged version.
#[derive(Args, Debug, Clone)]
pub struct RemoteArgs {
    /// Artifact name (the directory under modules/ or enablers/)
    pub name: String,

    /// Version to fetch; the tag is <tag-prefix><version>
    #[arg(long)]
    pub version: String,

    /// Git repository URL (default: source.git of the installed manifest)
    #[arg(long, value_name = "URL")]
    pub git: Option<String>,

    /// Tag prefix (default: source.tagPrefix of the installed manifest, else "v")
    #[arg(long, value_name = "PREFIX")]
    pub tag_prefix: Option<String>,

    /// Show the planned deletions and copies without changing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl RemoteArgs {
    #[must_use]
    pub fn request(&self) -> RemoteRequest {
        let mut request = RemoteRequest::new(&self.name, &self.version).dry_run(self.dry_run);
        if let Some(git) = &self.git {
            request = request.with_git(git);
        }
        if let Some(prefix) = &self.tag_prefix {
            request = request.with_tag_prefix(prefix);
        }
        request
    }
}

/// Print an operation report to stdout.
///
/// The summary line always prints. Paths print for dry runs and in verbose mode.
pub fn print_report(report: &OperationReport, verbose: bool) {
    let summary = report.summary();
    if report.dry_run {
        println!("{}", summary.yellow());
    } else {
        println!("{} {}", "✓".green(), summary);
    }

    if report.dry_run || verbose {
        for path in &report.deleted {
            println!("  {} {path}", "-".red());
        }
        for path in &report.copied {
            println!("  {} {path}", "+".green());
        }
    }

    if let Some(archive) = &report.archive {
        println!("  archive: {}", archive.path);
        println!("  sha256:  {}", archive.digest.dimmed());
    }

    match &report.callback {
        Some(CallbackOutcome::Invoked) => println!("  callback: {}", "ran".green()),
        Some(CallbackOutcome::Skipped) => println!("  callback: {}", "no task file".dimmed()),
        Some(CallbackOutcome::Failed(reason)) => {
            println!("  callback: {} ({reason})", "failed".yellow());
        }
        None => {}
    }
}
