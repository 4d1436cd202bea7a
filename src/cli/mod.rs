//! Command-line interface for modsync.
//!
//! Every subcommand lives in its own module and follows the same shape: a
//! `clap` `Args` struct plus an `execute` method that receives a
//! [`CommandContext`] (the resolved repository root and project configuration)
//! and drives the [`Installer`](crate::installer::Installer).
//!
//! # Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `pack` | Write `dist/<name>/<name>.<version>.zip` from an installed artifact |
//! | `unpack` | Restore an artifact from its archive in `dist/` |
//! | `clone` | Install a module from a git tag |
//! | `update` | Replace an installed module with another tagged version |
//! | `remove` | Delete an installed module's files |
//! | `enabler` | `install`, `upgrade` and `remove` enablers, running their tasks |
//! | `validate` | Check an installed manifest and print its resolved file set |
//! | `list` | Show installed modules and enablers |
//!
//! # Global options
//!
//! - `--root <path>`: repository root (default: nearest ancestor with
//!   `modsync.toml` or `.git`)
//! - `--config <path>`: configuration file (default: `MODSYNC_CONFIG`, then
//!   `<root>/modsync.toml`)
//! - `--verbose` / `--quiet`: log verbosity; `RUST_LOG` takes precedence
//!
//! # Example
//!
//! ```bash
//! modsync clone sample --version 0.3.0 --git https://example.com/sample.git
//! modsync update sample --version 0.4.0 --dry-run
//! modsync enabler install lint --version 1.0.0 --git https://example.com/lint.git
//! ```

mod clone;
mod common;
mod enabler;
mod list;
mod pack;
mod remove;
mod unpack;
mod update;
mod validate;


pub use common::{CommandContext, KindArg};

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Settings derived from the global flags.
///
/// Separated from [`Cli`] so tests can execute commands against an explicit
/// root without touching the process environment or the global subscriber.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is unset; `None` disables logging
    pub log_level: Option<String>,
    /// Explicit repository root
    pub root: Option<PathBuf>,
    /// Explicit configuration file
    pub config_path: Option<PathBuf>,
    /// Print every planned path, not only the summary
    pub verbose: bool,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    #[must_use]
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// `RUST_LOG` wins over the configured level. Calling this twice is harmless.
    pub fn init_logging(&self) {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => match &self.log_level {
                Some(level) => EnvFilter::new(level),
                None => return,
            },
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Manifest-driven lifecycle manager for modules and enablers.
#[derive(Parser)]
#[command(
    name = "modsync",
    about = "Pack, unpack, clone, update and remove manifest-described modules and enablers",
    version,
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Repository root (default: nearest ancestor containing modsync.toml or .git)
    #[arg(long, global = true, value_name = "PATH")]
    root: Option<PathBuf>,

    /// Configuration file (default: $MODSYNC_CONFIG, then <root>/modsync.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Debug logging and per-file output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Disable logging
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack an installed module or enabler into dist/<name>/<name>.<version>.zip
    Pack(pack::PackCommand),

    /// Restore a module or enabler from its archive in dist/
    Unpack(unpack::UnpackCommand),

    /// Install a module from a tagged git repository
    Clone(clone::CloneCommand),

    /// Replace an installed module with another tagged version
    Update(update::UpdateCommand),

    /// Delete the files of an installed module
    Remove(remove::RemoveCommand),

    /// Install, upgrade or remove enablers
    Enabler(enabler::EnablerCommand),

    /// Validate an installed manifest and print its file set
    Validate(validate::ValidateCommand),

    /// List installed modules and enablers
    List(list::ListCommand),
}

impl Cli {
    /// Execute the parsed command with logging initialized from the flags.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.quiet {
            None
        } else if self.verbose {
            Some("debug".to_string())
        } else {
            Some("warn".to_string())
        };

        CliConfig {
            log_level,
            root: self.root.clone(),
            config_path: self.config.clone(),
            verbose: self.verbose,
        }
    }

    /// Execute the parsed command with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        let context = CommandContext::load(&config).await?;

        match self.command {
            Commands::Pack(cmd) => cmd.execute(&context).await,
            Commands::Unpack(cmd) => cmd.execute(&context).await,
            Commands::Clone(cmd) => cmd.execute(&context).await,
            Commands::Update(cmd) => cmd.execute(&context).await,
            Commands::Remove(cmd) => cmd.execute(&context).await,
            Commands::Enabler(cmd) => cmd.execute(&context).await,
            Commands::Validate(cmd) => cmd.execute(&context),
            Commands::List(cmd) => cmd.execute(&context),
        }
    }
}
