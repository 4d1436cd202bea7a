//! `modsync enabler`: enabler lifecycle with callbacks.
//!
//! `install` and `upgrade` run the enabler's task after its files are in
//! place; `remove` runs it before they are deleted. A failing task is reported
//! but does not fail the command.

use super::common::{CommandContext, RemoteArgs, print_report};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct EnablerCommand {
    #[command(subcommand)]
    action: EnablerAction,
}

#[derive(Subcommand, Debug)]
enum EnablerAction {
    /// Clone an enabler (with --git) or run the install task of a present one
    Install(RemoteArgs),

    /// Replace an installed enabler with another tagged version
    Upgrade(RemoteArgs),

    /// Run the remove task, then delete the enabler's files
    Remove {
        /// Enabler name
        name: String,

        /// Show the planned deletions without changing anything
        #[arg(long)]
        dry_run: bool,
    },
}

impl EnablerCommand {
    pub async fn execute(self, context: &CommandContext) -> Result<()> {
        let installer = context.installer();
        let report = match self.action {
            EnablerAction::Install(args) => installer.install_enabler(&args.request()).await?,
            EnablerAction::Upgrade(args) => installer.upgrade_enabler(&args.request()).await?,
            EnablerAction::Remove { name, dry_run } => installer.remove_enabler(&name, dry_run).await?,
        };
        print_report(&report, context.verbose);
        Ok(())
    }
}
