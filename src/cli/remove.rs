//! `modsync remove`: delete an installed module.

use super::common::{CommandContext, print_report};
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct RemoveCommand {
    /// Module name
    name: String,

    /// Show the planned deletions without changing anything
    #[arg(long)]
    dry_run: bool,
}

impl RemoveCommand {
    pub async fn execute(self, context: &CommandContext) -> Result<()> {
        let report = context.installer().remove_module(&self.name, self.dry_run).await?;
        print_report(&report, context.verbose);
        Ok(())
    }
}
