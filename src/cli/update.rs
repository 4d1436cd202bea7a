//! `modsync update`: move an installed module to another tagged version.

use super::common::{CommandContext, RemoteArgs, print_report};
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct UpdateCommand {
    #[command(flatten)]
    remote: RemoteArgs,
}

impl UpdateCommand {
    pub async fn execute(self, context: &CommandContext) -> Result<()> {
        let report = context.installer().update_module(&self.remote.request()).await?;
        print_report(&report, context.verbose);
        Ok(())
    }
}
