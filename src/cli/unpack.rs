//! `modsync unpack`: restore an artifact from its archive.

use super::common::{CommandContext, KindArg, print_report};
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct UnpackCommand {
    /// Artifact name
    name: String,

    /// Version to restore
    #[arg(long)]
    version: String,

    /// Artifact kind
    #[arg(long, value_enum, default_value_t = KindArg::Module)]
    kind: KindArg,
}

impl UnpackCommand {
    pub async fn execute(self, context: &CommandContext) -> Result<()> {
        let report = context.installer().unpack(self.kind.into(), &self.name, &self.version).await?;
        print_report(&report, context.verbose);
        Ok(())
    }
}
