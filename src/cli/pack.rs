//! `modsync pack`: archive an installed artifact into `dist/`.

use super::common::{CommandContext, KindArg, print_report};
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct PackCommand {
    /// Artifact name
    name: String,

    /// Expected version; packing fails when the manifest declares another
    #[arg(long)]
    version: Option<String>,

    /// Artifact kind
    #[arg(long, value_enum, default_value_t = KindArg::Module)]
    kind: KindArg,
}

impl PackCommand {
    pub async fn execute(self, context: &CommandContext) -> Result<()> {
        let report = context
            .installer()
            .pack(self.kind.into(), &self.name, self.version.as_deref())
            .await?;
        print_report(&report, context.verbose);
        Ok(())
    }
}
