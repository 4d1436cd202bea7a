//! `modsync clone`: install a module from a tagged git repository.

use super::common::{CommandContext, print_report};
use crate::installer::RemoteRequest;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct CloneCommand {
    /// Module name; modules/<name> must not exist yet
    name: String,

    /// Version to fetch; the tag is <tag-prefix><version>
    #[arg(long)]
    version: String,

    /// Git repository URL
    #[arg(long, value_name = "URL")]
    git: String,

    /// Tag prefix (default: "v")
    #[arg(long, value_name = "PREFIX")]
    tag_prefix: Option<String>,

    /// Show the planned copies without changing anything
    #[arg(long)]
    dry_run: bool,
}

impl CloneCommand {
    fn request(&self) -> RemoteRequest {
        let request = RemoteRequest::new(&self.name, &self.version)
            .with_git(&self.git)
            .dry_run(self.dry_run);
        match &self.tag_prefix {
            Some(prefix) => request.with_tag_prefix(prefix),
            None => request,
        }
    }

    pub async fn execute(self, context: &CommandContext) -> Result<()> {
        let report = context.installer().clone_module(&self.request()).await?;
        print_report(&report, context.verbose);
        Ok(())
    }
}
