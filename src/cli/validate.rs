//! `modsync validate`: check an installed manifest.
//!
//! Rule violations are printed together and the command exits non-zero when
//! there is at least one. With `--json` the report goes to stdout as JSON
//! either way.

use super::common::{CommandContext, KindArg};
use crate::installer::ValidationReport;
use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Artifact name
    name: String,

    /// Artifact kind
    #[arg(long, value_enum, default_value_t = KindArg::Module)]
    kind: KindArg,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl ValidateCommand {
    pub fn execute(self, context: &CommandContext) -> Result<()> {
        let report = context.installer().validate(self.kind.into(), &self.name)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_text(&report);
        }

        if !report.valid {
            bail!(
                "{} '{}' has {} validation error(s)",
                report.kind,
                report.name,
                report.errors.len()
            );
        }
        Ok(())
    }
}

fn print_text(report: &ValidationReport) {
    if report.valid {
        println!(
            "{} {} {}@{} ({} files)",
            "✓".green(),
            report.kind,
            report.name,
            report.version,
            report.files.len()
        );
        for file in &report.files {
            println!("  {file}");
        }
    } else {
        println!("{} {} {}@{}", "✗".red(), report.kind, report.name, report.version);
        for error in &report.errors {
            println!("  {} {error}", "-".red());
        }
    }
}
