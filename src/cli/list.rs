//! `modsync list`: installed modules and enablers.

use super::common::CommandContext;
use crate::installer::InstalledArtifact;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ListFormat {
    /// Aligned columns
    #[default]
    Table,
    /// JSON array
    Json,
}

#[derive(Args, Debug)]
pub struct ListCommand {
    /// Output format
    #[arg(long, value_enum, default_value_t = ListFormat::Table)]
    format: ListFormat,
}

impl ListCommand {
    pub fn execute(self, context: &CommandContext) -> Result<()> {
        let rows = context.installer().list()?;
        match self.format {
            ListFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
            ListFormat::Table => print_table(&rows),
        }
        Ok(())
    }
}

fn print_table(rows: &[InstalledArtifact]) {
    if rows.is_empty() {
        println!("No modules or enablers installed.");
        return;
    }

    let name_width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0).max(4);
    let version_width =
        rows.iter().map(|r| r.version.as_deref().map_or(0, str::len)).max().unwrap_or(0).max(7);

    let header = format!("{:<8} {:<name_width$} {:<version_width$} SOURCE", "KIND", "NAME", "VERSION");
    println!("{}", header.bold());
    for row in rows {
        let version = row.version.as_deref().unwrap_or("-");
        let source = match (&row.error, &row.git) {
            (Some(error), _) => format!("{} {error}", "invalid:".red()),
            (None, Some(git)) => git.clone(),
            (None, None) => "-".dimmed().to_string(),
        };
        println!(
            "{:<8} {:<name_width$} {:<version_width$} {source}",
            row.kind.as_str(),
            row.name,
            version
        );
    }
}
