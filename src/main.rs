//! modsync CLI entry point
//!
//! Parses arguments, runs the command and prints failures with a suggestion.
//! See [`modsync_cli::cli`] for the command set.

use anyhow::Result;
use clap::Parser;
use modsync_cli::cli;
use modsync_cli::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}
