//! kitpm CLI entry point
//!
//! Parses the command line, runs the command and renders failures through
//! [`user_friendly_error`]:
//!
//! - `add` - install components and their registry dependencies
//! - `list` - list the registry's components
//! - `view` - show one component

use anyhow::Result;
use clap::Parser;
use kitpm_cli::cli;
use kitpm_cli::core::user_friendly_error;

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
