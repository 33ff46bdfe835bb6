//! `kitpm list`: show the registry index.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use super::CommandContext;
use crate::registry::{IndexEntry, ItemKind};

/// List the components in the registry.
#[derive(Args, Debug)]
pub struct ListCommand {
    /// Only show entries of this kind (e.g. `ui`, `hook`, `registry:lib`)
    #[arg(short, long, value_name = "KIND")]
    kind: Option<String>,

    /// Print the index as JSON
    #[arg(long)]
    json: bool,
}

impl ListCommand {
    /// Fetch the index and print it.
    ///
    /// # Errors
    ///
    /// Fails when the index cannot be fetched.
    pub async fn execute(self, context: &CommandContext) -> Result<()> {
        let client = context.client()?;
        let index = client.get_index().await?;
        let entries: Vec<&IndexEntry> =
            index.iter().filter(|entry| self.matches_kind(entry.kind)).collect();

        if self.json {
            let json = serde_json::to_string_pretty(&entries).context("Failed to serialize index")?;
            println!("{json}");
            return Ok(());
        }

        if entries.is_empty() {
            if !context.quiet {
                println!("No components found");
            }
            return Ok(());
        }

        let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
        for entry in entries {
            let kind = entry.kind.as_str().trim_start_matches("registry:");
            match &entry.description {
                Some(description) => println!(
                    "{:width$}  {:10}  {}",
                    entry.name.bold(),
                    kind.dimmed(),
                    description
                ),
                None => println!("{:width$}  {}", entry.name.bold(), kind.dimmed()),
            }
        }
        Ok(())
    }

    fn matches_kind(&self, kind: ItemKind) -> bool {
        self.kind.as_deref().is_none_or(|wanted| {
            let wanted = wanted.trim();
            kind.as_str() == wanted || kind.as_str().trim_start_matches("registry:") == wanted
        })
    }
}
