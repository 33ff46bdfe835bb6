//! `kitpm view`: show one registry item.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use super::CommandContext;
use crate::registry::RegistryError;

/// Show the details of one component.
#[derive(Args, Debug)]
pub struct ViewCommand {
    /// Component name or full item locator
    #[arg(value_name = "COMPONENT")]
    name: String,

    /// Print the item as JSON, file contents included
    #[arg(long)]
    json: bool,
}

impl ViewCommand {
    /// Fetch the item and print it.
    ///
    /// # Errors
    ///
    /// Fails when the item cannot be fetched. An unknown name is reported with
    /// similar names from the index.
    pub async fn execute(self, context: &CommandContext) -> Result<()> {
        let client = context.client()?;
        let item = match client.get_item(&self.name).await {
            Ok(item) => item,
            Err(RegistryError::NotFound { .. }) => {
                return Err(context.unknown_component(&client, &self.name).await.into());
            }
            Err(e) => return Err(e.into()),
        };

        if self.json {
            let json = serde_json::to_string_pretty(&item).context("Failed to serialize item")?;
            println!("{json}");
            return Ok(());
        }

        println!("{} ({})", item.name.bold(), item.kind);
        if let Some(description) = &item.description {
            println!("{description}");
        }

        let lists = [
            ("Registry dependencies", &item.registry_dependencies),
            ("Dependencies", &item.dependencies),
            ("Dev dependencies", &item.dev_dependencies),
        ];
        for (label, names) in lists {
            if !names.is_empty() {
                println!("{}: {}", label.dimmed(), names.join(", "));
            }
        }

        if !item.files.is_empty() {
            println!("{}:", "Files".dimmed());
            for file in &item.files {
                let lines = file.content.as_deref().map_or(0, |c| c.lines().count());
                match &file.target {
                    Some(target) => println!("  {} -> {} ({lines} lines)", file.path, target),
                    None => println!("  {} ({lines} lines)", file.path),
                }
            }
        }
        Ok(())
    }
}
