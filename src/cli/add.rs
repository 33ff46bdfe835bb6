//! `kitpm add`: install components into the project.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;

use super::CommandContext;
use crate::installer::{InstallReport, Installer};

/// Install components and their registry dependencies.
#[derive(Args, Debug)]
pub struct AddCommand {
    /// Component names or full item locators
    #[arg(required = true, value_name = "COMPONENT")]
    components: Vec<String>,

    /// Replace files that already exist
    #[arg(short, long)]
    overwrite: bool,
}

impl AddCommand {
    /// Run the installer and print its report.
    ///
    /// # Errors
    ///
    /// Fails when the registry index cannot be fetched, a file cannot be
    /// written, or none of the requested components exist.
    pub async fn execute(self, context: &CommandContext) -> Result<()> {
        let config = context.project_config().await?;
        let client = context.client()?;
        let installer = Installer::new(client.clone(), config, &context.project_root)
            .overwrite(self.overwrite);

        let report = installer.install(&self.components).await?;

        if report.components.is_empty() {
            if let Some(name) = self.components.iter().find(|n| report.missing.contains(n)) {
                return Err(context.unknown_component(&client, name).await.into());
            }
        }

        if !context.quiet {
            for name in &report.missing {
                let suggestion = context.unknown_component(&client, name).await;
                eprintln!("{}: {}", "warning".yellow(), suggestion);
            }
            print_report(&report, &context.project_root);
        }
        Ok(())
    }
}

fn print_report(report: &InstallReport, root: &Path) {
    let relative = |path: &Path| path.strip_prefix(root).unwrap_or(path).display().to_string();

    for path in &report.written {
        println!("{} {}", "created".green(), relative(path));
    }
    for path in &report.merged {
        println!("{} {}", "updated".cyan(), relative(path));
    }
    for skipped in &report.skipped {
        println!("{} {} ({})", "skipped".yellow(), relative(&skipped.path), skipped.reason);
    }

    if report.is_empty() && report.skipped.is_empty() {
        println!("Nothing to install");
    }

    let external = &report.external;
    if !external.is_empty() {
        println!();
        println!("{}", "Install the required packages:".bold());
        if !external.dependencies.is_empty() {
            let names: Vec<&str> = external.dependencies.iter().map(String::as_str).collect();
            println!("  npm install {}", names.join(" "));
        }
        if !external.dev_dependencies.is_empty() {
            let names: Vec<&str> = external.dev_dependencies.iter().map(String::as_str).collect();
            println!("  npm install -D {}", names.join(" "));
        }
    }
}
