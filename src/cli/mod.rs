//! Command-line interface for kitpm.
//!
//! # Commands
//!
//! - `add <names...>` - install components and their registry dependencies
//! - `list` - show the components available in the registry
//! - `view <name>` - show one component's details
//!
//! # Global Options
//!
//! - `-v, --verbose` - debug logging
//! - `-q, --quiet` - errors only, no report
//! - `--cwd <DIR>` - project root (defaults to the current directory)
//! - `--registry <URL>` - registry base locator, also read from `REGISTRY_URL`
//!
//! `RUST_LOG` takes precedence over the verbosity flags when set.
//!
//! # Examples
//!
//! ```bash
//! kitpm add button dialog
//! kitpm --cwd ./web add card --overwrite
//! REGISTRY_URL=http://localhost:3000/r kitpm list
//! ```

mod add;
mod list;
mod view;


use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::{ProjectConfig, RegistryConfig};
use crate::constants::{PROJECT_CONFIG_FILE, REGISTRY_URL_ENV};
use crate::core::{KitError, similar_names};
use crate::registry::RegistryClient;

pub use add::AddCommand;
pub use list::ListCommand;
pub use view::ViewCommand;

/// Top-level command line.
#[derive(Parser, Debug)]
#[command(
    name = "kitpm",
    about = "Install UI components from a registry into your project",
    version,
    long_about = "kitpm fetches components from a component registry, resolves their \
                  registry dependencies and writes the files into your project, converting \
                  TypeScript to JavaScript when the project does not use it."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Project root to install into
    #[arg(long, global = true, value_name = "DIR")]
    cwd: Option<PathBuf>,

    /// Registry base locator
    #[arg(long, global = true, env = REGISTRY_URL_ENV, value_name = "URL")]
    registry: Option<String>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install components into the project
    Add(AddCommand),
    /// List the components in the registry
    List(ListCommand),
    /// Show details of one component
    View(ViewCommand),
}

/// Settings shared by every command, derived from the global options.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Project root
    pub project_root: PathBuf,
    /// Registry connection settings
    pub registry: RegistryConfig,
    /// Suppress normal output
    pub quiet: bool,
}

impl CommandContext {
    /// Registry client for this invocation.
    ///
    /// # Errors
    ///
    /// Fails if the proxy configuration is invalid.
    pub fn client(&self) -> Result<Arc<RegistryClient>> {
        Ok(Arc::new(RegistryClient::new(&self.registry)?))
    }

    /// Load `components.json` from the project root.
    ///
    /// # Errors
    ///
    /// Returns [`KitError::ProjectConfig`] when the file exists but is invalid.
    pub async fn project_config(&self) -> Result<ProjectConfig> {
        ProjectConfig::load(&self.project_root).await.map_err(|e| {
            KitError::ProjectConfig {
                path: self.project_root.join(PROJECT_CONFIG_FILE),
                reason: format!("{:#}", e.root_cause()),
            }
            .into()
        })
    }

    /// An error for `name` not being in the registry, with suggestions taken
    /// from the (cached) index.
    pub async fn unknown_component(&self, client: &RegistryClient, name: &str) -> KitError {
        let suggestions = match client.get_index().await {
            Ok(index) => similar_names(name, index.iter().map(|entry| entry.name.as_str())),
            Err(_) => Vec::new(),
        };
        KitError::UnknownComponent {
            name: name.to_string(),
            suggestions,
        }
    }
}

impl Cli {
    /// Initialize logging and run the selected command.
    ///
    /// # Errors
    ///
    /// Whatever the command fails with.
    pub async fn execute(self) -> Result<()> {
        init_logging(self.log_filter());
        let context = self.context()?;

        match self.command {
            Commands::Add(cmd) => cmd.execute(&context).await,
            Commands::List(cmd) => cmd.execute(&context).await,
            Commands::View(cmd) => cmd.execute(&context).await,
        }
    }

    /// Log filter for the verbosity flags, `None` when `RUST_LOG` decides.
    fn log_filter(&self) -> Option<&'static str> {
        if std::env::var("RUST_LOG").is_ok() {
            None
        } else if self.verbose {
            Some("kitpm_cli=debug")
        } else if self.quiet {
            Some("error")
        } else {
            Some("warn")
        }
    }

    fn context(&self) -> Result<CommandContext> {
        let project_root = match &self.cwd {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Failed to determine the current directory")?,
        };

        let mut registry = RegistryConfig::from_env();
        if let Some(url) = self.registry.as_deref().filter(|u| !u.trim().is_empty()) {
            registry = registry.with_base_url(url.trim());
        }

        Ok(CommandContext {
            project_root,
            registry,
            quiet: self.quiet,
        })
    }
}

fn init_logging(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::from_default_env(),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
