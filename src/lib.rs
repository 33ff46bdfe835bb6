//! kitpm - component kit installer
//!
//! kitpm installs reusable UI components into a project. Components live in a
//! remote registry as JSON: an index listing every component, plus one
//! resource per component carrying its files. Installing a component means
//! fetching it and everything it declares in `registryDependencies`, adapting
//! each file to the project, and writing it to the right directory.
//!
//! # Architecture Overview
//!
//! ```text
//! registry index ──> resolver ──> registry items ──> transform ──> files
//!                                                         └─────> merge (helper)
//! ```
//!
//! - [`registry`] - fetches and validates registry resources; each locator is
//!   requested at most once per client, concurrent callers share the request
//! - [`resolver`] - expands requested names into the deduplicated transitive
//!   closure of their registry dependencies
//! - [`transform`] - strips TypeScript syntax for projects without static
//!   typing, preserving everything else byte for byte
//! - [`merge`] - injects the shared `cn` helper into a user-owned file exactly
//!   once
//! - [`installer`] - drives the pieces above for one invocation
//!
//! # Supporting Modules
//!
//! - [`cli`] - clap front end (`add`, `list`, `view`)
//! - [`config`] - registry settings from the environment, project settings
//!   from `components.json`
//! - [`constants`] - timeouts, retry parameters and default locations
//! - [`core`] - crate-wide error type and user-facing error display
//! - [`utils`] - atomic file writes
//!
//! # Example
//!
//! ```rust,no_run
//! use kitpm_cli::config::{ProjectConfig, RegistryConfig};
//! use kitpm_cli::installer::Installer;
//! use kitpm_cli::registry::RegistryClient;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let root = Path::new(".");
//! let client = Arc::new(RegistryClient::new(&RegistryConfig::from_env())?);
//! let config = ProjectConfig::load(root).await?;
//!
//! let report = Installer::new(client, config, root).install(&["button"]).await?;
//! for path in &report.written {
//!     println!("created {}", path.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod installer;
pub mod merge;
pub mod registry;
pub mod resolver;
pub mod transform;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
