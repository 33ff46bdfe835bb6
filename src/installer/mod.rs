//! Installation of registry components into a project.
//!
//! One [`Installer::install`] call drives the whole pipeline for a list of
//! requested names:
//!
//! 1. Fetch the registry index and expand the request with
//!    [`resolve_tree`](crate::resolver::resolve_tree)
//! 2. Fetch the full item of every resolved entry (concurrently, kept in
//!    resolution order); items that fail are logged and skipped
//! 3. Map every file to its project path (see [`destination_for`]) and convert
//!    TypeScript when the project has `tsx: false`
//! 4. Write the files in order. The shared helper file goes through the
//!    [`HelperMerger`] instead of being overwritten; other existing files are
//!    only replaced with `overwrite` set
//! 5. If an installed file imports the helper module and the project does not
//!    provide it yet, fetch the helper template and merge it in
//!
//! When two components ship a file for the same destination, the one resolved
//! later wins.

mod destination;

#[cfg(test)]
mod tests;

pub use destination::{Destination, destination_for};

use futures::future::join_all;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::{ProjectConfig, ProjectPaths};
use crate::constants::{DEFAULT_TEMPLATE_RETRIES, HELPER_TEMPLATE_NAME};
use crate::core::KitError;
use crate::merge::{HelperMerger, MergeOutcome};
use crate::registry::{FullItem, RegistryClient};
use crate::resolver::{ExternalDependencies, resolve_tree};
use crate::transform::{SourceTransformer, TypeStripper};
use crate::utils::safe_write;

/// Why a registry file was not written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The destination exists and overwriting is off
    AlreadyExists,
    /// Declaration file in a project without static typing
    DeclarationFile,
    /// The registry record has no content
    NoContent,
    /// The helper file already exports the helper
    HelperPresent,
    /// The registry path or target is empty or points outside the project
    InvalidPath,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AlreadyExists => "already exists",
            Self::DeclarationFile => "type declarations only",
            Self::NoContent => "no content in registry",
            Self::HelperPresent => "helper already present",
            Self::InvalidPath => "path outside the project",
        })
    }
}

/// A file that was left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    /// Destination path, or the registry path when there is no destination
    pub path: PathBuf,
    /// Why it was skipped
    pub reason: SkipReason,
}

/// Outcome of one [`Installer::install`] call.
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    /// Components whose items were fetched, in resolution order
    pub components: Vec<String>,
    /// Files created or replaced
    pub written: Vec<PathBuf>,
    /// Existing files the helper was merged into
    pub merged: Vec<PathBuf>,
    /// Files not written
    pub skipped: Vec<SkippedFile>,
    /// Names (requested or declared) missing from the index
    pub missing: Vec<String>,
    /// External packages required by the installed components
    pub external: ExternalDependencies,
}

impl InstallReport {
    /// Whether nothing was written or merged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.written.is_empty() && self.merged.is_empty()
    }

    fn skip(&mut self, path: impl Into<PathBuf>, reason: SkipReason) {
        self.skipped.push(SkippedFile {
            path: path.into(),
            reason,
        });
    }
}

struct PlannedFile {
    component: String,
    path: PathBuf,
    content: String,
}

/// Installs components from one registry into one project.
pub struct Installer {
    client: Arc<RegistryClient>,
    transformer: Arc<dyn SourceTransformer>,
    merger: HelperMerger,
    config: ProjectConfig,
    paths: ProjectPaths,
    overwrite: bool,
    template_retries: u32,
}

impl Installer {
    /// Create an installer for the project at `root`.
    pub fn new(client: Arc<RegistryClient>, config: ProjectConfig, root: &Path) -> Self {
        let paths = config.resolve_paths(root);
        Self {
            client,
            transformer: Arc::new(TypeStripper),
            merger: HelperMerger::default(),
            config,
            paths,
            overwrite: false,
            template_retries: DEFAULT_TEMPLATE_RETRIES,
        }
    }

    /// Replace the source transformer.
    #[must_use]
    pub fn with_transformer(mut self, transformer: Arc<dyn SourceTransformer>) -> Self {
        self.transformer = transformer;
        self
    }

    /// Replace the helper merger.
    #[must_use]
    pub fn with_merger(mut self, merger: HelperMerger) -> Self {
        self.merger = merger;
        self
    }

    /// Replace existing files instead of skipping them.
    #[must_use]
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Extra attempts made when fetching the helper template.
    #[must_use]
    pub fn with_template_retries(mut self, retries: u32) -> Self {
        self.template_retries = retries;
        self
    }

    /// Resolved install directories.
    #[must_use]
    pub fn paths(&self) -> &ProjectPaths {
        &self.paths
    }

    /// Install `names` and everything they depend on.
    ///
    /// # Errors
    ///
    /// Fails when the index cannot be fetched or a file cannot be written.
    /// Individual components that cannot be fetched are skipped.
    pub async fn install<S: AsRef<str>>(&self, names: &[S]) -> Result<InstallReport, KitError> {
        let index = self.client.get_index().await?;
        let resolution = resolve_tree(&index, names);
        for step in &resolution.steps {
            debug!("Resolution: {}", step);
        }

        let mut report = InstallReport {
            missing: resolution.missing().into_iter().map(str::to_string).collect(),
            ..InstallReport::default()
        };

        let entries = resolution.items.into_vec();
        let items: Vec<FullItem> =
            join_all(entries.iter().map(|entry| self.client.get_component(&entry.name)))
                .await
                .into_iter()
                .flatten()
                .collect();

        report.components = items.iter().map(|item| item.name.clone()).collect();
        report.external = ExternalDependencies::collect(&items);

        let plan = self.plan(&items, &mut report);
        let helper_planned = plan.iter().any(|file| self.is_helper_file(&file.path));
        let utils_alias = &self.config.aliases.utils;
        let needs_helper = plan.iter().any(|file| file.content.contains(utils_alias.as_str()));

        for file in plan {
            self.install_file(file, &mut report).await?;
        }

        if needs_helper && !helper_planned {
            self.ensure_helper(&mut report).await?;
        }

        Ok(report)
    }

    /// Map every file of `items` to its destination, later files replacing
    /// earlier ones with the same destination.
    fn plan(&self, items: &[FullItem], report: &mut InstallReport) -> Vec<PlannedFile> {
        let mut plan: Vec<PlannedFile> = Vec::new();
        let mut positions: HashMap<PathBuf, usize> = HashMap::new();

        for item in items {
            for file in &item.files {
                let Some(content) = &file.content else {
                    warn!("File '{}' of '{}' has no content, skipping", file.path, item.name);
                    report.skip(&file.path, SkipReason::NoContent);
                    continue;
                };
                let destination = match destination_for(file, &self.config, &self.paths) {
                    Ok(destination) => destination,
                    Err(reason @ SkipReason::InvalidPath) => {
                        warn!("Refusing to install '{}' of '{}': {}", file.path, item.name, reason);
                        report.skip(&file.path, reason);
                        continue;
                    }
                    Err(reason) => {
                        debug!("Skipping '{}' of '{}': {}", file.path, item.name, reason);
                        report.skip(&file.path, reason);
                        continue;
                    }
                };

                let content = if destination.strip_types {
                    self.transformer.transform(content, self.config.tsx)
                } else {
                    content.clone()
                };
                let planned = PlannedFile {
                    component: item.name.clone(),
                    path: destination.path,
                    content,
                };

                match positions.get(&planned.path) {
                    Some(&position) => {
                        debug!(
                            "'{}' replaces '{}' for {}",
                            planned.component,
                            plan[position].component,
                            planned.path.display()
                        );
                        plan[position] = planned;
                    }
                    None => {
                        positions.insert(planned.path.clone(), plan.len());
                        plan.push(planned);
                    }
                }
            }
        }

        plan
    }

    async fn install_file(
        &self,
        file: PlannedFile,
        report: &mut InstallReport,
    ) -> Result<(), KitError> {
        if self.is_helper_file(&file.path) {
            return self.merge_helper(&file.path, &file.content, report).await;
        }

        if !self.overwrite && tokio::fs::try_exists(&file.path).await.unwrap_or(false) {
            warn!(
                "{} already exists, skipping (use --overwrite to replace it)",
                file.path.display()
            );
            report.skip(file.path, SkipReason::AlreadyExists);
            return Ok(());
        }

        safe_write(&file.path, &file.content).await.map_err(|source| KitError::FileWrite {
            path: file.path.clone(),
            source,
        })?;
        info!("Installed {} ({})", file.path.display(), file.component);
        report.written.push(file.path);
        Ok(())
    }

    async fn merge_helper(
        &self,
        path: &Path,
        template: &str,
        report: &mut InstallReport,
    ) -> Result<(), KitError> {
        match self.merger.merge_into(path, template).await? {
            MergeOutcome::Created => report.written.push(path.to_path_buf()),
            MergeOutcome::Merged => report.merged.push(path.to_path_buf()),
            MergeOutcome::AlreadyPresent => report.skip(path, SkipReason::HelperPresent),
        }
        Ok(())
    }

    /// Fetch the helper template and merge it when the project lacks it.
    async fn ensure_helper(&self, report: &mut InstallReport) -> Result<(), KitError> {
        let path = self.paths.helper_file(self.config.script_extension());
        if self.merger.has_target_export(&path).await {
            debug!("{} already provides '{}'", path.display(), self.merger.export_name());
            return Ok(());
        }

        let Some(template) =
            self.client.fetch_template_with_retry(HELPER_TEMPLATE_NAME, self.template_retries).await
        else {
            warn!(
                "Could not fetch the '{}' helper; {} was not updated",
                HELPER_TEMPLATE_NAME,
                path.display()
            );
            return Ok(());
        };

        let template = self.transformer.transform(&template, self.config.tsx);
        self.merge_helper(&path, &template, report).await
    }

    fn is_helper_file(&self, path: &Path) -> bool {
        path == self.paths.helper_file("ts") || path == self.paths.helper_file("js")
    }
}
