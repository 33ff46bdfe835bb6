//! Project configuration (`components.json`).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{HELPER_FILE_STEM, PROJECT_CONFIG_FILE};

/// Settings read from the project's `components.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Whether the project uses the statically typed dialect
    #[serde(default = "default_true")]
    pub tsx: bool,
    /// Install locations per component kind
    #[serde(default)]
    pub aliases: Aliases,
}

fn default_true() -> bool {
    true
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            tsx: true,
            aliases: Aliases::default(),
        }
    }
}

/// Import aliases that double as install locations.
///
/// An alias starting with `@/` or `~/` is relative to the project's source root
/// (`src/` when that directory exists, the project root otherwise); anything else
/// is relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Aliases {
    /// Composite components, blocks and pages
    pub components: String,
    /// UI primitives, defaults to `<components>/ui`
    pub ui: Option<String>,
    /// Library modules
    pub lib: String,
    /// Hooks
    pub hooks: String,
    /// Module holding the shared helper
    pub utils: String,
}

impl Default for Aliases {
    fn default() -> Self {
        Self {
            components: "@/components".to_string(),
            ui: None,
            lib: "@/lib".to_string(),
            hooks: "@/hooks".to_string(),
            utils: format!("@/lib/{HELPER_FILE_STEM}"),
        }
    }
}

/// Concrete install directories for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    /// Project root
    pub root: PathBuf,
    /// Directory for composite components
    pub components: PathBuf,
    /// Directory for UI primitives
    pub ui: PathBuf,
    /// Directory for library modules
    pub lib: PathBuf,
    /// Directory for hooks
    pub hooks: PathBuf,
    /// Shared helper module without extension
    pub utils: PathBuf,
}

impl ProjectConfig {
    /// Load `components.json` from `root`, falling back to defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(root: &Path) -> Result<Self> {
        let path = root.join(PROJECT_CONFIG_FILE);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            debug!("No {} in {}, using defaults", PROJECT_CONFIG_FILE, root.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read project config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse project config from {}", path.display()))
    }

    /// Resolve every alias against `root`.
    #[must_use]
    pub fn resolve_paths(&self, root: &Path) -> ProjectPaths {
        let source_root = if root.join("src").is_dir() {
            root.join("src")
        } else {
            root.to_path_buf()
        };
        let resolve = |alias: &str| resolve_alias(root, &source_root, alias);

        let components = resolve(&self.aliases.components);
        let ui = match &self.aliases.ui {
            Some(ui) => resolve(ui),
            None => components.join("ui"),
        };

        ProjectPaths {
            root: root.to_path_buf(),
            components,
            ui,
            lib: resolve(&self.aliases.lib),
            hooks: resolve(&self.aliases.hooks),
            utils: resolve(&self.aliases.utils),
        }
    }

    /// Extension used for script files in this project.
    #[must_use]
    pub fn script_extension(&self) -> &'static str {
        if self.tsx { "ts" } else { "js" }
    }
}

impl ProjectPaths {
    /// Full path of the shared helper file for the given extension.
    #[must_use]
    pub fn helper_file(&self, extension: &str) -> PathBuf {
        self.utils.with_extension(extension)
    }
}

fn resolve_alias(root: &Path, source_root: &Path, alias: &str) -> PathBuf {
    let (base, rest) = match alias.strip_prefix("@/").or_else(|| alias.strip_prefix("~/")) {
        Some(rest) => (source_root, rest),
        None => (root, alias.trim_start_matches("./")),
    };
    rest.split('/').filter(|segment| !segment.is_empty()).fold(base.to_path_buf(), |p, s| p.join(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ProjectConfig::load(temp.path()).await.unwrap();
        assert_eq!(config, ProjectConfig::default());
        assert!(config.tsx);
        assert_eq!(config.script_extension(), "ts");
    }

    #[tokio::test]
    async fn test_load_partial_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(PROJECT_CONFIG_FILE),
            r#"{ "tsx": false, "aliases": { "components": "@/ui-kit" }, "style": "new-york" }"#,
        )
        .unwrap();

        let config = ProjectConfig::load(temp.path()).await.unwrap();
        assert!(!config.tsx);
        assert_eq!(config.aliases.components, "@/ui-kit");
        assert_eq!(config.aliases.lib, "@/lib");
        assert_eq!(config.script_extension(), "js");
    }

    #[tokio::test]
    async fn test_invalid_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(PROJECT_CONFIG_FILE), "{ not json").unwrap();

        let err = ProjectConfig::load(temp.path()).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse project config"));
    }

    #[test]
    fn test_resolve_paths_with_and_without_src() {
        let temp = TempDir::new().unwrap();
        let config = ProjectConfig::default();

        let paths = config.resolve_paths(temp.path());
        assert_eq!(paths.ui, temp.path().join("components").join("ui"));
        assert_eq!(paths.helper_file("ts"), temp.path().join("lib").join("utils.ts"));

        std::fs::create_dir(temp.path().join("src")).unwrap();
        let paths = config.resolve_paths(temp.path());
        assert_eq!(paths.hooks, temp.path().join("src").join("hooks"));
        assert_eq!(paths.lib, temp.path().join("src").join("lib"));
    }

    #[test]
    fn test_relative_alias_is_project_relative() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("src")).unwrap();
        let mut config = ProjectConfig::default();
        config.aliases.ui = Some("./design/ui".to_string());

        let paths = config.resolve_paths(temp.path());
        assert_eq!(paths.ui, temp.path().join("design").join("ui"));
    }
}
