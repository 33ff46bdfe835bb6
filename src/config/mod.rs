//! Configuration management for kitpm
//!
//! kitpm reads two layers of configuration:
//!
//! 1. **Environment** ([`RegistryConfig`]) - the registry base locator
//!    (`REGISTRY_URL`) and the optional forward proxy for secure requests
//!    (`HTTPS_PROXY` / `https_proxy`)
//! 2. **Project file** ([`ProjectConfig`], `components.json`) - whether the project
//!    uses static typing and where each kind of component is installed
//!
//! Both layers fall back to defaults when nothing is configured, so a fresh
//! project can install components without any setup.
//!
//! ## Project File (`components.json`)
//!
//! ```json
//! {
//!   "tsx": true,
//!   "aliases": {
//!     "components": "@/components",
//!     "ui": "@/components/ui",
//!     "lib": "@/lib",
//!     "hooks": "@/hooks",
//!     "utils": "@/lib/utils"
//!   }
//! }
//! ```

mod project;

pub use project::{Aliases, ProjectConfig, ProjectPaths};

use crate::constants::{DEFAULT_REGISTRY_URL, HTTPS_PROXY_ENVS, REGISTRY_URL_ENV};

/// Registry connection settings taken from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Base locator that resource names are resolved against
    pub base_url: String,
    /// Forward proxy applied to secure (`https`) requests only
    pub https_proxy: Option<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REGISTRY_URL.to_string(),
            https_proxy: None,
        }
    }
}

impl RegistryConfig {
    /// Read the configuration from the process environment.
    ///
    /// Empty variables are treated as unset. A trailing slash on the base locator
    /// is dropped so resource names can be appended uniformly.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = non_empty_var(REGISTRY_URL_ENV)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string());
        let https_proxy = HTTPS_PROXY_ENVS.iter().find_map(|name| non_empty_var(name));

        Self {
            base_url,
            https_proxy,
        }
    }

    /// Override the base locator.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        unsafe {
            std::env::remove_var(REGISTRY_URL_ENV);
            for name in HTTPS_PROXY_ENVS {
                std::env::remove_var(name);
            }
        }
    }

    #[test]
    #[serial]
    fn test_defaults_without_env() {
        clear_env();
        let config = RegistryConfig::from_env();
        assert_eq!(config, RegistryConfig::default());
        assert_eq!(config.base_url, DEFAULT_REGISTRY_URL);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        unsafe {
            std::env::set_var(REGISTRY_URL_ENV, "http://localhost:3000/r/");
            std::env::set_var("https_proxy", "http://proxy.internal:3128");
        }

        let config = RegistryConfig::from_env();
        assert_eq!(config.base_url, "http://localhost:3000/r");
        assert_eq!(config.https_proxy.as_deref(), Some("http://proxy.internal:3128"));

        unsafe {
            std::env::set_var(REGISTRY_URL_ENV, "  ");
        }
        assert_eq!(RegistryConfig::from_env().base_url, DEFAULT_REGISTRY_URL);
        clear_env();
    }

    #[test]
    fn test_with_base_url_trims_slash() {
        let config = RegistryConfig::default().with_base_url("https://example.com/registry/");
        assert_eq!(config.base_url, "https://example.com/registry");
    }
}
