//! Global constants used throughout the kitpm codebase.
//!
//! This module contains timeout durations, retry parameters, and default
//! locations that are used across multiple modules. Defining them centrally
//! makes magic numbers more discoverable.

use std::time::Duration;

/// Default base locator of the component registry.
///
/// Overridden by the `REGISTRY_URL` environment variable.
pub const DEFAULT_REGISTRY_URL: &str = "https://ui.shadcn.com/r";

/// Environment variable that overrides [`DEFAULT_REGISTRY_URL`].
pub const REGISTRY_URL_ENV: &str = "REGISTRY_URL";

/// Environment variables consulted (in order) for the forward proxy used by
/// secure requests.
pub const HTTPS_PROXY_ENVS: [&str; 2] = ["HTTPS_PROXY", "https_proxy"];

/// Name of the index resource relative to the registry base.
pub const INDEX_RESOURCE: &str = "index.json";

/// Timeout for a single registry request (10 seconds).
///
/// Requests still pending after this long are aborted and reported as
/// [`RegistryError::Timeout`](crate::registry::RegistryError::Timeout).
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of extra attempts made by
/// [`fetch_template_with_retry`].
///
/// [`fetch_template_with_retry`]: crate::registry::RegistryClient::fetch_template_with_retry
pub const DEFAULT_TEMPLATE_RETRIES: u32 = 2;

/// Base delay of the template retry schedule (1 second).
///
/// The delay before the `(i+1)`-th retry is `2^i` times this value.
pub const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Project configuration file read from the project root.
pub const PROJECT_CONFIG_FILE: &str = "components.json";

/// Name of the shared helper export injected by the merger.
pub const HELPER_EXPORT_NAME: &str = "cn";

/// File stem of the shared helper file inside the `lib` alias directory.
pub const HELPER_FILE_STEM: &str = "utils";

/// Registry item whose first file is the shared helper template.
pub const HELPER_TEMPLATE_NAME: &str = "utils";
