//! Registry access for kitpm.
//!
//! The registry is a remote collection of installable components exposed as a
//! single index resource plus one resource per component. This module provides
//! everything needed to talk to it:
//!
//! - [`schema`] - Wire types ([`IndexEntry`], [`FullItem`], [`FileRecord`]) and the
//!   explicit validators that check fetched payloads at the boundary
//! - [`transport`] - The [`Transport`] seam and its reqwest-backed implementation
//! - [`cache`] - The per-client [`FetchCache`] that deduplicates fetches
//! - [`client`] - [`RegistryClient`], the strict and best-effort entry points
//!
//! # Fetch Deduplication
//!
//! For a given resource locator at most one physical request is issued per
//! client. The cache memoizes the *shared future* of the request rather than the
//! resolved value, so callers that ask for the same locator while a request is in
//! flight join that request instead of starting another one:
//!
//! ```rust,no_run
//! use kitpm_cli::registry::RegistryClient;
//! use kitpm_cli::config::RegistryConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = RegistryClient::new(&RegistryConfig::from_env())?;
//! let (a, b) = tokio::join!(client.get_item("button"), client.get_item("button"));
//! assert_eq!(a?.name, b?.name); // one request on the wire
//! # Ok(())
//! # }
//! ```
//!
//! # Error Taxonomy
//!
//! Transport failures are mapped to [`RegistryError`] by response status:
//! 401 → [`RegistryError::Unauthorized`], 403 → [`RegistryError::Forbidden`],
//! 404 → [`RegistryError::NotFound`], any other non-success status →
//! [`RegistryError::Transport`]. Bodies that are not JSON produce
//! [`RegistryError::Parse`], payloads failing schema validation produce
//! [`RegistryError::Validation`].

pub mod cache;
pub mod client;
pub mod schema;
pub mod transport;

pub use cache::FetchCache;
pub use client::RegistryClient;
pub use schema::{
    Component, FileRecord, FullItem, IndexEntry, IndexValidator, ItemKind, ItemValidator,
    SchemaValidator, Validation,
};
pub use transport::{HttpTransport, Transport, TransportResponse};

use thiserror::Error;

/// Errors produced while fetching registry resources.
///
/// The type is `Clone` because a single fetch outcome is handed to every caller
/// that shares the request through the [`FetchCache`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The registry answered 401
    #[error("Not authorized to access registry resource: {url}")]
    Unauthorized {
        /// Locator of the rejected request
        url: String,
    },

    /// The registry answered 403
    #[error("Access to registry resource is forbidden: {url}")]
    Forbidden {
        /// Locator of the rejected request
        url: String,
    },

    /// The registry answered 404
    #[error("Component '{name}' not found in registry")]
    NotFound {
        /// Component (or resource) name that was requested
        name: String,
    },

    /// Any other non-success status
    #[error("Registry request to {url} failed with HTTP status {status}")]
    Transport {
        /// Locator of the failed request
        url: String,
        /// HTTP status code returned by the registry
        status: u16,
    },

    /// The request did not complete within the request timeout
    #[error("Registry request to {url} timed out")]
    Timeout {
        /// Locator of the timed out request
        url: String,
    },

    /// The request could not be sent or the response body could not be read
    #[error("Network error while fetching {url}: {reason}")]
    Network {
        /// Locator of the failed request
        url: String,
        /// Underlying transport failure
        reason: String,
    },

    /// The response body is not valid JSON
    #[error("Failed to parse registry response from {url}: {reason}")]
    Parse {
        /// Locator of the request
        url: String,
        /// Parser error message
        reason: String,
    },

    /// The response is JSON but does not match the expected schema
    #[error("Invalid registry {resource} '{name}': {reason}")]
    Validation {
        /// Kind of resource being validated ("index" or "item")
        resource: String,
        /// Name of the resource
        name: String,
        /// Why validation failed
        reason: String,
    },
}

impl RegistryError {
    /// Map a non-success HTTP status to the matching error variant.
    ///
    /// Returns `None` for 2xx statuses.
    #[must_use]
    pub fn from_status(status: u16, url: &str, name: &str) -> Option<Self> {
        match status {
            200..=299 => None,
            401 => Some(Self::Unauthorized {
                url: url.to_string(),
            }),
            403 => Some(Self::Forbidden {
                url: url.to_string(),
            }),
            404 => Some(Self::NotFound {
                name: name.to_string(),
            }),
            _ => Some(Self::Transport {
                url: url.to_string(),
                status,
            }),
        }
    }

    /// Whether this error came from the registry answering "not found".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
