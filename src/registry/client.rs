//! Registry client with request deduplication and typed failures.

use futures::FutureExt;
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tracing::{debug, error, warn};

use super::cache::{FetchCache, FetchOutcome};
use super::schema::{
    FullItem, IndexEntry, IndexValidator, ItemValidator, SchemaValidator, Validation,
};
use super::transport::{HttpTransport, Transport};
use super::RegistryError;
use crate::config::RegistryConfig;
use crate::constants::{INDEX_RESOURCE, REQUEST_TIMEOUT, RETRY_BASE_DELAY};

/// Client for one registry.
///
/// Every fetch goes through the client's [`FetchCache`], so a resource locator
/// is requested at most once and every caller observes the same outcome,
/// success or failure. The cache is an explicit object: pass the same
/// `Arc<FetchCache>` to several clients to share it, or let each client own a
/// fresh one.
///
/// # Strict vs. Best-Effort Entry Points
///
/// - [`get_index`](Self::get_index) and [`get_item`](Self::get_item) propagate
///   every [`RegistryError`]
/// - [`get_component`](Self::get_component),
///   [`get_all_components`](Self::get_all_components) and
///   [`fetch_template_with_retry`](Self::fetch_template_with_retry) log failures
///   and degrade to `None` / an empty list
pub struct RegistryClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    cache: Arc<FetchCache>,
    request_timeout: Duration,
    retry_base_delay: Duration,
}

impl RegistryClient {
    /// Build a client talking HTTP(S) according to `config`.
    ///
    /// # Errors
    ///
    /// Fails if the configured proxy locator is invalid.
    pub fn new(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let transport = HttpTransport::new(config.https_proxy.as_deref())?;
        Ok(Self::with_transport(&config.base_url, Arc::new(transport)))
    }

    /// Build a client over an arbitrary transport.
    pub fn with_transport(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            cache: Arc::new(FetchCache::new()),
            request_timeout: REQUEST_TIMEOUT,
            retry_base_delay: RETRY_BASE_DELAY,
        }
    }

    /// Use `cache` instead of the client's own cache.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<FetchCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Override the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Override the base delay of the template retry schedule.
    #[must_use]
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Base locator of the registry.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The fetch cache used by this client.
    #[must_use]
    pub fn cache(&self) -> &FetchCache {
        &self.cache
    }

    /// Locator of the resource for `name`.
    ///
    /// Names that already are full `http(s)` locators are used verbatim.
    #[must_use]
    pub fn resource_url(&self, name: &str) -> String {
        if name.starts_with("https://") || name.starts_with("http://") {
            name.to_string()
        } else {
            let resource = name.trim_start_matches('/');
            if resource.ends_with(".json") {
                format!("{}/{}", self.base_url, resource)
            } else {
                format!("{}/{}.json", self.base_url, resource)
            }
        }
    }

    /// Fetch the registry index.
    ///
    /// # Errors
    ///
    /// Any transport, parse or validation failure.
    pub async fn get_index(&self) -> Result<Vec<IndexEntry>, RegistryError> {
        let url = self.resource_url(INDEX_RESOURCE);
        let value = self.fetch_json(&url, "index").await?;
        validated(&IndexValidator, &value, "index")
    }

    /// Fetch the full item for `name`.
    ///
    /// # Errors
    ///
    /// Any transport, parse or validation failure. A missing component yields
    /// [`RegistryError::NotFound`].
    pub async fn get_item(&self, name: &str) -> Result<FullItem, RegistryError> {
        let url = self.resource_url(name);
        let value = self.fetch_json(&url, name).await?;
        validated(&ItemValidator, &value, name)
    }

    /// Best-effort variant of [`get_item`](Self::get_item).
    pub async fn get_component(&self, name: &str) -> Option<FullItem> {
        match self.get_item(name).await {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("Failed to fetch component '{}': {}", name, e);
                None
            }
        }
    }

    /// Fetch every component listed in the index.
    ///
    /// Items are requested concurrently and returned in index order. Items that
    /// fail are skipped; a failing index yields an empty list.
    pub async fn get_all_components(&self) -> Vec<FullItem> {
        let index = match self.get_index().await {
            Ok(index) => index,
            Err(e) => {
                warn!("Failed to fetch registry index: {}", e);
                return Vec::new();
            }
        };

        join_all(index.iter().map(|entry| self.get_component(&entry.name)))
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    /// Fetch the content of the first file of `name`, retrying on failure.
    ///
    /// Makes up to `retries + 1` attempts. Before the `(i+1)`-th retry the client
    /// waits `2^i` times the base delay (1s, 2s, 4s, ... by default). Every
    /// attempt first evicts a failed outcome for the locator from the cache,
    /// including one left by an earlier caller, so each attempt that does not
    /// find a cached success reaches the transport. Returns `None` once all
    /// attempts failed.
    pub async fn fetch_template_with_retry(&self, name: &str, retries: u32) -> Option<String> {
        let url = self.resource_url(name);
        let url = url.as_str();
        let base = self.retry_base_delay;
        let schedule = (0..retries).map(move |i| base.saturating_mul(2u32.saturating_pow(i)));

        let mut attempt = 0u32;
        let outcome = Retry::start(schedule, || {
            attempt += 1;
            let current = attempt;
            async move {
                if current > 1 {
                    debug!("Retrying template fetch for '{}' (attempt {})", name, current);
                }
                if self.cache.evict_failed(url) {
                    debug!("Dropped cached failure for {}", url);
                }
                self.first_file_content(name).await
            }
        })
        .await;

        match outcome {
            Ok(content) => Some(content),
            Err(e) => {
                error!(
                    "Failed to fetch template '{}' after {} attempts: {}",
                    name,
                    retries + 1,
                    e
                );
                None
            }
        }
    }

    async fn first_file_content(&self, name: &str) -> Result<String, RegistryError> {
        let item = self.get_item(name).await?;
        item.files.into_iter().next().and_then(|file| file.content).ok_or_else(|| {
            RegistryError::Validation {
                resource: "item".to_string(),
                name: name.to_string(),
                reason: "no file content".to_string(),
            }
        })
    }

    /// Fetch and decode `url` through the cache.
    async fn fetch_json(&self, url: &str, name: &str) -> FetchOutcome {
        let fetch = self.cache.get_or_start(url, || {
            let transport = Arc::clone(&self.transport);
            let url = url.to_string();
            let name = name.to_string();
            let timeout = self.request_timeout;
            async move { fetch_once(transport.as_ref(), &url, &name, timeout).await }.boxed()
        });
        fetch.await
    }
}

/// One physical request: transport call, timeout, status mapping, JSON decode.
async fn fetch_once(
    transport: &dyn Transport,
    url: &str,
    name: &str,
    timeout: Duration,
) -> FetchOutcome {
    let response = tokio::time::timeout(timeout, transport.get(url)).await.map_err(|_| {
        RegistryError::Timeout {
            url: url.to_string(),
        }
    })??;

    if let Some(error) = RegistryError::from_status(response.status, url, name) {
        debug!("Registry answered {} for {}", response.status, url);
        return Err(error);
    }

    let value: Value = serde_json::from_str(&response.body).map_err(|e| RegistryError::Parse {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    Ok(Arc::new(value))
}

fn validated<V: SchemaValidator>(
    validator: &V,
    value: &Value,
    name: &str,
) -> Result<V::Output, RegistryError> {
    match validator.validate(value) {
        Validation::Valid(output) => Ok(output),
        Validation::Invalid {
            reason,
        } => Err(RegistryError::Validation {
            resource: validator.resource().to_string(),
            name: name.to_string(),
            reason,
        }),
    }
}
