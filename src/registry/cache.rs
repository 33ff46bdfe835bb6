//! Per-client fetch cache.
//!
//! The cache maps a resource locator to the shared future of its fetch. Storing
//! the future instead of the settled value lets concurrent callers join a request
//! that is still in flight, so a locator is fetched at most once per cache.
//!
//! # Concurrency
//!
//! The map is a [`DashMap`]; the check-or-insert sequence runs inside a single
//! `entry()` call, so two callers racing on the same locator cannot both start a
//! request. No shard lock is held across an `.await`: callers clone the shared
//! future out of the map and await it afterwards.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::RegistryError;

/// Settled outcome of one fetch: the decoded JSON body or the error.
pub type FetchOutcome = Result<Arc<Value>, RegistryError>;

/// A fetch that may still be in flight and can be awaited by many callers.
pub type SharedFetch = Shared<BoxFuture<'static, FetchOutcome>>;

/// Process-lifetime mapping from locator to fetch outcome.
///
/// Owned by one [`RegistryClient`](super::RegistryClient) (or shared between
/// clients explicitly through an `Arc`). Nothing is persisted.
#[derive(Default)]
pub struct FetchCache {
    entries: DashMap<String, SharedFetch>,
}

impl FetchCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the fetch registered for `url`, starting one with `start` if none
    /// exists yet.
    ///
    /// `start` runs at most once per locator for the lifetime of the entry.
    pub fn get_or_start<F>(&self, url: &str, start: F) -> SharedFetch
    where
        F: FnOnce() -> BoxFuture<'static, FetchOutcome>,
    {
        match self.entries.entry(url.to_string()) {
            Entry::Occupied(entry) => {
                debug!("Fetch cache hit for {}", url);
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                debug!("Fetch cache miss for {}", url);
                let fetch = start().shared();
                entry.insert(fetch.clone());
                fetch
            }
        }
    }

    /// Drop the entry for `url` if its fetch has settled with an error.
    ///
    /// In-flight and successful entries are kept. Returns whether an entry was
    /// removed.
    pub fn evict_failed(&self, url: &str) -> bool {
        self.entries.remove_if(url, |_, fetch| matches!(fetch.peek(), Some(Err(_)))).is_some()
    }

    /// Whether a fetch has been registered for `url`.
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Number of registered locators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no fetch has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
