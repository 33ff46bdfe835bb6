//! In-memory registry for tests.

use futures::future::BoxFuture;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::constants::INDEX_RESOURCE;
use crate::registry::{RegistryClient, RegistryError, Transport, TransportResponse};

/// Transport answering from a table of canned responses.
///
/// Unknown locators answer 404. Every request is counted, per locator and in
/// total.
pub struct StubTransport {
    base_url: String,
    responses: Mutex<HashMap<String, TransportResponse>>,
    calls: Mutex<HashMap<String, usize>>,
    total: AtomicUsize,
    delay: Option<Duration>,
}

impl StubTransport {
    /// Empty registry rooted at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
            total: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// Hold every response for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Serve `items` and an index listing them, in order.
    pub fn with_items(self, items: Vec<Value>) -> Self {
        let index: Vec<Value> = items.iter().map(index_entry).collect();
        let index = TransportResponse::ok(Value::Array(index).to_string());
        let stub = self.with_response(INDEX_RESOURCE, index);
        items.into_iter().fold(stub, |stub, item| {
            let name = item["name"].as_str().unwrap_or_default().to_string();
            stub.with_response(&format!("{name}.json"), TransportResponse::ok(item.to_string()))
        })
    }

    /// Serve `response` for `resource` (relative to the base) or a full locator.
    pub fn with_response(self, resource: &str, response: TransportResponse) -> Self {
        let url = self.url(resource);
        self.set_response(&url, response);
        self
    }

    /// Replace the response for `resource` after construction.
    pub fn set_response(&self, resource: &str, response: TransportResponse) {
        let url = self.url(resource);
        self.responses.lock().unwrap_or_else(|e| e.into_inner()).insert(url, response);
    }

    /// Full locator of `resource`.
    pub fn url(&self, resource: &str) -> String {
        if resource.starts_with("http://") || resource.starts_with("https://") {
            resource.to_string()
        } else {
            format!("{}/{}", self.base_url, resource.trim_start_matches('/'))
        }
    }

    /// Requests made for `resource`.
    pub fn calls(&self, resource: &str) -> usize {
        let url = self.url(resource);
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).get(&url).copied().unwrap_or(0)
    }

    /// Requests made in total.
    pub fn total_calls(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    /// Client over this transport with a 1 ms retry base delay.
    pub fn client(self) -> (Arc<RegistryClient>, Arc<Self>) {
        let transport = Arc::new(self);
        let client = RegistryClient::with_transport(&transport.base_url, transport.clone())
            .with_retry_base_delay(Duration::from_millis(1));
        (Arc::new(client), transport)
    }
}

impl Transport for StubTransport {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<TransportResponse, RegistryError>> {
        Box::pin(async move {
            self.total.fetch_add(1, Ordering::SeqCst);
            {
                let mut calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
                *calls.entry(url.to_string()).or_default() += 1;
            }
            match self.delay {
                Some(delay) => tokio::time::sleep(delay).await,
                None => tokio::task::yield_now().await,
            }
            let responses = self.responses.lock().unwrap_or_else(|e| e.into_inner());
            let response = responses.get(url).cloned();
            drop(responses);
            Ok(response.unwrap_or_else(|| TransportResponse::status(404)))
        })
    }
}

/// A full registry item. Set further fields by indexing the returned value.
pub fn item_json(name: &str, kind: &str, registry_dependencies: &[&str], files: &[Value]) -> Value {
    json!({
        "name": name,
        "type": kind,
        "registryDependencies": registry_dependencies,
        "files": files,
    })
}

/// A file record of a full item.
pub fn file_json(path: &str, kind: &str, content: &str) -> Value {
    json!({ "path": path, "type": kind, "content": content })
}

fn index_entry(item: &Value) -> Value {
    let mut entry = item.clone();
    if let Some(files) = entry.get_mut("files").and_then(Value::as_array_mut) {
        for file in files.iter_mut() {
            *file = file.get("path").cloned().unwrap_or(Value::Null);
        }
    }
    entry
}
