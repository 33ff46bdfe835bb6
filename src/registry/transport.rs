//! Network transport used by the registry client.
//!
//! The [`Transport`] trait is the seam between the client's caching and error
//! mapping logic and the actual wire. [`HttpTransport`] is the production
//! implementation built on reqwest; tests substitute a stub that counts calls.

use futures::future::BoxFuture;
use std::time::Duration;
use tracing::debug;

use super::RegistryError;
use crate::constants::REQUEST_TIMEOUT;

/// Raw response of a registry request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl TransportResponse {
    /// Successful response with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    /// Response with an arbitrary status and empty body.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }
}

/// Issues a single GET request for a resource locator.
///
/// Implementations report connection-level failures as
/// [`RegistryError::Network`] or [`RegistryError::Timeout`]; status mapping is the
/// client's job.
pub trait Transport: Send + Sync {
    /// Fetch `url` and return its status and body.
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<TransportResponse, RegistryError>>;
}

/// Scheme of a resource locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// `https://`
    Secure,
    /// `http://`
    Plain,
}

impl Scheme {
    /// Detect the scheme of a locator, `None` for anything but http(s).
    #[must_use]
    pub fn of(url: &str) -> Option<Self> {
        let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
        if lower.starts_with("https://") {
            Some(Self::Secure)
        } else if lower.starts_with("http://") {
            Some(Self::Plain)
        } else {
            None
        }
    }
}

/// reqwest-backed transport.
///
/// Holds one client per scheme. The optional forward proxy is installed on the
/// secure client only; plain requests always go direct.
pub struct HttpTransport {
    secure: reqwest::Client,
    plain: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport, routing secure requests through `proxy` when given.
    pub fn new(proxy: Option<&str>) -> Result<Self, RegistryError> {
        Self::with_timeout(proxy, REQUEST_TIMEOUT)
    }

    /// Build a transport with a custom request timeout.
    pub fn with_timeout(proxy: Option<&str>, timeout: Duration) -> Result<Self, RegistryError> {
        let build_error = |url: &str, e: reqwest::Error| RegistryError::Network {
            url: url.to_string(),
            reason: e.to_string(),
        };

        // no_proxy() keeps reqwest from picking up HTTP_PROXY for plain requests
        let mut secure = reqwest::Client::builder().timeout(timeout).no_proxy();
        if let Some(proxy_url) = proxy {
            debug!("Routing secure registry requests through proxy {}", proxy_url);
            let proxy = reqwest::Proxy::https(proxy_url).map_err(|e| build_error(proxy_url, e))?;
            secure = secure.proxy(proxy);
        }

        Ok(Self {
            secure: secure.build().map_err(|e| build_error("<secure client>", e))?,
            plain: reqwest::Client::builder()
                .timeout(timeout)
                .no_proxy()
                .build()
                .map_err(|e| build_error("<plain client>", e))?,
        })
    }

    fn client_for(&self, url: &str) -> Result<&reqwest::Client, RegistryError> {
        match Scheme::of(url) {
            Some(Scheme::Secure) => Ok(&self.secure),
            Some(Scheme::Plain) => Ok(&self.plain),
            None => Err(RegistryError::Network {
                url: url.to_string(),
                reason: "unsupported scheme, expected http:// or https://".to_string(),
            }),
        }
    }
}

fn classify(url: &str, error: reqwest::Error) -> RegistryError {
    if error.is_timeout() {
        RegistryError::Timeout {
            url: url.to_string(),
        }
    } else {
        RegistryError::Network {
            url: url.to_string(),
            reason: error.to_string(),
        }
    }
}

impl Transport for HttpTransport {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<TransportResponse, RegistryError>> {
        Box::pin(async move {
            let client = self.client_for(url)?;
            debug!("GET {}", url);

            let response = client.get(url).send().await.map_err(|e| classify(url, e))?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(|e| classify(url, e))?;

            Ok(TransportResponse {
                status,
                body,
            })
        })
    }
}
