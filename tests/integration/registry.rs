use axum::http::StatusCode;
use kitpm_cli::config::RegistryConfig;
use kitpm_cli::registry::{HttpTransport, ItemKind, RegistryClient, RegistryError, Transport};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::common::{TestRegistry, sample_items};

fn client_for(registry: &TestRegistry) -> RegistryClient {
    let config = RegistryConfig::default().with_base_url(&registry.base_url);
    RegistryClient::new(&config).unwrap().with_retry_base_delay(Duration::from_millis(1))
}

#[tokio::test]
async fn test_fetch_index_and_item_over_http() {
    let registry = TestRegistry::start(sample_items()).await;
    let client = client_for(&registry);

    let index = client.get_index().await.unwrap();
    let names: Vec<&str> = index.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["utils", "button", "use-toggle", "toggle-button"]);
    assert_eq!(index[1].files, vec!["registry/ui/button.tsx"]);

    let button = client.get_item("button").await.unwrap();
    assert_eq!(button.kind, ItemKind::Ui);
    assert_eq!(button.description.as_deref(), Some("Displays a button."));
    assert!(button.files[0].content.as_deref().unwrap().contains("forwardRef"));

    // full locators are used verbatim and share the cache entry
    let again = client.get_item(&format!("{}/button.json", registry.base_url)).await.unwrap();
    assert_eq!(again, button);
    assert_eq!(registry.hits("button.json"), 1);
}

#[tokio::test]
async fn test_concurrent_requests_share_one_fetch() {
    let registry = TestRegistry::start(sample_items()).await;
    let client = client_for(&registry);

    let (a, b, c) =
        tokio::join!(client.get_item("utils"), client.get_item("utils"), client.get_item("utils"));
    assert_eq!(a.unwrap().name, "utils");
    assert!(b.is_ok() && c.is_ok());
    assert_eq!(registry.hits("utils.json"), 1);
}

#[tokio::test]
async fn test_status_mapping_over_http() {
    let registry = TestRegistry::start_with(
        sample_items(),
        vec![
            ("private.json", StatusCode::UNAUTHORIZED),
            ("secret.json", StatusCode::FORBIDDEN),
            ("broken.json", StatusCode::BAD_GATEWAY),
        ],
    )
    .await;
    let client = client_for(&registry);

    assert!(matches!(client.get_item("private").await, Err(RegistryError::Unauthorized { .. })));
    assert!(matches!(client.get_item("secret").await, Err(RegistryError::Forbidden { .. })));
    assert!(matches!(
        client.get_item("broken").await,
        Err(RegistryError::Transport { status: 502, .. })
    ));
    assert_eq!(
        client.get_item("missing").await.unwrap_err(),
        RegistryError::NotFound {
            name: "missing".to_string()
        }
    );
}

#[tokio::test]
async fn test_best_effort_entry_points() {
    let overrides = vec![("use-toggle.json", StatusCode::INTERNAL_SERVER_ERROR)];
    let registry = TestRegistry::start_with(sample_items(), overrides).await;
    let client = client_for(&registry);

    assert!(client.get_component("missing").await.is_none());

    let all = client.get_all_components().await;
    let names: Vec<&str> = all.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["utils", "button", "toggle-button"]);
}

#[tokio::test]
async fn test_template_retry_reaches_the_server_each_time() {
    let registry = TestRegistry::start(sample_items()).await;
    let client = client_for(&registry);

    assert_eq!(client.fetch_template_with_retry("missing", 2).await, None);
    assert_eq!(registry.hits("missing.json"), 3);

    let template = client.fetch_template_with_retry("utils", 2).await.unwrap();
    assert!(template.contains("export function cn"));
    assert_eq!(registry.hits("utils.json"), 1);
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // bind and drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = RegistryConfig::default().with_base_url(format!("http://{addr}/r"));
    let client = RegistryClient::new(&config).unwrap();
    let err = client.get_index().await.unwrap_err();
    assert!(matches!(err, RegistryError::Network { .. } | RegistryError::Timeout { .. }));
}

/// A "proxy" that accepts connections, counts them and hangs up.
async fn dead_proxy() -> (String, Arc<AtomicUsize>, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let connections = Arc::new(AtomicUsize::new(0));
    let counter = connections.clone();
    let handle = tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            drop(stream);
        }
    });
    (url, connections, handle)
}

#[tokio::test]
async fn test_proxy_only_applies_to_secure_requests() {
    let registry = TestRegistry::start(sample_items()).await;
    let (proxy_url, connections, proxy) = dead_proxy().await;
    let transport = HttpTransport::new(Some(&proxy_url)).unwrap();

    let response = transport.get(&format!("{}/index.json", registry.base_url)).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(registry.hits("index.json"), 1);
    assert_eq!(connections.load(Ordering::SeqCst), 0);

    let secure = registry.base_url.replacen("http://", "https://", 1);
    let err = transport.get(&format!("{secure}/index.json")).await.unwrap_err();
    assert!(matches!(err, RegistryError::Network { .. }), "unexpected {err:?}");
    assert!(connections.load(Ordering::SeqCst) >= 1);
    assert_eq!(registry.hits("index.json"), 1);

    proxy.abort();
}

#[tokio::test]
async fn test_configured_proxy_leaves_plain_registry_reachable() {
    let registry = TestRegistry::start(sample_items()).await;
    let (proxy_url, connections, proxy) = dead_proxy().await;

    let config = RegistryConfig {
        base_url: registry.base_url.clone(),
        https_proxy: Some(proxy_url),
    };
    let client = RegistryClient::new(&config).unwrap();
    assert_eq!(client.get_item("button").await.unwrap().name, "button");
    assert_eq!(connections.load(Ordering::SeqCst), 0);

    proxy.abort();
}
