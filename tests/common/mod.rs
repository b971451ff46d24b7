//! Shared utilities for integration testing.

#![allow(dead_code)]

use axum::{
    extract::Query,
    http::{header::CONTENT_TYPE, StatusCode},
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

use account_lookup::config::{ResilienceConfig, ServiceConfig};
use account_lookup::lifecycle::Shutdown;
use account_lookup::HttpServer;

pub const IBAN: &str = "12345";
pub const COUNTRY: &str = "UK";
pub const CURRENCY: &str = "GBP";

pub const BANK_ONE_PATH: &str = "/bankone/api/account";
pub const BANK_TWO_PATH: &str = "/banktwo/api/account";

pub const ADMIN_KEY: &str = "test-admin-key";

/// A running mock provider.
pub struct MockProvider {
    pub addr: SocketAddr,
    calls: Arc<AtomicU32>,
}

impl MockProvider {
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Start a programmable mock provider serving `path`.
///
/// `f` receives the zero-based call index and the query parameters and
/// returns the status and body to answer with.
pub async fn start_programmable_provider<F, Fut>(path: &'static str, f: F) -> MockProvider
where
    F: Fn(u32, HashMap<String, String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let calls = Arc::new(AtomicU32::new(0));
    let f = Arc::new(f);

    let handler_calls = calls.clone();
    let app = Router::new().route(
        path,
        get(move |Query(params): Query<HashMap<String, String>>| {
            let f = f.clone();
            let calls = handler_calls.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                let (status, body) = f(n, params).await;
                (
                    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                    [(CONTENT_TYPE, "application/json")],
                    body,
                )
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockProvider { addr, calls }
}

/// Mock provider that always answers with `status` and an empty body.
pub async fn start_failing_provider(path: &'static str, status: u16) -> MockProvider {
    start_programmable_provider(path, move |_, _| async move { (status, String::new()) }).await
}

/// Mock provider that answers 200 for the expected account and 404 otherwise.
pub async fn start_bank(path: &'static str, bank_name: &'static str, routing_number: &'static str) -> MockProvider {
    start_programmable_provider(path, move |_, params| async move {
        let matches = params.get("iban").map(String::as_str) == Some(IBAN)
            && params.get("country").map(String::as_str) == Some(COUNTRY)
            && params.get("currency").map(String::as_str) == Some(CURRENCY);
        if matches {
            (200, bank_body(bank_name, IBAN, routing_number))
        } else {
            (404, String::new())
        }
    })
    .await
}

pub fn bank_body(bank_name: &str, iban: &str, routing_number: &str) -> String {
    format!(
        r#"{{"bankName": "{}", "iban": "{}", "routingNumber": "{}"}}"#,
        bank_name, iban, routing_number
    )
}

/// Service configuration pointing at the two mock providers.
pub fn service_config(primary: &MockProvider, secondary: &MockProvider) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.providers.primary.base_url = primary.base_url();
    config.providers.primary.path = BANK_ONE_PATH.to_string();
    config.providers.secondary.base_url = secondary.base_url();
    config.providers.secondary.path = BANK_TWO_PATH.to_string();
    config.observability.metrics_enabled = false;
    config.admin.enabled = true;
    config.admin.api_key = ADMIN_KEY.to_string();
    config
}

/// Tighten the lookupAccount breaker so tests can trip it quickly.
pub fn with_resilience(mut config: ServiceConfig, resilience: ResilienceConfig) -> ServiceConfig {
    config.resilience.insert("lookupAccount".to_string(), resilience);
    config
}

/// A running service under test.
pub struct TestService {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn lookup_url(&self, iban: &str, country: &str, currency: &str) -> String {
        self.url(&format!(
            "/v1/accountlookup/account?iban={}&country={}&currency={}",
            iban, country, currency
        ))
    }
}

impl Drop for TestService {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the service on an ephemeral port.
pub async fn start_service(config: ServiceConfig) -> TestService {
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestService { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
