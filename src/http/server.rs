//! HTTP server setup and composition root.
//!
//! # Responsibilities
//! - Build both providers, the breaker registry and the failover router
//! - Create the Axum Router with the lookup, health and admin handlers
//! - Wire up middleware (timeout, request ID, tracing)
//! - Serve until the shutdown signal fires

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin;
use crate::config::{AdminConfig, ServiceConfig};
use crate::http::request::{request_id, MakeRequestUuidV4, X_REQUEST_ID};
use crate::http::response::ApiError;
use crate::lookup::{LookupRequest, LookupResult};
use crate::provider::{HttpProvider, ProviderError};
use crate::resilience::CircuitBreakerRegistry;
use crate::routing::{FailoverRouter, LOOKUP_ACCOUNT};

/// Error building the server from configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("provider setup failed: {0}")]
    Provider(#[from] ProviderError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<FailoverRouter>,
    pub breakers: Arc<CircuitBreakerRegistry>,
    pub admin: AdminConfig,
}

/// Query parameters of the lookup endpoint. All three are required.
#[derive(Debug, Deserialize)]
pub struct AccountQuery {
    pub iban: String,
    pub country: String,
    pub currency: String,
}

/// HTTP server for the account lookup service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Build the server and every collaborator from configuration.
    pub fn new(config: ServiceConfig) -> Result<Self, ServerError> {
        let primary = Arc::new(HttpProvider::from_config(&config.providers.primary)?);
        let secondary = Arc::new(HttpProvider::from_config(&config.providers.secondary)?);

        let breakers = Arc::new(CircuitBreakerRegistry::from_config(&config));
        let lookup_router = Arc::new(FailoverRouter::new(
            primary,
            secondary,
            breakers.breaker(LOOKUP_ACCOUNT),
            config.resilience_for(LOOKUP_ACCOUNT).call_timeout(),
        ));

        tracing::info!(
            primary = %config.providers.primary.name,
            secondary = %config.providers.secondary.name,
            "Lookup providers configured"
        );

        Ok(Self::with_router(config, lookup_router, breakers))
    }

    /// Build the server around an already composed router.
    pub fn with_router(
        config: ServiceConfig,
        lookup_router: Arc<FailoverRouter>,
        breakers: Arc<CircuitBreakerRegistry>,
    ) -> Self {
        let state = AppState {
            router: lookup_router,
            breakers,
            admin: config.admin.clone(),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let mut routes = Router::new()
            .route("/v1/accountlookup/account", get(lookup_handler))
            .route("/health", get(health_handler));

        if config.admin.enabled {
            routes = routes.merge(admin::routes(state.clone()));
        }

        routes
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.listener.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID.clone(), MakeRequestUuidV4))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            admin_enabled = self.config.admin.enabled,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Account lookup endpoint.
async fn lookup_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<AccountQuery>,
) -> Result<Json<LookupResult>, ApiError> {
    let request_id = request_id(&headers);
    tracing::debug!(
        request_id = %request_id,
        iban = %query.iban,
        country = %query.country,
        currency = %query.currency,
        "lookupBank"
    );

    let request = LookupRequest::new(query.iban, query.country, query.currency);
    match state.router.lookup_account(&request).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            tracing::info!(request_id = %request_id, error = %e, "Lookup did not succeed");
            Err(ApiError::from(e))
        }
    }
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LookupError;
    use crate::provider::ProviderClient;
    use crate::resilience::{CircuitBreaker, CircuitBreakerSettings};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    struct Unreachable(&'static str);

    #[async_trait]
    impl ProviderClient for Unreachable {
        fn name(&self) -> &str {
            self.0
        }

        async fn lookup(&self, _request: &LookupRequest) -> Result<LookupResult, LookupError> {
            Err(LookupError::Unavailable("connection refused".into()))
        }
    }

    fn app(admin_enabled: bool) -> Router {
        let mut config = ServiceConfig::default();
        config.admin.enabled = admin_enabled;
        config.admin.api_key = "secret".into();

        let breakers = Arc::new(CircuitBreakerRegistry::default());
        let router = Arc::new(FailoverRouter::new(
            Arc::new(Unreachable("bank-one")),
            Arc::new(Unreachable("bank-two")),
            Arc::new(CircuitBreaker::new(LOOKUP_ACCOUNT, CircuitBreakerSettings::default())),
            Duration::from_secs(1),
        ));
        HttpServer::with_router(config, router, breakers).router
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let res = app(false).oneshot(get("/health")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_both_providers_down_is_500() {
        let res = app(false)
            .oneshot(get("/v1/accountlookup/account?iban=12345&country=UK&currency=GBP"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_admin_not_mounted_when_disabled() {
        let res = app(false).oneshot(get("/admin/status")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_requires_bearer_key() {
        let res = app(true).oneshot(get("/admin/status")).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let req = Request::builder()
            .uri("/admin/status")
            .header("authorization", "Bearer secret")
            .body(Body::empty())
            .unwrap();
        let res = app(true).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
