//! HTTP provider client.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::{Duration, Instant};
use thiserror::Error;
use url::Url;

use crate::config::ProviderConfig;
use crate::lookup::{LookupError, LookupOutcome, LookupRequest, LookupResult};
use crate::observability::metrics;
use crate::provider::ProviderClient;

/// Error building a provider from configuration.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("invalid provider url '{url}': {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Provider reached over HTTP with a JSON body.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    name: String,
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpProvider {
    pub fn new(name: impl Into<String>, endpoint: Url, client: reqwest::Client) -> Self {
        Self {
            name: name.into(),
            endpoint,
            client,
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let raw = format!("{}{}", config.base_url.trim_end_matches('/'), config.path);
        let endpoint = Url::parse(&raw).map_err(|source| ProviderError::Url { url: raw, source })?;

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()?;

        Ok(Self::new(config.name.clone(), endpoint, client))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn fetch(&self, request: &LookupRequest) -> Result<LookupResult, LookupError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("iban", request.account_id.as_str()),
                ("country", request.country.as_str()),
                ("currency", request.currency.as_str()),
            ])
            .send()
            .await
            .map_err(|e| LookupError::Unavailable(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json::<LookupResult>()
                .await
                .map_err(|e| LookupError::Invalid(e.to_string())),
            StatusCode::NOT_FOUND => Err(LookupError::NotFound),
            status => Err(LookupError::Unavailable(format!("upstream returned {}", status))),
        }
    }
}

#[async_trait]
impl ProviderClient for HttpProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn lookup(&self, request: &LookupRequest) -> Result<LookupResult, LookupError> {
        let start = Instant::now();
        let result = self.fetch(request).await;

        match &result {
            Ok(_) | Err(LookupError::NotFound) => {}
            Err(e) => tracing::warn!(provider = %self.name, error = %e, "Provider call failed"),
        }
        metrics::record_provider_call(&self.name, LookupOutcome::of(&result), start);
        result
    }
}
