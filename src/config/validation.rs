//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, thresholds within bounds)
//! - Validate addresses and provider URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::{ProviderConfig, ResilienceConfig, ServiceConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate the whole configuration, collecting every error.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new("listener.request_timeout_secs", "must be > 0"));
    }

    validate_provider("providers.primary", &config.providers.primary, &mut errors);
    validate_provider("providers.secondary", &config.providers.secondary, &mut errors);

    let mut operations: Vec<_> = config.resilience.iter().collect();
    operations.sort_by(|a, b| a.0.cmp(b.0));
    for (name, ops) in operations {
        validate_resilience(&format!("resilience.{}", name), ops, &mut errors);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if config.admin.enabled && config.admin.api_key.trim().is_empty() {
        errors.push(ValidationError::new(
            "admin.api_key",
            "must be set when admin endpoints are enabled",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_provider(prefix: &str, provider: &ProviderConfig, errors: &mut Vec<ValidationError>) {
    if provider.name.trim().is_empty() {
        errors.push(ValidationError::new(format!("{}.name", prefix), "must not be empty"));
    }
    match Url::parse(&provider.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            format!("{}.base_url", prefix),
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            format!("{}.base_url", prefix),
            format!("'{}' is not a valid URL: {}", provider.base_url, e),
        )),
    }
    if !provider.path.starts_with('/') {
        errors.push(ValidationError::new(format!("{}.path", prefix), "must start with '/'"));
    }
    if provider.connect_timeout_ms == 0 {
        errors.push(ValidationError::new(format!("{}.connect_timeout_ms", prefix), "must be > 0"));
    }
}

fn validate_resilience(prefix: &str, ops: &ResilienceConfig, errors: &mut Vec<ValidationError>) {
    if ops.window_size == 0 {
        errors.push(ValidationError::new(format!("{}.window_size", prefix), "must be > 0"));
    }
    if ops.minimum_calls == 0 || ops.minimum_calls > ops.window_size {
        errors.push(ValidationError::new(
            format!("{}.minimum_calls", prefix),
            format!("must be between 1 and window_size ({})", ops.window_size),
        ));
    }
    if !(ops.failure_rate_threshold > 0.0 && ops.failure_rate_threshold <= 100.0) {
        errors.push(ValidationError::new(
            format!("{}.failure_rate_threshold", prefix),
            "must be in (0, 100]",
        ));
    }
    if ops.open_duration_ms == 0 {
        errors.push(ValidationError::new(format!("{}.open_duration_ms", prefix), "must be > 0"));
    }
    if ops.half_open_trial_calls == 0 {
        errors.push(ValidationError::new(
            format!("{}.half_open_trial_calls", prefix),
            "must be > 0",
        ));
    }
    if ops.call_timeout_ms == 0 {
        errors.push(ValidationError::new(format!("{}.call_timeout_ms", prefix), "must be > 0"));
    }
}
