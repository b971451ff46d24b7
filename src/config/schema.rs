//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Root configuration for the account lookup service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address, inbound deadline).
    pub listener: ListenerConfig,

    /// Upstream lookup providers, in priority order.
    pub providers: ProvidersConfig,

    /// Circuit breaker and timeout settings keyed by logical operation name.
    pub resilience: HashMap<String, ResilienceConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Admin endpoints.
    pub admin: AdminConfig,
}

impl ServiceConfig {
    /// Effective resilience settings for an operation.
    ///
    /// Operations without their own section fall back to the defaults.
    pub fn resilience_for(&self, operation: &str) -> ResilienceConfig {
        self.resilience.get(operation).cloned().unwrap_or_default()
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Outer deadline for a whole inbound request in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// The primary/secondary provider pair.
///
/// Each role has its own defaults; a partially written section keeps the
/// defaults of its role for every field it leaves out.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(from = "ProvidersOverrides")]
pub struct ProvidersConfig {
    pub primary: ProviderConfig,
    pub secondary: ProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            primary: ProviderConfig {
                name: "bank-one".to_string(),
                base_url: "http://localhost:8081".to_string(),
                path: "/bankone/api/account".to_string(),
                connect_timeout_ms: default_connect_timeout_ms(),
            },
            secondary: ProviderConfig {
                name: "bank-two".to_string(),
                base_url: "http://localhost:8082".to_string(),
                path: "/banktwo/api/account".to_string(),
                connect_timeout_ms: default_connect_timeout_ms(),
            },
        }
    }
}

/// A single upstream provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderConfig {
    /// Provider identifier for logging/metrics.
    pub name: String,

    /// Scheme, host and port (e.g., "http://127.0.0.1:3000").
    pub base_url: String,

    /// Lookup path on the provider.
    pub path: String,

    /// TCP connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
}

/// Provider fields as written in the file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProviderOverrides {
    name: Option<String>,
    base_url: Option<String>,
    path: Option<String>,
    connect_timeout_ms: Option<u64>,
}

impl ProviderOverrides {
    fn apply(self, base: ProviderConfig) -> ProviderConfig {
        ProviderConfig {
            name: self.name.unwrap_or(base.name),
            base_url: self.base_url.unwrap_or(base.base_url),
            path: self.path.unwrap_or(base.path),
            connect_timeout_ms: self.connect_timeout_ms.unwrap_or(base.connect_timeout_ms),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProvidersOverrides {
    primary: ProviderOverrides,
    secondary: ProviderOverrides,
}

impl From<ProvidersOverrides> for ProvidersConfig {
    fn from(overrides: ProvidersOverrides) -> Self {
        let defaults = ProvidersConfig::default();
        Self {
            primary: overrides.primary.apply(defaults.primary),
            secondary: overrides.secondary.apply(defaults.secondary),
        }
    }
}

fn default_connect_timeout_ms() -> u64 {
    1000
}

/// Circuit breaker and call timeout settings for one logical operation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ResilienceConfig {
    /// Number of most recent primary outcomes kept in the rolling window.
    pub window_size: usize,

    /// Outcomes required in the window before the failure rate is evaluated.
    pub minimum_calls: usize,

    /// Failure rate (percent) at or above which the breaker opens.
    pub failure_rate_threshold: f64,

    /// How long the breaker stays open before allowing trial calls.
    pub open_duration_ms: u64,

    /// Trial calls permitted while half-open.
    pub half_open_trial_calls: u32,

    /// Deadline for each individual provider call.
    pub call_timeout_ms: u64,
}

impl ResilienceConfig {
    pub fn open_duration(&self) -> Duration {
        Duration::from_millis(self.open_duration_ms)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            window_size: 100,
            minimum_calls: 10,
            failure_rate_threshold: 50.0,
            open_duration_ms: 60_000,
            half_open_trial_calls: 3,
            call_timeout_ms: 5_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Mount the admin endpoints.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
        }
    }
}
