//! Per-operation circuit breaker registry.
//!
//! # Responsibilities
//! - Hand out exactly one breaker per logical operation name
//! - Resolve breaker settings from the operation's resilience config
//! - Expose snapshots and administrative reset

use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{ResilienceConfig, ServiceConfig};
use crate::resilience::circuit_breaker::{
    CircuitBreaker, CircuitBreakerSettings, CircuitBreakerSnapshot,
};

/// Lazily populated set of breakers keyed by operation name.
#[derive(Debug, Default)]
pub struct CircuitBreakerRegistry {
    configs: HashMap<String, ResilienceConfig>,
    breakers: DashMap<String, Arc<CircuitBreaker>>,
}

impl CircuitBreakerRegistry {
    pub fn new(configs: HashMap<String, ResilienceConfig>) -> Self {
        Self {
            configs,
            breakers: DashMap::new(),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.resilience.clone())
    }

    /// Effective settings for an operation.
    pub fn config_for(&self, operation: &str) -> ResilienceConfig {
        self.configs.get(operation).cloned().unwrap_or_default()
    }

    /// The breaker for `operation`, created on first use.
    pub fn breaker(&self, operation: &str) -> Arc<CircuitBreaker> {
        if let Some(existing) = self.breakers.get(operation) {
            return existing.clone();
        }
        self.breakers
            .entry(operation.to_string())
            .or_insert_with(|| {
                let settings = CircuitBreakerSettings::from(&self.config_for(operation));
                tracing::debug!(operation = %operation, ?settings, "Circuit breaker created");
                Arc::new(CircuitBreaker::new(operation, settings))
            })
            .clone()
    }

    /// Look up an existing breaker without creating one.
    pub fn get(&self, operation: &str) -> Option<Arc<CircuitBreaker>> {
        self.breakers.get(operation).map(|b| b.clone())
    }

    /// Snapshots of every breaker, sorted by name.
    pub fn all(&self) -> Vec<CircuitBreakerSnapshot> {
        let mut snapshots: Vec<_> = self.breakers.iter().map(|b| b.snapshot()).collect();
        snapshots.sort_by(|a, b| a.name.cmp(&b.name));
        snapshots
    }

    /// Force a breaker back to Closed. Returns false for an unknown name.
    pub fn reset(&self, operation: &str) -> bool {
        match self.get(operation) {
            Some(breaker) => {
                breaker.reset();
                true
            }
            None => false,
        }
    }
}
