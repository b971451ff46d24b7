//! Failover router.

use std::sync::Arc;
use std::time::Duration;

use crate::lookup::{LookupError, LookupOutcome, LookupRequest, LookupResult};
use crate::observability::metrics;
use crate::provider::ProviderClient;
use crate::resilience::{bounded, CircuitBreaker};

/// Logical operation name guarding the primary lookup.
pub const LOOKUP_ACCOUNT: &str = "lookupAccount";

/// Routes a lookup to the primary provider, failing over to the secondary.
pub struct FailoverRouter {
    primary: Arc<dyn ProviderClient>,
    secondary: Arc<dyn ProviderClient>,
    breaker: Arc<CircuitBreaker>,
    call_timeout: Duration,
}

impl FailoverRouter {
    pub fn new(
        primary: Arc<dyn ProviderClient>,
        secondary: Arc<dyn ProviderClient>,
        breaker: Arc<CircuitBreaker>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            primary,
            secondary,
            breaker,
            call_timeout,
        }
    }

    pub fn breaker(&self) -> &Arc<CircuitBreaker> {
        &self.breaker
    }

    /// Resolve one lookup to success, NotFound or Unavailable.
    pub async fn lookup_account(&self, request: &LookupRequest) -> Result<LookupResult, LookupError> {
        tracing::debug!(
            iban = %request.account_id,
            country = %request.country,
            currency = %request.currency,
            "Account lookup"
        );

        let result = self.route(request).await;
        metrics::record_lookup(LookupOutcome::of(&result));
        result
    }

    async fn route(&self, request: &LookupRequest) -> Result<LookupResult, LookupError> {
        if let Some(permit) = self.breaker.permit_call() {
            match bounded(self.call_timeout, self.primary.lookup(request)).await {
                Ok(result) => {
                    permit.record_outcome(true);
                    return Ok(result);
                }
                Err(LookupError::NotFound) => {
                    // A healthy provider answering "no such account".
                    permit.record_outcome(true);
                    tracing::debug!(
                        provider = %self.primary.name(),
                        iban = %request.account_id,
                        "Account lookup resulted in not found"
                    );
                    return Err(LookupError::NotFound);
                }
                Err(e) => {
                    permit.record_outcome(false);
                    tracing::error!(
                        provider = %self.primary.name(),
                        fallback = %self.secondary.name(),
                        error = %e,
                        "Primary lookup failed, failing over"
                    );
                }
            }
        } else {
            metrics::record_short_circuit(self.breaker.name());
            tracing::warn!(
                operation = %self.breaker.name(),
                fallback = %self.secondary.name(),
                "Circuit breaker refused primary call, failing over"
            );
        }

        tracing::debug!(
            provider = %self.secondary.name(),
            iban = %request.account_id,
            "Routing account lookup to secondary"
        );
        let result = bounded(self.call_timeout, self.secondary.lookup(request))
            .await
            .map_err(LookupError::into_terminal);

        if let Err(LookupError::Unavailable(detail)) = &result {
            tracing::error!(
                provider = %self.secondary.name(),
                error = %detail,
                "Secondary lookup failed, no providers left"
            );
        }
        result
    }
}
