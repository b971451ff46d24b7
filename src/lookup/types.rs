//! Account lookup types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single account lookup, passed through to the providers untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    /// Account identifier (IBAN or local account number).
    #[serde(rename = "iban")]
    pub account_id: String,
    pub country: String,
    pub currency: String,
}

impl LookupRequest {
    pub fn new(
        account_id: impl Into<String>,
        country: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            country: country.into(),
            currency: currency.into(),
        }
    }
}

/// Routing metadata for an account, as answered by a provider.
///
/// Serialized as `{"bankName", "iban", "routingNumber"}`, which is both the
/// provider wire format and the inbound response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
    pub bank_name: String,
    #[serde(rename = "iban")]
    pub account_id: String,
    pub routing_number: String,
}

/// Classified lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The provider answered authoritatively that the account does not exist.
    #[error("account not found")]
    NotFound,

    /// The provider could not be reached, timed out, or failed server-side.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The provider answered with a body that could not be understood.
    #[error("invalid provider response: {0}")]
    Invalid(String),
}

impl LookupError {
    /// Returns true for the authoritative negative answer.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound)
    }

    /// Collapse every non-NotFound failure into `Unavailable`.
    pub fn into_terminal(self) -> Self {
        match self {
            LookupError::Invalid(detail) => LookupError::Unavailable(detail),
            other => other,
        }
    }
}

/// Coarse outcome label used for logging and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    Success,
    NotFound,
    Unavailable,
}

impl LookupOutcome {
    pub fn of<T>(result: &Result<T, LookupError>) -> Self {
        match result {
            Ok(_) => LookupOutcome::Success,
            Err(LookupError::NotFound) => LookupOutcome::NotFound,
            Err(_) => LookupOutcome::Unavailable,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LookupOutcome::Success => "success",
            LookupOutcome::NotFound => "not_found",
            LookupOutcome::Unavailable => "unavailable",
        }
    }
}
