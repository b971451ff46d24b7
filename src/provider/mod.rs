//! Upstream lookup providers.
//!
//! # Data Flow
//! ```text
//! LookupRequest
//!     → ProviderClient::lookup (primary or secondary, chosen by role)
//!     → http.rs: GET <base_url><path>?iban=&country=&currency=
//!     → 200 → LookupResult, 404 → NotFound, anything else → Unavailable
//! ```
//!
//! # Design Decisions
//! - Providers are interchangeable; the router only knows them by role
//! - Classification of HTTP responses happens here, never in the router

pub mod http;

use async_trait::async_trait;

use crate::lookup::{LookupError, LookupRequest, LookupResult};

pub use http::{HttpProvider, ProviderError};

/// A remote service able to resolve an account to routing metadata.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Identifier used in logs and metrics.
    fn name(&self) -> &str;

    /// Perform one lookup. Implementations must not retry internally.
    async fn lookup(&self, request: &LookupRequest) -> Result<LookupResult, LookupError>;
}
