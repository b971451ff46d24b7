//! Account lookup domain.
//!
//! # Data Flow
//! ```text
//! inbound query (iban, country, currency)
//!     → LookupRequest
//!     → routing::FailoverRouter
//!     → Ok(LookupResult) | Err(LookupError::{NotFound, Unavailable})
//! ```
//!
//! # Design Decisions
//! - Requests are opaque: no validation of the account identifier or ISO codes
//! - A LookupResult only ever comes from a provider success
//! - NotFound only ever comes from a provider's authoritative negative answer

pub mod types;

pub use types::{LookupError, LookupOutcome, LookupRequest, LookupResult};
