//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Lookup against the primary provider:
//!     → registry.rs (breaker for the logical operation)
//!     → circuit_breaker.rs (permit_call: closed / open / half-open trial)
//!     → timeouts.rs (bound the provider call)
//!     → circuit_breaker.rs (CallPermit::record_outcome: update window, maybe transition)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every provider call has a deadline
//! - No retries: a failed primary is failed over, never re-tried
//! - Circuit breaker is an explicit object injected into the router

pub mod circuit_breaker;
pub mod registry;
pub mod timeouts;

pub use circuit_breaker::{
    CallPermit, CircuitBreaker, CircuitBreakerSettings, CircuitBreakerSnapshot, CircuitState,
};
pub use registry::CircuitBreakerRegistry;
pub use timeouts::bounded;
