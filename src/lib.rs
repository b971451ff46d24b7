//! Account lookup service library.
//!
//! Resolves an account identifier (plus country and currency) to routing
//! metadata by asking a primary provider, failing over to a secondary one
//! when the primary is unhealthy or its circuit breaker is open.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod lookup;
pub mod observability;
pub mod provider;
pub mod resilience;
pub mod routing;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use lookup::{LookupError, LookupRequest, LookupResult};
pub use routing::FailoverRouter;
