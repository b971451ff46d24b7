//! Inbound HTTP adapter.
//!
//! # Data Flow
//! ```text
//! GET /v1/accountlookup/account?iban=&country=&currency=
//!     → request.rs (request ID)
//!     → server.rs (extract query, call routing::FailoverRouter)
//!     → response.rs (NotFound → 404, Unavailable → 500)
//!     → 200 {"bankName","iban","routingNumber"}
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id, MakeRequestUuidV4, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{AppState, HttpServer, ServerError};
