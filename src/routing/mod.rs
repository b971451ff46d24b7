//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! LookupRequest
//!     → router.rs (breaker gate)
//!     → primary provider (when permitted)
//!         success   → return
//!         NotFound  → return (authoritative, never failed over)
//!         failure   → record, fall through
//!     → secondary provider (breaker refused or primary failed)
//!     → success | NotFound | Unavailable
//! ```
//!
//! # Design Decisions
//! - At most one primary call and one secondary call per lookup
//! - Providers are injected by role, the breaker is injected explicitly
//! - Every lookup resolves to exactly one of success / NotFound / Unavailable

pub mod router;

pub use router::{FailoverRouter, LOOKUP_ACCOUNT};
