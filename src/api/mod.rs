//! The citizen-facing HTTP surface.
//!
//! A composable axum `Router` over shared [`crate::core_state::CoreState`],
//! one endpoint module per screen, structured JSON errors. No auth
//! middleware: identification here is prefill convenience, not security.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod types;

pub use router::api_router;
pub use types::ApiContext;
