//! Shared HTTP API types
//!
//! Used by the review service (fb-rv) to render responses and by the
//! dashboard (fb-dash) to decode them. Contains only serde types, no HTTP
//! framework dependencies.

pub mod types;

pub use types::{AiAction, Envelope, ReviewRecord};
