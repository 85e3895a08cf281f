//! # Feedback Common Library
//!
//! Shared code for the feedback review service and its dashboard:
//! - Wire types (review records, response envelope)
//! - Configuration loading
//! - Logging setup
//! - Common error type

pub mod api;
pub mod config;
pub mod error;
pub mod logging;

pub use api::{AiAction, Envelope, ReviewRecord};
pub use error::{Error, Result};
