//! Tracing subscriber setup shared by all binaries

use crate::{Error, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the log filter
///
/// `RUST_LOG` wins when set; otherwise `default_directive` (e.g. "info" or
/// "fb_rv=debug,tower_http=info") is used.
pub fn build_filter(default_directive: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directive).map_err(|e| {
            Error::Config(format!("Invalid log level '{}': {}", default_directive, e))
        }),
    }
}

/// Install the global tracing subscriber (fmt layer + env filter)
///
/// Call once, first thing in `main`.
pub fn init_tracing(default_directive: &str) -> Result<()> {
    let filter = build_filter(default_directive)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to install tracing subscriber: {}", e)))
}
