//! Logging setup for processes embedding PointLink.
//!
//! The library itself only emits `tracing` events. Hosts that have no
//! subscriber of their own can install a console one here:
//! - Configurable via the RUST_LOG environment variable
//! - Falls back to the directive passed by the caller

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Errors from logging initialisation.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter directive: {0}")]
    InvalidFilter(#[from] ParseError),
}

/// Install a console subscriber filtered by `RUST_LOG`, or by
/// `default_directive` (e.g. `"info"` or `"pointlink=debug"`) if unset.
///
/// Returns `Ok(false)` if a global subscriber was already installed, so the
/// call is safe to repeat.
pub fn try_init_logging(default_directive: &str) -> Result<bool, LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive)?,
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok();
    Ok(installed)
}
