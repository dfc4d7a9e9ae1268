//! Core types and utilities for the Giga Token platform

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod config;
pub mod error;
pub mod format;
pub mod pager;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use pager::{PageControls, PageInfo, PageState, Pager};
pub use types::{HelpStatus, HelpTicket, Role, School};

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence over the configured level. A `format` of
/// `"json"` selects structured output; anything else prints plain lines.
///
/// # Errors
///
/// Returns an error if the level is not a valid filter or a global
/// subscriber is already installed.
pub fn init_logging(logging: &config::LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level).map_err(|e| Error::Configuration {
            message: format!("invalid log level '{}': {e}", logging.level),
        })?,
    };

    let json = logging.format.eq_ignore_ascii_case("json");

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .try_init()
        .map_err(|e| Error::Other(format!("failed to initialize logging: {e}")))
}
