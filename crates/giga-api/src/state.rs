//! Application state management

use crate::store::Store;
use chrono::{DateTime, Utc};
use giga_core::{Config, Result};

/// Shared application state
#[derive(Debug)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Tickets and schools
    pub store: Store,
    /// When the service started
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create new application state with an empty store
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            store: Store::new(),
            started_at: Utc::now(),
        })
    }

    /// Seconds since the service started
    #[must_use]
    pub fn uptime_seconds(&self) -> u64 {
        u64::try_from((Utc::now() - self.started_at).num_seconds()).unwrap_or(0)
    }
}
