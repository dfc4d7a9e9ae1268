//! Giga Token API server library

#![forbid(unsafe_code)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod store;

pub use state::AppState;

use axum::Router;
use giga_core::{Config, Result};
use std::{sync::Arc, time::Duration};

/// Build the API router with all routes and middleware
///
/// # Errors
///
/// Returns an error if the configuration fails validation.
pub fn build_router(config: Config) -> Result<Router> {
    let state = Arc::new(AppState::new(config)?);
    Ok(build_router_with_state(state))
}

/// Build the router around existing state
///
/// Tests use this to seed the store before issuing requests.
pub fn build_router_with_state(state: Arc<AppState>) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout);
    routes::build_router(timeout).with_state(state)
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn test_build_router_accepts_defaults() {
        assert!(build_router(Config::default()).is_ok());
    }

    #[test]
    fn test_build_router_rejects_invalid_config() {
        let mut config = Config::default();
        config.pagination.default_page_size = 0;

        assert!(build_router(config).is_err());
    }
}
