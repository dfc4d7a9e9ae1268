//! API route definitions

use crate::{error::ApiError, handlers, state::AppState};
use axum::{
    Router,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use giga_core::Error;
use std::{sync::Arc, time::Duration};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer};

/// Build the complete router with every route group and the shared middleware
pub fn build_router(request_timeout: Duration) -> Router<Arc<AppState>> {
    Router::new()
        .merge(health_routes())
        .merge(help_routes())
        .merge(school_routes())
        .route("/api/me", get(handlers::account::me))
        .fallback(not_found)
        .layer(CompressionLayer::new())
        .layer(timeout_layer(request_timeout))
}

/// Cut off requests running past `request_timeout` with 408
#[must_use]
pub fn timeout_layer(request_timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout)
}

/// Health check routes
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(handlers::health::health_check))
}

/// Help queue routes for providers and administrators
pub fn help_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/helps", post(handlers::helps::create_help))
        .route("/api/admin/helps/opened", get(handlers::helps::list_opened))
        .route("/api/admin/helps/closed", get(handlers::helps::list_closed))
        .route("/api/admin/helps/:id/close", post(handlers::helps::close_help))
        .route("/api/admin/helps/:id/answer", post(handlers::helps::answer_help))
}

/// School catalog, registration and map routes
pub fn school_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/schools", get(handlers::schools::list_schools))
        .route("/api/schools/map", get(handlers::schools::school_map))
        .route("/api/schools/pending", post(handlers::schools::submit_school))
        .route("/api/admin/schools", post(handlers::schools::create_school))
        .route(
            "/api/admin/schools/pending",
            get(handlers::schools::list_pending_schools),
        )
        .route(
            "/api/admin/schools/:id/approve",
            post(handlers::schools::approve_school),
        )
}

async fn not_found(uri: Uri) -> Response {
    ApiError(Error::not_found(format!("route {}", uri.path()))).into_response()
}
