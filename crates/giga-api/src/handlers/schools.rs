//! School catalog, registration and map endpoints

use crate::{
    error::ApiResult,
    extractors::{CurrentRole, pagination::Pagination},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use giga_core::{
    Role, School,
    types::{ApiResponse, Coordinates, NewSchool, SchoolMarker},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Map pin with its rendered popup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapMarker {
    /// Pin data
    #[serde(flatten)]
    pub marker: SchoolMarker,
    /// Escaped popup markup
    pub popup: String,
}

/// Everything the map page needs on first load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolMap {
    /// Where the map opens
    pub center: Coordinates,
    /// Approved schools with coordinates
    pub markers: Vec<MapMarker>,
}

/// Register an approved school (administrators only)
///
/// # Errors
///
/// Forbidden for non-admin roles; bad request for an incomplete or
/// malformed form.
pub async fn create_school(
    role: CurrentRole,
    State(state): State<Arc<AppState>>,
    Json(form): Json<NewSchool>,
) -> ApiResult<(StatusCode, Json<ApiResponse<School>>)> {
    role.require(Role::Admin)?;
    let school = state.store.create_school(form, true)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(school, "School registered")),
    ))
}

/// Submit a school for analysis
///
/// # Errors
///
/// Bad request for an incomplete or malformed form.
pub async fn submit_school(
    State(state): State<Arc<AppState>>,
    Json(form): Json<NewSchool>,
) -> ApiResult<(StatusCode, Json<ApiResponse<School>>)> {
    let school = state.store.create_school(form, false)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::success_with_message(
            school,
            "Registration received and waiting for analysis",
        )),
    ))
}

/// Page through approved schools ordered by name
///
/// # Errors
///
/// Bad request for an oversized page.
pub async fn list_schools(
    State(state): State<Arc<AppState>>,
    pagination: Pagination,
) -> ApiResult<Json<ApiResponse<Vec<School>>>> {
    let schools = state.store.approved_schools();
    let (page, info) = pagination.paginate(&schools, &state.config.pagination)?;

    Ok(Json(ApiResponse::paginated(page, info)))
}

/// Page through submissions waiting for analysis (administrators only)
///
/// # Errors
///
/// Forbidden for non-admin roles; bad request for an oversized page.
pub async fn list_pending_schools(
    role: CurrentRole,
    State(state): State<Arc<AppState>>,
    pagination: Pagination,
) -> ApiResult<Json<ApiResponse<Vec<School>>>> {
    role.require(Role::Admin)?;

    let schools = state.store.pending_schools();
    let (page, info) = pagination.paginate(&schools, &state.config.pagination)?;

    Ok(Json(ApiResponse::paginated(page, info)))
}

/// Approve a pending submission (administrators only)
///
/// # Errors
///
/// Forbidden for non-admin roles; not found for an unknown id; conflict if
/// the school is already approved.
pub async fn approve_school(
    role: CurrentRole,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<School>>> {
    role.require(Role::Admin)?;
    let school = state.store.approve_school(id)?;

    Ok(Json(ApiResponse::success_with_message(school, "School approved")))
}

/// Markers for every approved school with coordinates
pub async fn school_map(State(state): State<Arc<AppState>>) -> Json<ApiResponse<SchoolMap>> {
    let markers = state
        .store
        .markers()
        .into_iter()
        .map(|marker| MapMarker {
            popup: marker.popup_html(),
            marker,
        })
        .collect();

    Json(ApiResponse::success(SchoolMap {
        center: Coordinates::default(),
        markers,
    }))
}
