//! Help queue endpoints
//!
//! Providers open tickets; administrators page through the opened and
//! closed queues and either close a ticket or answer it.

use crate::{
    error::ApiResult,
    extractors::{CurrentRole, CurrentUser, pagination::Pagination},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use giga_core::{
    HelpStatus, HelpTicket, Role,
    types::{AnswerRequest, ApiResponse, NewHelpTicket},
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Open a help ticket (providers only)
///
/// # Errors
///
/// Forbidden for non-provider roles; bad request for an incomplete or
/// malformed form.
pub async fn create_help(
    role: CurrentRole,
    State(state): State<Arc<AppState>>,
    Json(form): Json<NewHelpTicket>,
) -> ApiResult<(StatusCode, Json<ApiResponse<HelpTicket>>)> {
    role.require(Role::Isp)?;
    let ticket = state.store.open_ticket(form)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            ticket,
            "Your request was sent to the program team",
        )),
    ))
}

/// Page through tickets waiting for an answer
///
/// # Errors
///
/// Forbidden for non-admin roles; bad request for an oversized page.
pub async fn list_opened(
    role: CurrentRole,
    State(state): State<Arc<AppState>>,
    pagination: Pagination,
) -> ApiResult<Json<ApiResponse<Vec<HelpTicket>>>> {
    list_with_status(role, &state, &pagination, HelpStatus::Opened)
}

/// Page through tickets already handled
///
/// # Errors
///
/// Forbidden for non-admin roles; bad request for an oversized page.
pub async fn list_closed(
    role: CurrentRole,
    State(state): State<Arc<AppState>>,
    pagination: Pagination,
) -> ApiResult<Json<ApiResponse<Vec<HelpTicket>>>> {
    list_with_status(role, &state, &pagination, HelpStatus::Closed)
}

fn list_with_status(
    role: CurrentRole,
    state: &AppState,
    pagination: &Pagination,
    status: HelpStatus,
) -> ApiResult<Json<ApiResponse<Vec<HelpTicket>>>> {
    role.require(Role::Admin)?;

    let tickets = state.store.tickets_with_status(status);
    let (page, info) = pagination.paginate(&tickets, &state.config.pagination)?;
    debug!(?status, page = info.page, total = info.total_count, "listing help tickets");

    Ok(Json(ApiResponse::paginated(page, info)))
}

/// Close a ticket without answering it
///
/// The closing operator comes from the gateway's user header.
///
/// # Errors
///
/// Unauthorized without an operator login; forbidden for non-admin roles;
/// not found for an unknown id; conflict if the ticket is already closed.
pub async fn close_help(
    role: CurrentRole,
    CurrentUser(user): CurrentUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<HelpTicket>>> {
    role.require(Role::Admin)?;
    let ticket = state.store.close_ticket(id, &user, role.0)?;

    Ok(Json(ApiResponse::success_with_message(ticket, "Ticket closed")))
}

/// Answer a ticket, which also closes it
///
/// # Errors
///
/// Unauthorized without an operator login; forbidden for non-admin roles;
/// not found for an unknown id; conflict if the ticket is already closed;
/// bad request for a blank answer.
pub async fn answer_help(
    role: CurrentRole,
    CurrentUser(user): CurrentUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> ApiResult<Json<ApiResponse<HelpTicket>>> {
    role.require(Role::Admin)?;
    let ticket = state.store.answer_ticket(id, request, &user, role.0)?;

    Ok(Json(ApiResponse::success_with_message(ticket, "Answer sent")))
}
