//! Caller identity endpoint

use crate::extractors::CurrentRole;
use axum::response::Json;
use giga_core::Role;
use serde::{Deserialize, Serialize};

/// What the front end needs to pick a dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResponse {
    /// Role presented by the caller, if any
    pub role: Option<Role>,
    /// Whether the caller may use the admin dashboard
    pub is_admin: bool,
    /// Whether the caller is an internet service provider
    pub is_isp: bool,
}

/// Report the caller's role
///
/// Anonymous callers get `role: null` rather than an error so the landing
/// page can still render.
pub async fn me(role: Option<CurrentRole>) -> Json<AccountResponse> {
    let role = role.map(|CurrentRole(role)| role);

    Json(AccountResponse {
        role,
        is_admin: role == Some(Role::Admin),
        is_isp: role == Some(Role::Isp),
    })
}
