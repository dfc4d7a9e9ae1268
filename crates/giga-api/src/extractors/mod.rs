//! Custom extractors for request processing

pub mod pagination;

use crate::error::ApiError;
use axum::{
    Json, async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use giga_core::{Error, Role, types::ErrorResponse};
use std::fmt;

/// Header carrying the caller's role, set by the identity gateway
pub const ROLE_HEADER: &str = "x-giga-role";

/// Header carrying the caller's login, set by the identity gateway
pub const USER_HEADER: &str = "x-giga-user";

/// Custom error type for extractors
#[derive(Debug)]
pub struct ExtractorError {
    /// Error message
    pub message: String,
    /// HTTP status code
    pub status: StatusCode,
    /// Error code for API responses
    pub code: String,
}

impl ExtractorError {
    /// Create a new extractor error
    pub fn new(message: impl Into<String>, status: StatusCode, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status,
            code: code.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::BAD_REQUEST, "BAD_REQUEST")
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::UNAUTHORIZED, "UNAUTHORIZED")
    }
}

impl fmt::Display for ExtractorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ExtractorError {}

impl IntoResponse for ExtractorError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse::new(self.message, self.code))).into_response()
    }
}

/// Role of the caller, read from [`ROLE_HEADER`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentRole(pub Role);

impl CurrentRole {
    /// Allow the request through only for `required`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Forbidden`] when the caller holds another role.
    pub fn require(self, required: Role) -> Result<(), ApiError> {
        if self.0 == required {
            Ok(())
        } else {
            tracing::warn!(role = %self.0, required = %required, "role check failed");
            Err(Error::Forbidden {
                required: required.to_string(),
            }
            .into())
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentRole
where
    S: Send + Sync,
{
    type Rejection = ExtractorError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ROLE_HEADER)
            .ok_or_else(|| ExtractorError::unauthorized("Missing role header"))?
            .to_str()
            .map_err(|_| ExtractorError::unauthorized("Role header is not valid text"))?;

        raw.parse::<Role>()
            .map(Self)
            .map_err(|_| ExtractorError::unauthorized(format!("Unknown role '{raw}'")))
    }
}

/// Login of the operator making the request, read from [`USER_HEADER`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ExtractorError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(USER_HEADER)
            .ok_or_else(|| ExtractorError::unauthorized("Missing user header"))?
            .to_str()
            .map_err(|_| ExtractorError::unauthorized("User header is not valid text"))?
            .trim();

        if user.is_empty() {
            return Err(ExtractorError::unauthorized("User header is empty"));
        }
        Ok(Self(user.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;
    use pretty_assertions::assert_eq;

    fn parts_with_role(role: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("http://example.com/api/me");
        if let Some(role) = role {
            builder = builder.header(ROLE_HEADER, role);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_role_from_header() {
        let mut parts = parts_with_role(Some("Admin"));
        let role = CurrentRole::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(role, CurrentRole(Role::Admin));
    }

    #[tokio::test]
    async fn test_missing_role_is_unauthorized() {
        let mut parts = parts_with_role(None);
        let err = CurrentRole::from_request_parts(&mut parts, &()).await.unwrap_err();

        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_role_is_unauthorized() {
        let mut parts = parts_with_role(Some("superuser"));
        let err = CurrentRole::from_request_parts(&mut parts, &()).await.unwrap_err();

        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert!(err.message.contains("superuser"));
    }

    #[tokio::test]
    async fn test_user_from_header() {
        let mut parts = Request::builder()
            .uri("http://example.com/api/admin/helps")
            .header(USER_HEADER, " ana@giga.org ")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        let user = CurrentUser::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(user, CurrentUser("ana@giga.org".to_string()));
    }

    #[tokio::test]
    async fn test_missing_or_blank_user_is_unauthorized() {
        let mut parts = parts_with_role(Some("admin"));
        let err = CurrentUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);

        let mut parts = Request::builder()
            .uri("http://example.com/")
            .header(USER_HEADER, "  ")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        let err = CurrentUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_require_role() {
        assert!(CurrentRole(Role::Admin).require(Role::Admin).is_ok());

        let err = CurrentRole(Role::Isp).require(Role::Admin).unwrap_err();
        assert_eq!(err.status_and_code().0, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_extractor_error_display() {
        let err = ExtractorError::bad_request("bad page");
        assert_eq!(err.to_string(), "BAD_REQUEST: bad page");
    }
}
