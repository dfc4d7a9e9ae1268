//! HTTP mapping for domain errors

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use giga_core::{Error, types::ErrorResponse};
use serde_json::json;
use tracing::error;

/// Domain error carried out of a handler
#[derive(Debug)]
pub struct ApiError(pub Error);

/// Handler result
pub type ApiResult<T> = Result<T, ApiError>;

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// Status code and stable error code for the wrapped error
    #[must_use]
    pub const fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            Error::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Error::IncompleteFields { .. } => (StatusCode::BAD_REQUEST, "INCOMPLETE_FIELDS"),
            Error::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Error::Forbidden { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Error::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Error::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Error::Io(_)
            | Error::Configuration { .. }
            | Error::Serialization(_)
            | Error::Other(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = match &self.0 {
            Error::IncompleteFields { fields } => {
                ErrorResponse::with_details(self.0.to_string(), code, json!({ "fields": fields }))
            }
            Error::Validation { field, .. } => {
                ErrorResponse::with_details(self.0.to_string(), code, json!({ "field": field }))
            }
            other if status.is_server_error() => {
                error!(error = %other, "request failed");
                ErrorResponse::new("Internal server error", code)
            }
            other => ErrorResponse::new(other.to_string(), code),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Error::validation("email", "invalid"), StatusCode::BAD_REQUEST)]
    #[case(Error::IncompleteFields { fields: vec!["name".into()] }, StatusCode::BAD_REQUEST)]
    #[case(Error::Unauthorized("missing role".into()), StatusCode::UNAUTHORIZED)]
    #[case(Error::Forbidden { required: "admin".into() }, StatusCode::FORBIDDEN)]
    #[case(Error::not_found("ticket 1"), StatusCode::NOT_FOUND)]
    #[case(Error::Conflict("already closed".into()), StatusCode::CONFLICT)]
    #[case(Error::Other("boom".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_status_mapping(#[case] err: Error, #[case] expected: StatusCode) {
        assert_eq!(ApiError(err).into_response().status(), expected);
    }

    #[tokio::test]
    async fn test_incomplete_fields_body_lists_fields() {
        let response = ApiError(Error::IncompleteFields {
            fields: vec!["name".into(), "city".into()],
        })
        .into_response();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["code"], "INCOMPLETE_FIELDS");
        assert_eq!(body["details"]["fields"], json!(["name", "city"]));
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_internal_error_hides_message() {
        let response = ApiError(Error::Other("secret detail".into())).into_response();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["error"], "Internal server error");
    }
}
