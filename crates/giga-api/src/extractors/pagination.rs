//! Pagination extractor for query parameters

use crate::extractors::ExtractorError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use giga_core::{Error, PageInfo, PageState, Pager, Result, config::PaginationConfig};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Pagination parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Pagination {
    /// Page number (1-based)
    #[validate(range(min = 1))]
    pub page: Option<u32>,

    /// Number of items per page
    #[validate(range(min = 1))]
    pub limit: Option<u32>,
}

impl Pagination {
    /// Requested page, defaulting to the first one
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(giga_core::pager::FIRST_PAGE)
    }

    /// Effective page size under the configured bounds
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `limit` exceeds `max_page_size`.
    pub fn limit(&self, config: &PaginationConfig) -> Result<u32> {
        match self.limit {
            Some(limit) if limit > config.max_page_size => Err(Error::validation(
                "limit",
                format!("must be at most {}", config.max_page_size),
            )),
            Some(limit) => Ok(limit),
            None => Ok(config.default_page_size),
        }
    }

    /// Cut the requested page out of `items`
    ///
    /// A page past the end is clamped to the last one; the returned
    /// [`PageInfo`] reports the page actually served.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the requested size is too large.
    pub fn paginate<T: Clone>(&self, items: &[T], config: &PaginationConfig) -> Result<(Vec<T>, PageInfo)> {
        let mut state = PageState::new(giga_core::pager::FIRST_PAGE, self.limit(config)?);
        let mut pager = Pager::new(items, &mut state);
        pager.go_to_page(self.page());

        if pager.current_page() != self.page() {
            tracing::debug!(
                requested = self.page(),
                served = pager.current_page(),
                "requested page clamped"
            );
        }

        Ok((pager.slice().to_vec(), pager.info()))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ExtractorError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> std::result::Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();

        let pagination: Self = serde_urlencoded::from_str(query)
            .map_err(|e| ExtractorError::bad_request(format!("Invalid pagination parameters: {e}")))?;

        if let Err(validation_errors) = pagination.validate() {
            return Err(ExtractorError::bad_request(format!(
                "Invalid pagination parameters: {validation_errors}"
            )));
        }

        Ok(pagination)
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode, Uri};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn create_test_parts_with_query(query: &str) -> Parts {
        let uri: Uri = format!("http://example.com/test?{query}").parse().unwrap();
        let request = Request::builder().uri(uri).body(()).unwrap();
        let (parts, _) = request.into_parts();
        parts
    }

    #[tokio::test]
    async fn test_pagination_extractor_with_page() {
        let mut parts = create_test_parts_with_query("page=2&limit=25");
        let pagination = Pagination::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(pagination.page(), 2);
        assert_eq!(pagination.limit(&PaginationConfig::default()).unwrap(), 25);
    }

    #[tokio::test]
    async fn test_pagination_extractor_defaults() {
        let mut parts = create_test_parts_with_query("");
        let pagination = Pagination::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.limit(&PaginationConfig::default()).unwrap(), 5);
    }

    #[rstest]
    #[case("page=0")]
    #[case("limit=0")]
    #[case("page=-3")]
    #[case("page=abc")]
    #[tokio::test]
    async fn test_pagination_extractor_rejects(#[case] query: &str) {
        let mut parts = create_test_parts_with_query(query);
        let err = Pagination::from_request_parts(&mut parts, &()).await.unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_limit_above_max_is_rejected() {
        let pagination = Pagination {
            page: None,
            limit: Some(101),
        };
        let err = pagination.limit(&PaginationConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "limit"));
    }

    #[test]
    fn test_paginate_middle_page() {
        let items: Vec<u32> = (0..12).collect();
        let pagination = Pagination {
            page: Some(2),
            limit: Some(5),
        };

        let (page, info) = pagination.paginate(&items, &PaginationConfig::default()).unwrap();

        assert_eq!(page, vec![5, 6, 7, 8, 9]);
        assert_eq!(info.page, 2);
        assert_eq!(info.total_pages, 3);
        assert!(info.has_next);
        assert!(info.has_prev);
    }

    #[test]
    fn test_paginate_clamps_page_past_end() {
        let items: Vec<u32> = (0..12).collect();
        let pagination = Pagination {
            page: Some(40),
            limit: None,
        };

        let (page, info) = pagination.paginate(&items, &PaginationConfig::default()).unwrap();

        assert_eq!(page, vec![10, 11]);
        assert_eq!(info.page, 3);
        assert!(!info.has_next);
    }

    #[test]
    fn test_paginate_empty_listing() {
        let items: Vec<u32> = Vec::new();
        let (page, info) = Pagination::default()
            .paginate(&items, &PaginationConfig::default())
            .unwrap();

        assert!(page.is_empty());
        assert_eq!(info.page, 1);
        assert_eq!(info.total_pages, 0);
        assert_eq!(info.total_count, 0);
    }
}
