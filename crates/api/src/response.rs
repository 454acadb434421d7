//! API response types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Standard API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response.
    pub const fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Empty success response. Deletions answer 200 with no body, the
/// same status every other success uses.
#[must_use]
pub fn ok() -> impl IntoResponse {
    StatusCode::OK
}

/// One page of a listing plus the figures the pager needs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T: Serialize> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl<T: Serialize> Paginated<T> {
    /// Assemble the envelope for one page.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        Self {
            items,
            total,
            page,
            limit,
        }
    }
}

const DEFAULT_LIMIT: u64 = 10;
const MAX_LIMIT: u64 = 100;

const fn default_page() -> u64 {
    1
}

const fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

/// Common pagination query parameters. Pages are 1-indexed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub search: Option<String>,
}

impl PageQuery {
    /// The page number, clamped to the first page for out-of-range input.
    #[must_use]
    pub fn page(&self) -> u64 {
        self.page.max(1)
    }

    /// The page size, capped so one request cannot drain a table.
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit.clamp(1, MAX_LIMIT)
    }

    /// Search term with blank input treated as no filter.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn page_query_clamps_limit() {
        let query = PageQuery {
            page: 0,
            limit: 5000,
            search: None,
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), 100);
    }

    #[test]
    fn page_query_blank_search_is_none() {
        let query = PageQuery {
            page: 1,
            limit: 10,
            search: Some("   ".to_string()),
        };
        assert!(query.search().is_none());
    }

    #[test]
    fn paginated_serializes_camel_case() {
        let page = Paginated::new(vec![1, 2, 3], 30, 2, 10);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["items"].as_array().unwrap().len(), 3);
        assert_eq!(json["total"], 30);
        assert_eq!(json["page"], 2);
        assert_eq!(json["limit"], 10);
    }
}
