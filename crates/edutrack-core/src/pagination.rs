//! Pagination utilities for list endpoints.
//!
//! Lists are paginated with two query parameters:
//! - `skip`: Number of rows to skip from the beginning (default: 0)
//! - `limit`: Maximum number of rows to return (1-500, default: 100)
//!
//! Every list response carries a [`PaginationMeta`] next to its rows, which
//! reports the total row count matching the filters so clients can tell
//! whether another page exists.
//!
//! # Example
//!
//! ```ignore
//! async fn list_students(
//!     Query(params): Query<PaginationParams>,
//! ) -> Result<Json<PaginatedStudentsResponse>, AppError> {
//!     let students = fetch_students(params.limit(), params.skip()).await?;
//!     let total = count_students().await?;
//!
//!     Ok(Json(PaginatedStudentsResponse {
//!         data: students,
//!         meta: PaginationMeta::new(total, &params),
//!     }))
//! }
//! ```

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::serde::deserialize_optional_from_str;

pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 500;

/// Metadata about a paginated response.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "data": [...],
///   "meta": {
///     "total": 230,
///     "limit": 100,
///     "skip": 200,
///     "has_more": false
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of rows matching the filters
    pub total: i64,
    /// Maximum rows per page (the limit that was applied)
    pub limit: i64,
    /// Number of rows skipped
    pub skip: i64,
    /// Whether there are more rows after this page
    pub has_more: bool,
}

impl PaginationMeta {
    #[must_use]
    pub fn new(total: i64, params: &PaginationParams) -> Self {
        let limit = params.limit();
        let skip = params.skip();
        Self {
            total,
            limit,
            skip,
            has_more: skip.saturating_add(limit) < total,
        }
    }
}

/// Query parameters for pagination.
///
/// # Limits
///
/// - `limit` is clamped to the range [1, 500]
/// - `skip` is clamped to a minimum of 0
#[derive(Debug, Clone, Hash, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Number of rows to skip (default: 0)
    #[serde(default, alias = "offset", deserialize_with = "deserialize_optional_from_str")]
    pub skip: Option<i64>,
    /// Maximum number of rows to return (1-500, default: 100)
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub limit: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            skip: Some(0),
            limit: Some(DEFAULT_LIMIT),
        }
    }
}

impl PaginationParams {
    /// Returns the effective limit, clamped to [1, 500].
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Returns the effective number of rows to skip.
    #[must_use]
    pub fn skip(&self) -> i64 {
        self.skip.unwrap_or(0).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_params_default() {
        let params = PaginationParams::default();
        assert_eq!(params.skip(), 0);
        assert_eq!(params.limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn test_pagination_params_custom_values() {
        let params = PaginationParams {
            skip: Some(40),
            limit: Some(20),
        };
        assert_eq!(params.limit(), 20);
        assert_eq!(params.skip(), 40);
    }

    #[test]
    fn test_pagination_params_limit_boundary_cases() {
        let test_cases = vec![
            (Some(1), 1),
            (Some(50), 50),
            (Some(500), 500),
            (Some(501), 500),
            (Some(0), 1),
            (Some(-1), 1),
            (None, DEFAULT_LIMIT),
        ];

        for (input, expected) in test_cases {
            let params = PaginationParams {
                skip: None,
                limit: input,
            };
            assert_eq!(params.limit(), expected);
        }
    }

    #[test]
    fn test_pagination_params_negative_skip() {
        let params = PaginationParams {
            skip: Some(-5),
            limit: None,
        };
        assert_eq!(params.skip(), 0);
    }

    #[test]
    fn test_pagination_meta_has_more() {
        let params = PaginationParams {
            skip: Some(0),
            limit: Some(10),
        };
        assert!(PaginationMeta::new(11, &params).has_more);
        assert!(!PaginationMeta::new(10, &params).has_more);
        assert!(!PaginationMeta::new(0, &params).has_more);
    }

    #[test]
    fn test_pagination_meta_with_maximum_skip() {
        let params = PaginationParams {
            skip: Some(i64::MAX),
            limit: Some(MAX_LIMIT),
        };
        let meta = PaginationMeta::new(3, &params);
        assert_eq!(meta.skip, i64::MAX);
        assert!(!meta.has_more);
    }

    #[test]
    fn test_pagination_meta_serialize() {
        let params = PaginationParams {
            skip: Some(40),
            limit: Some(20),
        };
        let serialized = serde_json::to_string(&PaginationMeta::new(100, &params)).unwrap();
        assert!(serialized.contains(r#""total":100"#));
        assert!(serialized.contains(r#""limit":20"#));
        assert!(serialized.contains(r#""skip":40"#));
        assert!(serialized.contains(r#""has_more":true"#));
    }

    #[test]
    fn test_pagination_params_deserialize_query_strings() {
        let json = r#"{"skip":"50","limit":"25"}"#;
        let params: PaginationParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.limit(), 25);
        assert_eq!(params.skip(), 50);
    }

    #[test]
    fn test_pagination_params_offset_alias() {
        let json = r#"{"offset":"15"}"#;
        let params: PaginationParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.skip(), 15);
    }

    #[test]
    fn test_pagination_params_deserialize_empty_strings() {
        let json = r#"{"skip":"","limit":""}"#;
        let params: PaginationParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.limit(), DEFAULT_LIMIT);
        assert_eq!(params.skip(), 0);
    }
}
