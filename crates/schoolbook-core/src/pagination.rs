//! Pagination utilities for list endpoints.
//!
//! Supports offset-based (`limit` + `offset`) and page-based (`limit` + `page`)
//! pagination. When `page` is provided it takes precedence over `offset`.
//!
//! ```ignore
//! // GET /api/invoices?status=unpaid&limit=20&page=2
//! let limit = params.limit();
//! let offset = params.offset();
//! let invoices = fetch_invoices(limit, offset).await?;
//! let total = count_invoices().await?;
//!
//! Ok(Json(PaginatedInvoicesResponse {
//!     data: invoices,
//!     meta: PaginationMeta::from_params(total, &params),
//! }))
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Default page size; matches the invoice listing page size.
pub const DEFAULT_LIMIT: i64 = 20;
/// Largest page a client may request.
pub const MAX_LIMIT: i64 = 100;

/// Query strings send empty values as `""`; treat those as absent.
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Metadata about a paginated response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of items across all pages
    pub total: i64,
    /// Page size that was applied
    pub limit: i64,
    /// Number of items skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Current page number (only present for page-based requests)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    /// Whether there are more items after this page
    pub has_more: bool,
}

impl PaginationMeta {
    /// Builds the metadata for a result set of `total` rows fetched with `params`.
    pub fn from_params(total: i64, params: &PaginationParams) -> Self {
        let limit = params.limit();
        let offset = params.offset();
        Self {
            total,
            limit,
            offset: Some(offset),
            page: params.page(),
            has_more: offset.saturating_add(limit) < total,
        }
    }
}

/// Query parameters for pagination.
///
/// `limit` is clamped to [1, 100], `offset` to >= 0 and `page` to >= 1.
#[derive(Debug, Clone, Default, Hash, Deserialize, ToSchema)]
pub struct PaginationParams {
    /// Maximum number of items to return (1-100, default: 20)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Number of items to skip (ignored if `page` is set)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub offset: Option<i64>,
    /// Page number (1-indexed)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl PaginationParams {
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        if let Some(page) = self.page {
            (page.max(1) - 1).saturating_mul(self.limit())
        } else {
            self.offset.unwrap_or(0).max(0)
        }
    }

    #[must_use]
    pub fn page(&self) -> Option<i64> {
        self.page.map(|p| p.max(1))
    }
}
