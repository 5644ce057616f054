//! Pagination parameters for list endpoints.

use serde::Deserialize;

/// Default page size when the caller gives none
pub const DEFAULT_LIMIT: i64 = 50;

/// Query parameters for list endpoints.
#[derive(Debug, Deserialize, Default)]
pub struct PaginationQuery {
    /// Maximum number of items to return
    #[serde(default)]
    pub limit: Option<i64>,
}

impl PaginationQuery {
    pub fn with_limit(limit: Option<i64>) -> Self {
        Self { limit }
    }

    /// Get the limit, clamped to `1..=max`
    pub fn limit(&self, max: i64) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, max)
    }
}
