//! Shared query parameter types for API handlers.

use hypeblog_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use serde::Deserialize;

/// Back-office pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamped `(limit, offset)`.
    pub fn resolve(&self) -> (i64, i64) {
        (
            clamp_limit(self.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
            clamp_offset(self.offset),
        )
    }
}

/// Public page-number pagination (`?page=`), 1-based.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
}

impl PageParams {
    /// Page number clamped to at least 1.
    pub fn number(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// SQL offset for the given page size.
    pub fn offset(&self, page_size: i64) -> i64 {
        (self.number() - 1).saturating_mul(page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_offsets() {
        assert_eq!(PageParams { page: None }.offset(10), 0);
        assert_eq!(PageParams { page: Some(3) }.offset(10), 20);
        assert_eq!(PageParams { page: Some(-4) }.number(), 1);
    }

    #[test]
    fn pagination_is_clamped() {
        let params = PaginationParams {
            limit: Some(10_000),
            offset: Some(-5),
        };
        assert_eq!(params.resolve(), (MAX_PAGE_SIZE, 0));
    }
}
