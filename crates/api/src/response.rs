//! Shared response envelope types for API handlers.
//!
//! Back-office responses use a `{ "data": ... }` envelope. Public listings
//! embed a [`Paginated`] block.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// One page of a public listing.
#[derive(Debug, Serialize)]
pub struct Paginated<T: Serialize> {
    pub items: Vec<T>,
    /// 1-based page number.
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub num_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T: Serialize> Paginated<T> {
    pub fn new(items: Vec<T>, page: i64, page_size: i64, total: i64) -> Self {
        let num_pages = if total == 0 {
            1
        } else {
            (total + page_size - 1) / page_size
        };
        Self {
            items,
            page,
            page_size,
            total,
            num_pages,
            has_next: page < num_pages,
            has_previous: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_counts() {
        let page = Paginated::new(vec![1, 2], 1, 2, 5);
        assert_eq!(page.num_pages, 3);
        assert!(page.has_next);
        assert!(!page.has_previous);

        let last = Paginated::<i32>::new(vec![], 3, 2, 5);
        assert!(!last.has_next);
        assert!(last.has_previous);

        let empty = Paginated::<i32>::new(vec![], 1, 10, 0);
        assert_eq!(empty.num_pages, 1);
        assert!(!empty.has_next);
    }
}
