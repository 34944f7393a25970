//! Pagination and search-term helpers shared by list endpoints.

/// Default page size for public listings.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size accepted from clients.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Admin list limit within `[1, max]`, `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Normalize a free-text search term. Returns `None` for blank input.
pub fn normalize_query(q: Option<&str>) -> Option<String> {
    q.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Build an `ILIKE` pattern for a normalized term, escaping `%`, `_` and `\`.
pub fn ilike_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_bounds_are_clamped() {
        // (requested limit, expected) with default 20 and max 100.
        let cases = [
            (None, 20),
            (Some(200), 100),
            (Some(0), 1),
            (Some(-5), 1),
            (Some(50), 50),
        ];
        for (requested, expected) in cases {
            assert_eq!(clamp_limit(requested, 20, 100), expected, "{requested:?}");
        }
        assert_eq!(clamp_offset(Some(-3)), 0);
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(40)), 40);
    }

    #[test]
    fn normalize_query_blank_is_none() {
        assert_eq!(normalize_query(None), None);
        assert_eq!(normalize_query(Some("   ")), None);
    }

    #[test]
    fn normalize_query_collapses_whitespace() {
        assert_eq!(
            normalize_query(Some("  henry   danger ")),
            Some("henry danger".to_string())
        );
    }

    #[test]
    fn ilike_pattern_escapes_wildcards() {
        assert_eq!(ilike_pattern("50%_off"), "%50\\%\\_off%");
    }
}
