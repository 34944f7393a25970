//! Projections used to build the XML sitemaps.

use hypeblog_core::types::Timestamp;
use sqlx::FromRow;

/// A published, categorised post.
#[derive(Debug, Clone, FromRow)]
pub struct PostSitemapRow {
    pub slug: String,
    pub category_slug: String,
    pub updated_at: Timestamp,
    pub published_date: Timestamp,
}

/// A category or tag with its newest published post date.
#[derive(Debug, Clone, FromRow)]
pub struct TermSitemapRow {
    pub slug: String,
    pub lastmod: Option<Timestamp>,
}
