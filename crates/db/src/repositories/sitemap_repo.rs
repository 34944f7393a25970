//! Queries behind the XML sitemaps. Only published content is listed.

use sqlx::PgPool;

use crate::models::sitemap::{PostSitemapRow, TermSitemapRow};

pub struct SitemapRepo;

impl SitemapRepo {
    /// Published posts that have a category (and therefore a URL), newest
    /// first.
    pub async fn posts(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostSitemapRow>, sqlx::Error> {
        sqlx::query_as::<_, PostSitemapRow>(
            "SELECT p.slug, c.slug AS category_slug, p.updated_at, p.published_date
             FROM posts p
             JOIN categories c ON c.id = p.category_id
             WHERE p.is_published = TRUE
             ORDER BY p.published_date DESC, p.id DESC
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Categories with at least one published post, by name.
    pub async fn categories(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TermSitemapRow>, sqlx::Error> {
        sqlx::query_as::<_, TermSitemapRow>(
            "SELECT c.slug, MAX(p.published_date) AS lastmod
             FROM categories c
             JOIN posts p ON p.category_id = c.id AND p.is_published = TRUE
             GROUP BY c.id, c.slug, c.name
             ORDER BY c.name
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Tags used by at least one published post, by name.
    pub async fn tags(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TermSitemapRow>, sqlx::Error> {
        sqlx::query_as::<_, TermSitemapRow>(
            "SELECT t.slug, MAX(p.published_date) AS lastmod
             FROM tags t
             JOIN post_tags pt ON pt.tag_id = t.id
             JOIN posts p ON p.id = pt.post_id AND p.is_published = TRUE
             GROUP BY t.id, t.slug, t.name
             ORDER BY t.name
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }
}
