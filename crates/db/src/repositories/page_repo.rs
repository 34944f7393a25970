//! Repository for the `pages` table.

use hypeblog_core::types::DbId;
use sqlx::PgPool;

use crate::models::page::{CreatePage, Page, PageFilter, UpdatePage};

const COLUMNS: &str =
    "id, title, slug, content, published_date, is_published, created_at, updated_at";

pub struct PageRepo;

impl PageRepo {
    pub async fn create(pool: &PgPool, input: &CreatePage, slug: &str) -> Result<Page, sqlx::Error> {
        let query = format!(
            "INSERT INTO pages (title, slug, content, published_date, is_published)
             VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, NOW()), COALESCE($5, TRUE))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(&input.title)
            .bind(slug)
            .bind(&input.content)
            .bind(input.published_date)
            .bind(input.is_published)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE id = $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE slug = $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_published_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE slug = $1 AND is_published = TRUE");
        sqlx::query_as::<_, Page>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Pages, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &PageFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Page>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pages
             WHERE ($1::BOOL IS NULL OR is_published = $1)
               AND ($2::TEXT IS NULL OR title ILIKE $2 OR content ILIKE $2)
             ORDER BY published_date DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(filter.is_published)
            .bind(&filter.search)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePage,
    ) -> Result<Option<Page>, sqlx::Error> {
        let query = format!(
            "UPDATE pages SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                content = COALESCE($4, content),
                published_date = COALESCE($5, published_date),
                is_published = COALESCE($6, is_published)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.content)
            .bind(input.published_date)
            .bind(input.is_published)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
