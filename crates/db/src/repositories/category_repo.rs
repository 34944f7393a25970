//! Repository for the `categories` table.

use hypeblog_core::types::DbId;
use sqlx::PgPool;

use crate::models::category::{Category, UpdateCategory};

const COLUMNS: &str = "id, name, slug, description, created_at, updated_at";

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    pub async fn create(
        pool: &PgPool,
        name: &str,
        slug: &str,
        description: &str,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, slug, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .bind(slug)
            .bind(description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE slug = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Look a category up by slug, then by name, inserting it when neither
    /// matches. Returns the category and whether it was created.
    pub async fn find_or_create(
        pool: &PgPool,
        name: &str,
        slug: &str,
    ) -> Result<(Category, bool), sqlx::Error> {
        if let Some(existing) = Self::find_by_slug(pool, slug).await? {
            return Ok((existing, false));
        }
        let query = format!("SELECT {COLUMNS} FROM categories WHERE name = $1");
        if let Some(existing) = sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await?
        {
            return Ok((existing, false));
        }
        let created = Self::create(pool, name, slug, "").await?;
        Ok((created, true))
    }

    /// List categories by name, optionally filtered by an `ILIKE` pattern.
    pub async fn list(pool: &PgPool, search: Option<&str>) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories
             WHERE ($1::TEXT IS NULL OR name ILIKE $1 OR slug ILIKE $1)
             ORDER BY name"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(search)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a category. Its posts keep existing with no category.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
