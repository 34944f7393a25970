//! Repository for the `tags` table and the `post_tags` join table.

use hypeblog_core::types::DbId;
use sqlx::PgPool;

use crate::models::tag::{Tag, UpdateTag};

const COLUMNS: &str = "id, name, slug, created_at, updated_at";

pub struct TagRepo;

impl TagRepo {
    pub async fn create(pool: &PgPool, name: &str, slug: &str) -> Result<Tag, sqlx::Error> {
        let query = format!(
            "INSERT INTO tags (name, slug) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(name)
            .bind(slug)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE id = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE slug = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Look a tag up by slug, then by name, inserting it when neither
    /// matches. Returns the tag and whether it was created.
    pub async fn find_or_create(
        pool: &PgPool,
        name: &str,
        slug: &str,
    ) -> Result<(Tag, bool), sqlx::Error> {
        if let Some(existing) = Self::find_by_slug(pool, slug).await? {
            return Ok((existing, false));
        }
        let query = format!("SELECT {COLUMNS} FROM tags WHERE name = $1");
        if let Some(existing) = sqlx::query_as::<_, Tag>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await?
        {
            return Ok((existing, false));
        }
        Ok((Self::create(pool, name, slug).await?, true))
    }

    pub async fn list(pool: &PgPool, search: Option<&str>) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tags
             WHERE ($1::TEXT IS NULL OR name ILIKE $1 OR slug ILIKE $1)
             ORDER BY name"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(search)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTag,
    ) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!(
            "UPDATE tags SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Tags attached to a post, by name.
    pub async fn list_for_post(pool: &PgPool, post_id: DbId) -> Result<Vec<Tag>, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            "SELECT t.id, t.name, t.slug, t.created_at, t.updated_at
             FROM tags t
             JOIN post_tags pt ON pt.tag_id = t.id
             WHERE pt.post_id = $1
             ORDER BY t.name",
        )
            .bind(post_id)
            .fetch_all(pool)
            .await
    }

    /// Replace the tag set of a post.
    pub async fn set_post_tags(
        pool: &PgPool,
        post_id: DbId,
        tag_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::set_post_tags_inner(&mut tx, post_id, tag_ids).await?;
        tx.commit().await
    }

    /// Replace the tag set of a post within an existing transaction.
    pub(crate) async fn set_post_tags_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        post_id: DbId,
        tag_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut **tx)
            .await?;
        sqlx::query(
            "INSERT INTO post_tags (post_id, tag_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT DO NOTHING",
        )
        .bind(post_id)
        .bind(tag_ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
