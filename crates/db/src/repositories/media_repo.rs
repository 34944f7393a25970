//! Repository for the `media` table.

use hypeblog_core::types::DbId;
use sqlx::PgPool;

use crate::models::media::{Media, MediaFilter, MediaInput};

const COLUMNS: &str = "id, title, file, thumbnail, uploaded_at, created_at, updated_at";

pub struct MediaRepo;

impl MediaRepo {
    pub async fn create(pool: &PgPool, input: &MediaInput) -> Result<Media, sqlx::Error> {
        let query = format!(
            "INSERT INTO media (title, file, thumbnail)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(&input.title)
            .bind(&input.file)
            .bind(&input.thumbnail)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Media>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM media WHERE id = $1");
        sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Media library, most recent uploads first.
    pub async fn list(
        pool: &PgPool,
        filter: &MediaFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Media>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM media
             WHERE ($1::TEXT IS NULL OR title ILIKE $1 OR file ILIKE $1)
               AND ($2::TIMESTAMPTZ IS NULL OR uploaded_at >= $2)
               AND ($3::TIMESTAMPTZ IS NULL OR uploaded_at < $3)
             ORDER BY uploaded_at DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(&filter.search)
            .bind(filter.uploaded_from)
            .bind(filter.uploaded_to)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, filter: &MediaFilter) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM media
             WHERE ($1::TEXT IS NULL OR title ILIKE $1 OR file ILIKE $1)
               AND ($2::TIMESTAMPTZ IS NULL OR uploaded_at >= $2)
               AND ($3::TIMESTAMPTZ IS NULL OR uploaded_at < $3)",
        )
        .bind(&filter.search)
        .bind(filter.uploaded_from)
        .bind(filter.uploaded_to)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Overwrite title, file and thumbnail.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &MediaInput,
    ) -> Result<Option<Media>, sqlx::Error> {
        let query = format!(
            "UPDATE media SET title = $2, file = $3, thumbnail = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.file)
            .bind(&input.thumbnail)
            .fetch_optional(pool)
            .await
    }

    /// Write only the thumbnail column.
    pub async fn set_thumbnail(
        pool: &PgPool,
        id: DbId,
        thumbnail: Option<&str>,
    ) -> Result<Option<Media>, sqlx::Error> {
        let query =
            format!("UPDATE media SET thumbnail = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .bind(thumbnail)
            .fetch_optional(pool)
            .await
    }

    /// Whether any media row already points at this storage name.
    pub async fn is_referenced(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM media WHERE thumbnail = $1 OR file = $1)",
        )
        .bind(name)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM media WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
