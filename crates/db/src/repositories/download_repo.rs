//! Repository for `download_qualities` and `subtitles`.

use hypeblog_core::types::DbId;
use sqlx::PgPool;

use crate::models::download::{
    CreateDownloadQuality, CreateSubtitle, DownloadQuality, Subtitle, UpdateDownloadQuality,
    UpdateSubtitle,
};

const QUALITY_COLUMNS: &str =
    "id, post_id, quality, download_url, download_count, is_premium, created_at, updated_at";

const SUBTITLE_COLUMNS: &str = "id, post_id, language, download_url, is_auto_generated, \
    download_count, created_at, updated_at";

pub struct DownloadRepo;

impl DownloadRepo {
    // -- Video qualities --

    pub async fn create_quality(
        pool: &PgPool,
        post_id: DbId,
        input: &CreateDownloadQuality,
    ) -> Result<DownloadQuality, sqlx::Error> {
        let query = format!(
            "INSERT INTO download_qualities (post_id, quality, download_url, is_premium)
             VALUES ($1, $2, $3, COALESCE($4, FALSE))
             RETURNING {QUALITY_COLUMNS}"
        );
        sqlx::query_as::<_, DownloadQuality>(&query)
            .bind(post_id)
            .bind(&input.quality)
            .bind(&input.download_url)
            .bind(input.is_premium)
            .fetch_one(pool)
            .await
    }

    pub async fn list_qualities(
        pool: &PgPool,
        post_id: DbId,
    ) -> Result<Vec<DownloadQuality>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALITY_COLUMNS} FROM download_qualities WHERE post_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, DownloadQuality>(&query)
            .bind(post_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_quality(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DownloadQuality>, sqlx::Error> {
        let query = format!("SELECT {QUALITY_COLUMNS} FROM download_qualities WHERE id = $1");
        sqlx::query_as::<_, DownloadQuality>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update_quality(
        pool: &PgPool,
        post_id: DbId,
        id: DbId,
        input: &UpdateDownloadQuality,
    ) -> Result<Option<DownloadQuality>, sqlx::Error> {
        let query = format!(
            "UPDATE download_qualities SET
                quality = COALESCE($3, quality),
                download_url = COALESCE($4, download_url),
                is_premium = COALESCE($5, is_premium)
             WHERE id = $1 AND post_id = $2
             RETURNING {QUALITY_COLUMNS}"
        );
        sqlx::query_as::<_, DownloadQuality>(&query)
            .bind(id)
            .bind(post_id)
            .bind(&input.quality)
            .bind(&input.download_url)
            .bind(input.is_premium)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete_quality(pool: &PgPool, post_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM download_qualities WHERE id = $1 AND post_id = $2")
            .bind(id)
            .bind(post_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count one download and return the updated row.
    pub async fn increment_quality(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DownloadQuality>, sqlx::Error> {
        let query = format!(
            "UPDATE download_qualities SET download_count = download_count + 1
             WHERE id = $1
             RETURNING {QUALITY_COLUMNS}"
        );
        sqlx::query_as::<_, DownloadQuality>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // -- Subtitles --

    pub async fn create_subtitle(
        pool: &PgPool,
        post_id: DbId,
        input: &CreateSubtitle,
    ) -> Result<Subtitle, sqlx::Error> {
        let query = format!(
            "INSERT INTO subtitles (post_id, language, download_url, is_auto_generated)
             VALUES ($1, $2, $3, COALESCE($4, FALSE))
             RETURNING {SUBTITLE_COLUMNS}"
        );
        sqlx::query_as::<_, Subtitle>(&query)
            .bind(post_id)
            .bind(&input.language)
            .bind(&input.download_url)
            .bind(input.is_auto_generated)
            .fetch_one(pool)
            .await
    }

    pub async fn list_subtitles(pool: &PgPool, post_id: DbId) -> Result<Vec<Subtitle>, sqlx::Error> {
        let query =
            format!("SELECT {SUBTITLE_COLUMNS} FROM subtitles WHERE post_id = $1 ORDER BY id");
        sqlx::query_as::<_, Subtitle>(&query)
            .bind(post_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update_subtitle(
        pool: &PgPool,
        post_id: DbId,
        id: DbId,
        input: &UpdateSubtitle,
    ) -> Result<Option<Subtitle>, sqlx::Error> {
        let query = format!(
            "UPDATE subtitles SET
                language = COALESCE($3, language),
                download_url = COALESCE($4, download_url),
                is_auto_generated = COALESCE($5, is_auto_generated)
             WHERE id = $1 AND post_id = $2
             RETURNING {SUBTITLE_COLUMNS}"
        );
        sqlx::query_as::<_, Subtitle>(&query)
            .bind(id)
            .bind(post_id)
            .bind(&input.language)
            .bind(&input.download_url)
            .bind(input.is_auto_generated)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete_subtitle(pool: &PgPool, post_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subtitles WHERE id = $1 AND post_id = $2")
            .bind(id)
            .bind(post_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn increment_subtitle(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Subtitle>, sqlx::Error> {
        let query = format!(
            "UPDATE subtitles SET download_count = download_count + 1
             WHERE id = $1
             RETURNING {SUBTITLE_COLUMNS}"
        );
        sqlx::query_as::<_, Subtitle>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
