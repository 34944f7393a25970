//! Repository for the `comments` table.

use hypeblog_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{
    Comment, CommentAdminRow, CommentFilter, CreateComment, PublicComment, UpdateComment,
};

const COLUMNS: &str = "id, post_id, name, email, comment, is_approved, created_at, updated_at";

pub struct CommentRepo;

impl CommentRepo {
    /// Store a visitor comment. New comments await moderation.
    pub async fn create(
        pool: &PgPool,
        post_id: DbId,
        input: &CreateComment,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (post_id, name, email, comment)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(post_id)
            .bind(input.name.trim())
            .bind(input.email.trim())
            .bind(input.comment.trim())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Approved comments of a post, newest first.
    pub async fn list_approved_for_post(
        pool: &PgPool,
        post_id: DbId,
    ) -> Result<Vec<PublicComment>, sqlx::Error> {
        sqlx::query_as::<_, PublicComment>(
            "SELECT id, name, comment, created_at FROM comments
             WHERE post_id = $1 AND is_approved = TRUE
             ORDER BY created_at DESC, id DESC",
        )
        .bind(post_id)
        .fetch_all(pool)
        .await
    }

    /// Back-office moderation list, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &CommentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CommentAdminRow>, sqlx::Error> {
        sqlx::query_as::<_, CommentAdminRow>(
            "SELECT cm.id, cm.post_id, p.title AS post_title, cm.name, cm.email,
                    cm.comment, cm.is_approved, cm.created_at
             FROM comments cm
             JOIN posts p ON p.id = cm.post_id
             WHERE ($1::BIGINT IS NULL OR cm.post_id = $1)
               AND ($2::BOOL IS NULL OR cm.is_approved = $2)
               AND ($3::TIMESTAMPTZ IS NULL OR cm.created_at >= $3)
               AND ($4::TIMESTAMPTZ IS NULL OR cm.created_at < $4)
               AND ($5::TEXT IS NULL OR cm.name ILIKE $5 OR cm.email ILIKE $5
                    OR cm.comment ILIKE $5)
             ORDER BY cm.created_at DESC, cm.id DESC
             LIMIT $6 OFFSET $7",
        )
        .bind(filter.post_id)
        .bind(filter.is_approved)
        .bind(filter.created_from)
        .bind(filter.created_to)
        .bind(&filter.search)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateComment,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "UPDATE comments SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                comment = COALESCE($4, comment),
                is_approved = COALESCE($5, is_approved)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.comment)
            .bind(input.is_approved)
            .fetch_optional(pool)
            .await
    }

    /// Bulk "approve comments" action. Returns the number of rows changed.
    pub async fn approve_many(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE comments SET is_approved = TRUE
             WHERE id = ANY($1) AND is_approved = FALSE",
        )
        .bind(ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
