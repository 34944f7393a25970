use hypeblog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub post_id: DbId,
    pub name: String,
    pub email: String,
    pub comment: String,
    pub is_approved: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public comment shown under a post (no email).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PublicComment {
    pub id: DbId,
    pub name: String,
    pub comment: String,
    pub created_at: Timestamp,
}

/// Back-office list row, joined with the post title.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentAdminRow {
    pub id: DbId,
    pub post_id: DbId,
    pub post_title: String,
    pub name: String,
    pub email: String,
    pub comment: String,
    pub is_approved: bool,
    pub created_at: Timestamp,
}

/// Comment submitted from the public post page.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateComment {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 5000))]
    pub comment: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateComment {
    pub name: Option<String>,
    pub email: Option<String>,
    pub comment: Option<String>,
    pub is_approved: Option<bool>,
}

#[derive(Debug, Default, Clone)]
pub struct CommentFilter {
    pub post_id: Option<DbId>,
    pub is_approved: Option<bool>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
    /// An `ILIKE` pattern, already escaped.
    pub search: Option<String>,
}
