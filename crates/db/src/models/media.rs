use hypeblog_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `media` table. `file` and `thumbnail` are storage-relative
/// names such as `media/poster.png` and `thumbnails/poster_thumb.png`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Media {
    pub id: DbId,
    pub title: String,
    pub file: Option<String>,
    pub thumbnail: Option<String>,
    pub uploaded_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Column values written on insert and full update.
#[derive(Debug, Clone, Default)]
pub struct MediaInput {
    pub title: String,
    pub file: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct MediaFilter {
    /// An `ILIKE` pattern over title and file name, already escaped.
    pub search: Option<String>,
    pub uploaded_from: Option<Timestamp>,
    pub uploaded_to: Option<Timestamp>,
}
