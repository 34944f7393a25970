//! Per-post download links: video qualities and subtitles.

use hypeblog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `download_qualities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DownloadQuality {
    pub id: DbId,
    pub post_id: DbId,
    /// Quality code, e.g. `720p` or `EP3`.
    pub quality: String,
    pub download_url: String,
    pub download_count: i32,
    pub is_premium: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateDownloadQuality {
    pub quality: String,
    pub download_url: String,
    pub is_premium: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDownloadQuality {
    pub quality: Option<String>,
    pub download_url: Option<String>,
    pub is_premium: Option<bool>,
}

/// A row from the `subtitles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subtitle {
    pub id: DbId,
    pub post_id: DbId,
    pub language: String,
    pub download_url: String,
    pub is_auto_generated: bool,
    pub download_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateSubtitle {
    pub language: String,
    pub download_url: String,
    pub is_auto_generated: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSubtitle {
    pub language: Option<String>,
    pub download_url: Option<String>,
    pub is_auto_generated: Option<bool>,
}
