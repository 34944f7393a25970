use hypeblog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The singleton `site_settings` row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SiteSettings {
    pub id: DbId,
    pub site_title: String,
    pub site_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSiteSettings {
    pub site_title: Option<String>,
    pub site_name: Option<String>,
}
