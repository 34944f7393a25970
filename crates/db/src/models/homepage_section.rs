use hypeblog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `homepage_sections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HomepageSection {
    pub id: DbId,
    pub title: String,
    pub enabled: bool,
    pub display_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateHomepageSection {
    pub title: String,
    pub enabled: Option<bool>,
    pub display_order: Option<i32>,
    pub category_ids: Option<Vec<DbId>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateHomepageSection {
    pub title: Option<String>,
    pub enabled: Option<bool>,
    pub display_order: Option<i32>,
    pub category_ids: Option<Vec<DbId>>,
}
