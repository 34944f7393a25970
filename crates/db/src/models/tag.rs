use hypeblog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tags` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Tag {
    pub fn url(&self) -> String {
        format!("/tag/{}/", self.slug)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTag {
    pub name: String,
    /// Derived from `name` when blank.
    pub slug: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTag {
    pub name: Option<String>,
    pub slug: Option<String>,
}
