use hypeblog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `pages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Page {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub published_date: Timestamp,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Page {
    pub fn url(&self) -> String {
        format!("/{}/", self.slug)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreatePage {
    pub title: String,
    /// Derived from `title` when blank.
    pub slug: Option<String>,
    pub content: Option<String>,
    pub published_date: Option<Timestamp>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePage {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub published_date: Option<Timestamp>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Default, Clone)]
pub struct PageFilter {
    pub is_published: Option<bool>,
    /// An `ILIKE` pattern, already escaped.
    pub search: Option<String>,
}
