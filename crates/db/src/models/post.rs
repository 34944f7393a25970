//! Blog posts, their list/card projections and back-office filters.

use hypeblog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub seo_title: Option<String>,
    /// Storage-relative name of the featured image.
    pub thumbnail: Option<String>,
    pub content: String,
    pub excerpt: String,
    pub views: i32,
    pub enable_downloads: bool,
    pub download_section_title: String,
    pub download_button_text: String,
    pub download_url: String,
    pub subtitle_url: String,
    pub subtitle_button_text: String,
    pub author_id: DbId,
    pub category_id: Option<DbId>,
    pub published_date: Timestamp,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public listing projection of a post, joined with its category.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostCard {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub seo_title: Option<String>,
    pub thumbnail: Option<String>,
    pub excerpt: String,
    pub views: i32,
    pub published_date: Timestamp,
    pub updated_at: Timestamp,
    pub category_slug: Option<String>,
    pub category_name: Option<String>,
}

impl PostCard {
    /// `/{category}/{slug}/`, or `None` for uncategorised posts.
    pub fn url(&self) -> Option<String> {
        self.category_slug
            .as_deref()
            .map(|category| post_url(category, &self.slug))
    }
}

/// Canonical public URL of a post.
pub fn post_url(category_slug: &str, post_slug: &str) -> String {
    format!("/{category_slug}/{post_slug}/")
}

/// Back-office list row with the admin columns.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostAdminRow {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub thumbnail: Option<String>,
    pub views: i32,
    pub is_published: bool,
    pub enable_downloads: bool,
    pub published_date: Timestamp,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub author_username: String,
    pub quality_count: i64,
    pub subtitle_count: i64,
    pub video_downloads: i64,
    pub subtitle_downloads: i64,
}

impl PostAdminRow {
    /// The change-list "Downloads" flag follows the post's switch, not its
    /// link counts; `quality_count` and `subtitle_count` carry those.
    pub fn has_downloads(&self) -> bool {
        self.enable_downloads
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreatePost {
    pub title: String,
    /// Derived from `title` when blank.
    pub slug: Option<String>,
    pub seo_title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub enable_downloads: Option<bool>,
    pub download_section_title: Option<String>,
    pub download_button_text: Option<String>,
    pub download_url: Option<String>,
    pub subtitle_url: Option<String>,
    pub subtitle_button_text: Option<String>,
    /// Defaults to the creating user.
    pub author_id: Option<DbId>,
    pub category_id: Option<DbId>,
    pub published_date: Option<Timestamp>,
    pub is_published: Option<bool>,
    pub tag_ids: Option<Vec<DbId>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub seo_title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub enable_downloads: Option<bool>,
    pub download_section_title: Option<String>,
    pub download_button_text: Option<String>,
    pub download_url: Option<String>,
    pub subtitle_url: Option<String>,
    pub subtitle_button_text: Option<String>,
    pub author_id: Option<DbId>,
    pub category_id: Option<DbId>,
    pub published_date: Option<Timestamp>,
    pub is_published: Option<bool>,
    pub tag_ids: Option<Vec<DbId>>,
}

/// One row of a list-editable bulk patch.
#[derive(Debug, Clone, Deserialize)]
pub struct PostListEdit {
    pub id: DbId,
    pub is_published: Option<bool>,
    pub enable_downloads: Option<bool>,
}

/// Back-office list filters.
#[derive(Debug, Default, Clone)]
pub struct PostFilter {
    pub category_id: Option<DbId>,
    pub tag_id: Option<DbId>,
    pub is_published: Option<bool>,
    pub enable_downloads: Option<bool>,
    /// An `ILIKE` pattern, already escaped.
    pub search: Option<String>,
}

/// Public list filters. Only published posts are ever returned.
#[derive(Debug, Default, Clone)]
pub struct PublishedFilter {
    pub category_id: Option<DbId>,
    pub tag_id: Option<DbId>,
    /// An `ILIKE` pattern, already escaped.
    pub search: Option<String>,
}
