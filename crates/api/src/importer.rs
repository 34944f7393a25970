//! WordPress (WXR) import into posts, pages, categories and tags.
//!
//! Items are upserted by slug. A failing item is recorded in the report and
//! the import carries on with the next one.

use hypeblog_core::error::CoreError;
use hypeblog_core::slug::{slugify, validate_slug};
use hypeblog_core::types::DbId;
use hypeblog_core::wordpress::{parse_wxr, WxrItem, WxrTerm, POST_TYPE_PAGE, POST_TYPE_POST};
use hypeblog_db::models::page::{CreatePage, UpdatePage};
use hypeblog_db::models::post::{CreatePost, UpdatePost};
use hypeblog_db::repositories::{CategoryRepo, PageRepo, PostRepo, TagRepo};
use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Category for posts that reference none.
    pub default_category_id: Option<DbId>,
    /// Leave existing posts/pages untouched instead of updating them.
    pub skip_existing: bool,
    /// Author recorded on newly created posts.
    pub author_id: DbId,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct ImportReport {
    pub posts_created: u32,
    pub posts_updated: u32,
    pub pages_created: u32,
    pub pages_updated: u32,
    pub skipped: u32,
    pub ignored: u32,
    pub categories_created: u32,
    pub tags_created: u32,
    pub errors: Vec<String>,
}

/// Import a WXR document. Only a document that cannot be parsed at all is an
/// error; everything else ends up in the report.
pub async fn import_wordpress(
    pool: &PgPool,
    xml: &str,
    options: &ImportOptions,
) -> Result<ImportReport, CoreError> {
    let export = parse_wxr(xml).map_err(|e| CoreError::Validation(e.to_string()))?;
    let mut importer = Importer {
        pool,
        options,
        report: ImportReport::default(),
    };

    for term in &export.categories {
        if let Err(e) = importer.ensure_category(term).await {
            importer.fail(format!("Category '{}': {e}", term.name));
        }
    }
    for term in &export.tags {
        if let Err(e) = importer.ensure_tag(term).await {
            importer.fail(format!("Tag '{}': {e}", term.name));
        }
    }

    for item in &export.items {
        let outcome = match item.post_type.as_str() {
            POST_TYPE_POST => importer.import_post(item).await,
            POST_TYPE_PAGE => importer.import_page(item).await,
            _ => {
                importer.report.ignored += 1;
                Ok(())
            }
        };
        if let Err(e) = outcome {
            let label = if item.title.is_empty() {
                item.effective_slug()
            } else {
                item.title.clone()
            };
            importer.fail(format!("{} '{label}': {e}", item.post_type));
        }
    }

    let report = importer.report;
    tracing::info!(
        posts_created = report.posts_created,
        posts_updated = report.posts_updated,
        pages_created = report.pages_created,
        pages_updated = report.pages_updated,
        skipped = report.skipped,
        ignored = report.ignored,
        errors = report.errors.len(),
        "WordPress import finished"
    );
    Ok(report)
}

#[derive(Debug, thiserror::Error)]
enum ItemError {
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

struct Importer<'a> {
    pool: &'a PgPool,
    options: &'a ImportOptions,
    report: ImportReport,
}

impl Importer<'_> {
    fn fail(&mut self, message: String) {
        tracing::warn!(error = %message, "WordPress import item failed");
        self.report.errors.push(message);
    }

    async fn ensure_category(&mut self, term: &WxrTerm) -> Result<DbId, ItemError> {
        let (name, slug) = term_identity(term)?;
        let (category, created) = CategoryRepo::find_or_create(self.pool, &name, &slug).await?;
        if created {
            self.report.categories_created += 1;
        }
        Ok(category.id)
    }

    async fn ensure_tag(&mut self, term: &WxrTerm) -> Result<DbId, ItemError> {
        let (name, slug) = term_identity(term)?;
        let (tag, created) = TagRepo::find_or_create(self.pool, &name, &slug).await?;
        if created {
            self.report.tags_created += 1;
        }
        Ok(tag.id)
    }

    async fn import_post(&mut self, item: &WxrItem) -> Result<(), ItemError> {
        let slug = item_slug(item)?;
        let existing = PostRepo::find_by_slug(self.pool, &slug).await?;
        if existing.is_some() && self.options.skip_existing {
            self.report.skipped += 1;
            return Ok(());
        }

        let category_id = match item.categories.first() {
            Some(term) => Some(self.ensure_category(term).await?),
            None => self.options.default_category_id,
        };
        let mut tag_ids = Vec::with_capacity(item.tags.len());
        for term in &item.tags {
            tag_ids.push(self.ensure_tag(term).await?);
        }
        let title = item_title(item, &slug);

        match existing {
            Some(post) => {
                let update = UpdatePost {
                    title: Some(title),
                    content: Some(item.content.clone()),
                    excerpt: Some(item.excerpt.clone()),
                    category_id,
                    published_date: item.post_date,
                    is_published: Some(item.is_published()),
                    tag_ids: Some(tag_ids),
                    ..Default::default()
                };
                PostRepo::update(self.pool, post.id, &update).await?;
                self.report.posts_updated += 1;
            }
            None => {
                let create = CreatePost {
                    title,
                    content: Some(item.content.clone()),
                    excerpt: Some(item.excerpt.clone()),
                    category_id,
                    published_date: item.post_date,
                    is_published: Some(item.is_published()),
                    tag_ids: Some(tag_ids),
                    ..Default::default()
                };
                PostRepo::create(self.pool, &create, &slug, self.options.author_id).await?;
                self.report.posts_created += 1;
            }
        }
        Ok(())
    }

    async fn import_page(&mut self, item: &WxrItem) -> Result<(), ItemError> {
        let slug = item_slug(item)?;
        let title = item_title(item, &slug);
        match PageRepo::find_by_slug(self.pool, &slug).await? {
            Some(_) if self.options.skip_existing => {
                self.report.skipped += 1;
            }
            Some(page) => {
                let update = UpdatePage {
                    title: Some(title),
                    content: Some(item.content.clone()),
                    published_date: item.post_date,
                    is_published: Some(item.is_published()),
                    ..Default::default()
                };
                PageRepo::update(self.pool, page.id, &update).await?;
                self.report.pages_updated += 1;
            }
            None => {
                let create = CreatePage {
                    title,
                    content: Some(item.content.clone()),
                    published_date: item.post_date,
                    is_published: Some(item.is_published()),
                    ..Default::default()
                };
                PageRepo::create(self.pool, &create, &slug).await?;
                self.report.pages_created += 1;
            }
        }
        Ok(())
    }
}

/// Name and a valid slug for a term. Percent-encoded or otherwise unusable
/// nicenames fall back to a slug derived from the name.
fn term_identity(term: &WxrTerm) -> Result<(String, String), ItemError> {
    let name = term.name.trim().to_string();
    let slug = term.effective_slug();
    let slug = if validate_slug(&slug).is_ok() {
        slug
    } else {
        slugify(&name)
    };
    if name.is_empty() || slug.is_empty() {
        return Err(ItemError::Invalid("term has no usable name or slug".into()));
    }
    Ok((name, slug))
}

fn item_slug(item: &WxrItem) -> Result<String, ItemError> {
    let slug = item.effective_slug();
    let slug = if validate_slug(&slug).is_ok() {
        slug
    } else {
        slugify(&item.title)
    };
    validate_slug(&slug).map_err(|e| ItemError::Invalid(e.to_string()))?;
    Ok(slug)
}

fn item_title(item: &WxrItem, slug: &str) -> String {
    let title = item.title.trim();
    if title.is_empty() {
        slug.to_string()
    } else {
        title.to_string()
    }
}
