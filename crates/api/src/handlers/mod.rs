//! Request handlers.
//!
//! Public site handlers (`site`, `downloads`, `sitemap`, `media::public_*`)
//! serve JSON documents at the public URL scheme. Back-office handlers are
//! mounted under `/api/v1` and require a staff or admin token.

pub mod auth;
pub mod categories;
pub mod comments;
pub mod downloads;
pub mod form;
pub mod homepage_sections;
pub mod import;
pub mod media;
pub mod pages;
pub mod posts;
pub mod settings;
pub mod site;
pub mod sitemap;
pub mod tags;
pub mod users;

use hypeblog_core::error::CoreError;
use hypeblog_core::search::{ilike_pattern, normalize_query};
use hypeblog_core::slug::{slug_or_derive, validate_slug};
use hypeblog_core::types::DbId;

use crate::error::AppError;

/// 404 for a missing entity.
pub(crate) fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}

/// Escaped `ILIKE` pattern for a free-text `q`, or `None` when blank.
pub(crate) fn search_pattern(q: Option<&str>) -> Option<String> {
    normalize_query(q).map(|term| ilike_pattern(&term))
}

/// Use the submitted slug, or derive one from `source` when it is blank,
/// then validate it.
pub(crate) fn resolve_slug(slug: Option<&str>, source: &str) -> Result<String, AppError> {
    let slug = slug_or_derive(slug, source);
    validate_slug(&slug)?;
    Ok(slug)
}

/// Validate an explicitly changed slug on update.
pub(crate) fn check_slug(slug: Option<&str>) -> Result<(), AppError> {
    if let Some(slug) = slug {
        validate_slug(slug)?;
    }
    Ok(())
}

/// Reject blank required text fields.
pub(crate) fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "{field} must not be empty"
        ))));
    }
    Ok(())
}
