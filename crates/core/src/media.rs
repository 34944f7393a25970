//! Media library rules: which uploads are images, how auto-generated
//! thumbnails are named and recognised, and what the save pipeline must do
//! with a thumbnail when a media item's file changes.

use chrono::{DateTime, Utc};

/// Storage directory for original uploads.
pub const MEDIA_DIR: &str = "media";

/// Storage directory for thumbnails (manual, auto-generated, featured images).
pub const THUMBNAIL_DIR: &str = "thumbnails";

/// Bounding box for auto-generated media thumbnails.
pub const MEDIA_THUMBNAIL_SIZE: (u32, u32) = (128, 128);

/// Bounding box and JPEG quality for post featured images.
pub const FEATURED_IMAGE_SIZE: (u32, u32) = (300, 450);
pub const FEATURED_IMAGE_QUALITY: u8 = 85;

/// Image extensions (lowercase, with dot) that get thumbnails.
pub const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif"];

/// Marker embedded in generated thumbnail names.
pub const AUTO_THUMB_MARKER: &str = "_auto_thumb";

/// Whether a file name has one of the image extensions (case-insensitive).
pub fn is_image_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Split the last path component of `name` into `(stem, extension)`.
///
/// The extension keeps its leading dot and its original case; it is empty
/// when there is none.
pub fn split_file_name(name: &str) -> (&str, &str) {
    let base = name.rsplit('/').next().unwrap_or(name);
    match base.rfind('.') {
        Some(idx) if idx > 0 => (&base[..idx], &base[idx..]),
        _ => (base, ""),
    }
}

/// Lowercased extension (with dot) of a file name.
pub fn extension_lower(name: &str) -> String {
    split_file_name(name).1.to_lowercase()
}

/// Heuristic for thumbnails created by the save pipeline: stored under
/// `thumbnails/` and containing `_thumb`. Anything else is treated as a
/// manually uploaded thumbnail and is never replaced.
pub fn is_auto_generated_thumbnail(name: &str) -> bool {
    name.starts_with(&format!("{THUMBNAIL_DIR}/")) && name.contains("_thumb")
}

/// Whether a stored thumbnail may be deleted by the pipeline.
pub fn is_removable_auto_thumbnail(name: &str) -> bool {
    name.contains(AUTO_THUMB_MARKER)
}

/// Storage-relative name for a generated thumbnail of `file_name`:
/// `thumbnails/{stem}_{YYYYmmddHHMMSS}_auto_thumb{ext}` with a lowercased
/// extension.
pub fn auto_thumbnail_name(file_name: &str, now: DateTime<Utc>) -> String {
    let (stem, _) = split_file_name(file_name);
    let ext = extension_lower(file_name);
    format!(
        "{THUMBNAIL_DIR}/{stem}_{}{AUTO_THUMB_MARKER}{ext}",
        now.format("%Y%m%d%H%M%S")
    )
}

/// File/thumbnail names of a media item at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MediaFiles<'a> {
    pub file: Option<&'a str>,
    pub thumbnail: Option<&'a str>,
}

/// What the save pipeline must do with the thumbnail after persisting a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailPlan {
    /// Generate a new thumbnail from the current file. `remove_previous` is
    /// the previous auto-generated thumbnail to delete once generation has
    /// succeeded.
    Generate { remove_previous: Option<String> },
    /// Delete the previous auto-generated thumbnail and clear the column.
    Remove { path: String },
    /// Nothing to do.
    Keep,
}

/// Decide the thumbnail action for a save.
///
/// `previous` is `None` for a newly created item.
pub fn plan_thumbnail(previous: Option<MediaFiles<'_>>, current: MediaFiles<'_>) -> ThumbnailPlan {
    let previous = previous.unwrap_or_default();
    let file_changed = previous.file != current.file;
    let previous_auto = previous
        .thumbnail
        .filter(|t| is_removable_auto_thumbnail(t))
        .map(str::to_string);

    match current.file {
        Some(file) if is_image_name(file) => {
            let current_is_auto = current
                .thumbnail
                .is_some_and(is_auto_generated_thumbnail);
            if current.thumbnail.is_none() || (file_changed && current_is_auto) {
                ThumbnailPlan::Generate {
                    remove_previous: previous_auto,
                }
            } else {
                ThumbnailPlan::Keep
            }
        }
        _ if file_changed => match previous_auto {
            Some(path) => ThumbnailPlan::Remove { path },
            None => ThumbnailPlan::Keep,
        },
        _ => ThumbnailPlan::Keep,
    }
}
