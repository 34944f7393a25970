//! The media save pipeline: persist a media row, then create, replace or
//! drop its auto-generated thumbnail.
//!
//! Thumbnail failures are logged and never fail the save.

use chrono::Utc;
use hypeblog_core::media::{
    auto_thumbnail_name, extension_lower, is_auto_generated_thumbnail, plan_thumbnail,
    split_file_name, MediaFiles, ThumbnailPlan, MEDIA_THUMBNAIL_SIZE, THUMBNAIL_DIR,
};
use hypeblog_core::thumbnail::{resize_to_fit, OutputFormat, ThumbnailError, DEFAULT_JPEG_QUALITY};
use hypeblog_db::models::media::{Media, MediaInput};
use hypeblog_db::repositories::MediaRepo;
use sqlx::PgPool;

use crate::storage::MediaStorage;

pub struct MediaService<'a> {
    pool: &'a PgPool,
    storage: &'a MediaStorage,
}

impl<'a> MediaService<'a> {
    pub fn new(pool: &'a PgPool, storage: &'a MediaStorage) -> Self {
        Self { pool, storage }
    }

    /// Insert (`previous == None`) or update a media row and reconcile its
    /// thumbnail.
    pub async fn save(
        &self,
        previous: Option<&Media>,
        input: &MediaInput,
    ) -> Result<Media, sqlx::Error> {
        let media = match previous {
            Some(prev) => MediaRepo::update(self.pool, prev.id, input)
                .await?
                .ok_or(sqlx::Error::RowNotFound)?,
            None => MediaRepo::create(self.pool, input).await?,
        };

        let plan = plan_thumbnail(
            previous.map(|p| MediaFiles {
                file: p.file.as_deref(),
                thumbnail: p.thumbnail.as_deref(),
            }),
            MediaFiles {
                file: media.file.as_deref(),
                thumbnail: media.thumbnail.as_deref(),
            },
        );

        match plan {
            ThumbnailPlan::Keep => Ok(media),
            ThumbnailPlan::Generate { remove_previous } => {
                let Some(file) = media.file.as_deref() else {
                    return Ok(media);
                };
                match self.generate_thumbnail(file).await {
                    Ok(name) => {
                        if let Some(old) = remove_previous {
                            self.remove_file(&old).await;
                        }
                        tracing::info!(media_id = media.id, thumbnail = %name, "Generated media thumbnail");
                        let updated = MediaRepo::set_thumbnail(self.pool, media.id, Some(&name))
                            .await?
                            .ok_or(sqlx::Error::RowNotFound)?;
                        Ok(updated)
                    }
                    Err(e) => {
                        tracing::error!(media_id = media.id, file, error = %e, "Thumbnail generation failed");
                        Ok(media)
                    }
                }
            }
            ThumbnailPlan::Remove { path } => {
                self.remove_file(&path).await;
                // A thumbnail uploaded alongside the change stays.
                if media.thumbnail.as_deref() == Some(path.as_str()) {
                    let updated = MediaRepo::set_thumbnail(self.pool, media.id, None)
                        .await?
                        .ok_or(sqlx::Error::RowNotFound)?;
                    Ok(updated)
                } else {
                    Ok(media)
                }
            }
        }
    }

    /// Delete a media row together with its original file and any
    /// auto-generated thumbnail. Returns `false` when the row did not exist.
    pub async fn delete(&self, media: &Media) -> Result<bool, sqlx::Error> {
        if !MediaRepo::delete(self.pool, media.id).await? {
            return Ok(false);
        }
        if let Some(file) = media.file.as_deref() {
            self.remove_file(file).await;
        }
        if let Some(thumb) = media
            .thumbnail
            .as_deref()
            .filter(|t| is_auto_generated_thumbnail(t))
        {
            self.remove_file(thumb).await;
        }
        Ok(true)
    }

    async fn generate_thumbnail(&self, file: &str) -> Result<String, ThumbnailError> {
        let bytes = self.storage.read(file).await?;
        let format = OutputFormat::for_extension(&extension_lower(file), DEFAULT_JPEG_QUALITY);
        let resized = tokio::task::spawn_blocking(move || {
            resize_to_fit(&bytes, MEDIA_THUMBNAIL_SIZE, format)
        })
        .await
        .map_err(|e| ThumbnailError::Io(std::io::Error::other(e)))??;

        let target = auto_thumbnail_name(file, Utc::now());
        let (stem, ext) = split_file_name(&target);
        let stored = self
            .storage
            .save(THUMBNAIL_DIR, &format!("{stem}{ext}"), &resized)
            .await?;
        Ok(stored)
    }

    async fn remove_file(&self, name: &str) {
        if let Err(e) = self.storage.delete(name).await {
            tracing::warn!(file = name, error = %e, "Failed to delete media file");
        }
    }
}
