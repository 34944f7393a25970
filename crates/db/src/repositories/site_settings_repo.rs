//! Repository for the singleton `site_settings` row.

use sqlx::PgPool;

use crate::models::site_settings::{SiteSettings, UpdateSiteSettings};

const COLUMNS: &str = "id, site_title, site_name, created_at, updated_at";

pub struct SiteSettingsRepo;

impl SiteSettingsRepo {
    /// Return row 1, creating it with the column defaults when missing.
    pub async fn load(pool: &PgPool) -> Result<SiteSettings, sqlx::Error> {
        sqlx::query("INSERT INTO site_settings (id) VALUES (1) ON CONFLICT (id) DO NOTHING")
            .execute(pool)
            .await?;
        let query = format!("SELECT {COLUMNS} FROM site_settings WHERE id = 1");
        sqlx::query_as::<_, SiteSettings>(&query)
            .fetch_one(pool)
            .await
    }

    /// Upsert row 1. Absent fields keep their current (or default) value.
    pub async fn save(
        pool: &PgPool,
        input: &UpdateSiteSettings,
    ) -> Result<SiteSettings, sqlx::Error> {
        let query = format!(
            "INSERT INTO site_settings (id, site_title, site_name)
             VALUES (1,
                     COALESCE($1, 'Watch Latest Movies & TV Shows'),
                     COALESCE($2, 'Hypeblog9jaTV'))
             ON CONFLICT (id) DO UPDATE SET
                site_title = COALESCE($1, site_settings.site_title),
                site_name = COALESCE($2, site_settings.site_name)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SiteSettings>(&query)
            .bind(&input.site_title)
            .bind(&input.site_name)
            .fetch_one(pool)
            .await
    }
}
