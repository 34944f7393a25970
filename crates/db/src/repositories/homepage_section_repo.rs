//! Repository for `homepage_sections` and their category links.

use hypeblog_core::types::DbId;
use sqlx::PgPool;

use crate::models::homepage_section::{
    CreateHomepageSection, HomepageSection, UpdateHomepageSection,
};

const COLUMNS: &str = "id, title, enabled, display_order, created_at, updated_at";

pub struct HomepageSectionRepo;

impl HomepageSectionRepo {
    /// Insert a section and, when given, its category links.
    pub async fn create(
        pool: &PgPool,
        input: &CreateHomepageSection,
    ) -> Result<HomepageSection, sqlx::Error> {
        let query = format!(
            "INSERT INTO homepage_sections (title, enabled, display_order)
             VALUES ($1, COALESCE($2, TRUE), COALESCE($3, 0))
             RETURNING {COLUMNS}"
        );
        let mut tx = pool.begin().await?;
        let section = sqlx::query_as::<_, HomepageSection>(&query)
            .bind(&input.title)
            .bind(input.enabled)
            .bind(input.display_order)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(ref category_ids) = input.category_ids {
            Self::set_categories_inner(&mut tx, section.id, category_ids).await?;
        }

        tx.commit().await?;
        Ok(section)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<HomepageSection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM homepage_sections WHERE id = $1");
        sqlx::query_as::<_, HomepageSection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All sections in display order.
    pub async fn list(pool: &PgPool) -> Result<Vec<HomepageSection>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM homepage_sections ORDER BY display_order, id");
        sqlx::query_as::<_, HomepageSection>(&query)
            .fetch_all(pool)
            .await
    }

    /// Enabled sections in display order.
    pub async fn list_enabled(pool: &PgPool) -> Result<Vec<HomepageSection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM homepage_sections
             WHERE enabled = TRUE
             ORDER BY display_order, id"
        );
        sqlx::query_as::<_, HomepageSection>(&query)
            .fetch_all(pool)
            .await
    }

    /// If `category_ids` is `Some`, replaces the category set as well.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateHomepageSection,
    ) -> Result<Option<HomepageSection>, sqlx::Error> {
        let query = format!(
            "UPDATE homepage_sections SET
                title = COALESCE($2, title),
                enabled = COALESCE($3, enabled),
                display_order = COALESCE($4, display_order)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let mut tx = pool.begin().await?;
        let section = sqlx::query_as::<_, HomepageSection>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.enabled)
            .bind(input.display_order)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(ref section) = section {
            if let Some(ref category_ids) = input.category_ids {
                Self::set_categories_inner(&mut tx, section.id, category_ids).await?;
            }
        }

        tx.commit().await?;
        Ok(section)
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM homepage_sections WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn category_ids(pool: &PgPool, section_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT category_id FROM homepage_section_categories
             WHERE section_id = $1
             ORDER BY category_id",
        )
        .bind(section_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Replace the category set of a section within an existing transaction.
    async fn set_categories_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        section_id: DbId,
        category_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM homepage_section_categories WHERE section_id = $1")
            .bind(section_id)
            .execute(&mut **tx)
            .await?;
        sqlx::query(
            "INSERT INTO homepage_section_categories (section_id, category_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT DO NOTHING",
        )
        .bind(section_id)
        .bind(category_ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
