//! Repository for the `posts` table.

use hypeblog_core::types::DbId;
use sqlx::PgPool;

use crate::models::post::{
    CreatePost, Post, PostAdminRow, PostCard, PostFilter, PostListEdit, PublishedFilter,
    UpdatePost,
};
use crate::repositories::TagRepo;

/// Column list for posts queries.
const COLUMNS: &str = "id, title, slug, seo_title, thumbnail, content, excerpt, views, \
    enable_downloads, download_section_title, download_button_text, download_url, \
    subtitle_url, subtitle_button_text, author_id, category_id, published_date, \
    is_published, created_at, updated_at";

/// Select list for [`PostCard`]; the query must alias posts as `p` and
/// left-join categories as `c`.
const CARD_COLUMNS: &str = "p.id, p.title, p.slug, p.seo_title, p.thumbnail, p.excerpt, \
    p.views, p.published_date, p.updated_at, c.slug AS category_slug, c.name AS category_name";

/// `WHERE` clause shared by the published listing and its count.
/// Binds: `$1` category, `$2` tag, `$3` search pattern.
const PUBLISHED_WHERE: &str = "p.is_published = TRUE
      AND ($1::BIGINT IS NULL OR p.category_id = $1)
      AND ($2::BIGINT IS NULL OR EXISTS (
            SELECT 1 FROM post_tags pt WHERE pt.post_id = p.id AND pt.tag_id = $2))
      AND ($3::TEXT IS NULL OR p.title ILIKE $3 OR p.content ILIKE $3
           OR p.excerpt ILIKE $3 OR p.seo_title ILIKE $3)";

/// Number of related posts shown under a post.
pub const RELATED_POSTS_LIMIT: i64 = 4;

/// Provides CRUD and listing operations for posts.
pub struct PostRepo;

impl PostRepo {
    /// Insert a post. Absent optional fields take the column defaults.
    ///
    /// The row and its tag links are written in one transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePost,
        slug: &str,
        author_id: DbId,
    ) -> Result<Post, sqlx::Error> {
        let query = format!(
            "INSERT INTO posts
                (title, slug, seo_title, content, excerpt, enable_downloads,
                 download_section_title, download_button_text, download_url,
                 subtitle_url, subtitle_button_text, author_id, category_id,
                 published_date, is_published)
             VALUES ($1, $2, $3,
                     COALESCE($4, ''),
                     COALESCE($5, ''),
                     COALESCE($6, TRUE),
                     COALESCE($7, 'Download Links'),
                     COALESCE($8, 'Download Now'),
                     COALESCE($9, ''),
                     COALESCE($10, ''),
                     COALESCE($11, 'Download Subtitle'),
                     $12, $13,
                     COALESCE($14, NOW()),
                     COALESCE($15, TRUE))
             RETURNING {COLUMNS}"
        );
        let mut tx = pool.begin().await?;
        let post = sqlx::query_as::<_, Post>(&query)
            .bind(&input.title)
            .bind(slug)
            .bind(&input.seo_title)
            .bind(&input.content)
            .bind(&input.excerpt)
            .bind(input.enable_downloads)
            .bind(&input.download_section_title)
            .bind(&input.download_button_text)
            .bind(&input.download_url)
            .bind(&input.subtitle_url)
            .bind(&input.subtitle_button_text)
            .bind(author_id)
            .bind(input.category_id)
            .bind(input.published_date)
            .bind(input.is_published)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(ref tag_ids) = input.tag_ids {
            TagRepo::set_post_tags_inner(&mut tx, post.id, tag_ids).await?;
        }

        tx.commit().await?;
        Ok(post)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE slug = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// A published post addressed by its public URL.
    pub async fn find_published(
        pool: &PgPool,
        category_slug: &str,
        slug: &str,
    ) -> Result<Option<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            "SELECT p.* FROM posts p
             JOIN categories c ON c.id = p.category_id
             WHERE c.slug = $1 AND p.slug = $2 AND p.is_published = TRUE",
        )
        .bind(category_slug)
        .bind(slug)
        .fetch_optional(pool)
        .await
    }

    /// Card projection of a published post by slug, used to resolve its
    /// canonical URL.
    pub async fn find_published_card(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<PostCard>, sqlx::Error> {
        let query = format!(
            "SELECT {CARD_COLUMNS} FROM posts p
             LEFT JOIN categories c ON c.id = p.category_id
             WHERE p.slug = $1 AND p.is_published = TRUE"
        );
        sqlx::query_as::<_, PostCard>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Published posts, newest first.
    pub async fn list_published(
        pool: &PgPool,
        filter: &PublishedFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostCard>, sqlx::Error> {
        let query = format!(
            "SELECT {CARD_COLUMNS} FROM posts p
             LEFT JOIN categories c ON c.id = p.category_id
             WHERE {PUBLISHED_WHERE}
             ORDER BY p.published_date DESC, p.id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, PostCard>(&query)
            .bind(filter.category_id)
            .bind(filter.tag_id)
            .bind(&filter.search)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_published(
        pool: &PgPool,
        filter: &PublishedFilter,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM posts p WHERE {PUBLISHED_WHERE}");
        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(filter.category_id)
            .bind(filter.tag_id)
            .bind(&filter.search)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Latest published posts in any of the given categories.
    pub async fn list_published_in_categories(
        pool: &PgPool,
        category_ids: &[DbId],
        limit: i64,
    ) -> Result<Vec<PostCard>, sqlx::Error> {
        let query = format!(
            "SELECT {CARD_COLUMNS} FROM posts p
             LEFT JOIN categories c ON c.id = p.category_id
             WHERE p.is_published = TRUE AND p.category_id = ANY($1)
             ORDER BY p.published_date DESC, p.id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, PostCard>(&query)
            .bind(category_ids)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Other published posts in the same category, newest first.
    pub async fn list_related(pool: &PgPool, post: &Post) -> Result<Vec<PostCard>, sqlx::Error> {
        let Some(category_id) = post.category_id else {
            return Ok(Vec::new());
        };
        let query = format!(
            "SELECT {CARD_COLUMNS} FROM posts p
             LEFT JOIN categories c ON c.id = p.category_id
             WHERE p.is_published = TRUE AND p.category_id = $1 AND p.id <> $2
             ORDER BY p.published_date DESC, p.id DESC
             LIMIT $3"
        );
        sqlx::query_as::<_, PostCard>(&query)
            .bind(category_id)
            .bind(post.id)
            .bind(RELATED_POSTS_LIMIT)
            .fetch_all(pool)
            .await
    }

    /// Back-office list with filters, search and admin columns.
    pub async fn list_admin(
        pool: &PgPool,
        filter: &PostFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostAdminRow>, sqlx::Error> {
        sqlx::query_as::<_, PostAdminRow>(
            "SELECT p.id, p.title, p.slug, p.thumbnail, p.views, p.is_published,
                    p.enable_downloads, p.published_date, p.category_id,
                    c.name AS category_name, u.username AS author_username,
                    (SELECT COUNT(*) FROM download_qualities dq
                      WHERE dq.post_id = p.id) AS quality_count,
                    (SELECT COUNT(*) FROM subtitles s
                      WHERE s.post_id = p.id) AS subtitle_count,
                    (SELECT COALESCE(SUM(dq.download_count), 0) FROM download_qualities dq
                      WHERE dq.post_id = p.id)::BIGINT AS video_downloads,
                    (SELECT COALESCE(SUM(s.download_count), 0) FROM subtitles s
                      WHERE s.post_id = p.id)::BIGINT AS subtitle_downloads
             FROM posts p
             JOIN users u ON u.id = p.author_id
             LEFT JOIN categories c ON c.id = p.category_id
             WHERE ($1::BIGINT IS NULL OR p.category_id = $1)
               AND ($2::BIGINT IS NULL OR EXISTS (
                     SELECT 1 FROM post_tags pt WHERE pt.post_id = p.id AND pt.tag_id = $2))
               AND ($3::BOOL IS NULL OR p.is_published = $3)
               AND ($4::BOOL IS NULL OR p.enable_downloads = $4)
               AND ($5::TEXT IS NULL OR p.title ILIKE $5 OR p.content ILIKE $5
                    OR p.excerpt ILIKE $5 OR p.seo_title ILIKE $5)
             ORDER BY p.published_date DESC, p.id DESC
             LIMIT $6 OFFSET $7",
        )
        .bind(filter.category_id)
        .bind(filter.tag_id)
        .bind(filter.is_published)
        .bind(filter.enable_downloads)
        .bind(&filter.search)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Update a post. Only non-`None` fields are applied.
    ///
    /// If `tag_ids` is `Some`, replaces the tag set in the same transaction.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePost,
    ) -> Result<Option<Post>, sqlx::Error> {
        let query = format!(
            "UPDATE posts SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                seo_title = COALESCE($4, seo_title),
                content = COALESCE($5, content),
                excerpt = COALESCE($6, excerpt),
                enable_downloads = COALESCE($7, enable_downloads),
                download_section_title = COALESCE($8, download_section_title),
                download_button_text = COALESCE($9, download_button_text),
                download_url = COALESCE($10, download_url),
                subtitle_url = COALESCE($11, subtitle_url),
                subtitle_button_text = COALESCE($12, subtitle_button_text),
                author_id = COALESCE($13, author_id),
                category_id = COALESCE($14, category_id),
                published_date = COALESCE($15, published_date),
                is_published = COALESCE($16, is_published)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let mut tx = pool.begin().await?;
        let post = sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.seo_title)
            .bind(&input.content)
            .bind(&input.excerpt)
            .bind(input.enable_downloads)
            .bind(&input.download_section_title)
            .bind(&input.download_button_text)
            .bind(&input.download_url)
            .bind(&input.subtitle_url)
            .bind(&input.subtitle_button_text)
            .bind(input.author_id)
            .bind(input.category_id)
            .bind(input.published_date)
            .bind(input.is_published)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(ref post) = post {
            if let Some(ref tag_ids) = input.tag_ids {
                TagRepo::set_post_tags_inner(&mut tx, post.id, tag_ids).await?;
            }
        }

        tx.commit().await?;
        Ok(post)
    }

    /// Apply the list-editable columns to several posts in one transaction.
    /// Returns the number of rows touched.
    pub async fn apply_list_edits(
        pool: &PgPool,
        edits: &[PostListEdit],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut touched = 0;
        for edit in edits {
            let result = sqlx::query(
                "UPDATE posts SET
                    is_published = COALESCE($2, is_published),
                    enable_downloads = COALESCE($3, enable_downloads)
                 WHERE id = $1",
            )
            .bind(edit.id)
            .bind(edit.is_published)
            .bind(edit.enable_downloads)
            .execute(&mut *tx)
            .await?;
            touched += result.rows_affected();
        }
        tx.commit().await?;
        Ok(touched)
    }

    /// Set or clear the featured image name.
    pub async fn set_thumbnail(
        pool: &PgPool,
        id: DbId,
        thumbnail: Option<&str>,
    ) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("UPDATE posts SET thumbnail = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(thumbnail)
            .fetch_optional(pool)
            .await
    }

    /// Bump the view counter. The posts trigger leaves `updated_at` alone
    /// for view-only changes.
    pub async fn increment_views(pool: &PgPool, id: DbId) -> Result<i32, sqlx::Error> {
        let (views,): (i32,) =
            sqlx::query_as("UPDATE posts SET views = views + 1 WHERE id = $1 RETURNING views")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(views)
    }

    /// Delete a post. Comments, downloads and tag links cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
