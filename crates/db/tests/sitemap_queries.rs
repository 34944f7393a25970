//! Sitemap queries list only published, reachable content.

use hypeblog_db::models::post::CreatePost;
use hypeblog_db::models::user::CreateUser;
use hypeblog_db::repositories::{CategoryRepo, PostRepo, SitemapRepo, TagRepo, UserRepo};
use sqlx::PgPool;

async fn seed(pool: &PgPool) {
    let author = UserRepo::create(
        pool,
        &CreateUser {
            username: "writer".into(),
            email: "writer@example.com".into(),
            password_hash: "x".into(),
            role: "editor".into(),
        },
    )
    .await
    .unwrap()
    .id;
    let movies = CategoryRepo::create(pool, "Movies", "movies", "").await.unwrap();
    CategoryRepo::create(pool, "Empty", "empty", "").await.unwrap();
    let action = TagRepo::create(pool, "Action", "action").await.unwrap();
    let unused = TagRepo::create(pool, "Unused", "unused").await.unwrap();

    let live = PostRepo::create(
        pool,
        &CreatePost {
            title: "Live".into(),
            category_id: Some(movies.id),
            ..Default::default()
        },
        "live",
        author,
    )
    .await
    .unwrap();
    TagRepo::set_post_tags(pool, live.id, &[action.id]).await.unwrap();

    let draft = PostRepo::create(
        pool,
        &CreatePost {
            title: "Draft".into(),
            category_id: Some(movies.id),
            is_published: Some(false),
            ..Default::default()
        },
        "draft",
        author,
    )
    .await
    .unwrap();
    TagRepo::set_post_tags(pool, draft.id, &[unused.id]).await.unwrap();

    PostRepo::create(
        pool,
        &CreatePost {
            title: "Orphan".into(),
            ..Default::default()
        },
        "orphan",
        author,
    )
    .await
    .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blog_section_lists_published_categorised_posts(pool: PgPool) {
    seed(&pool).await;
    let rows = SitemapRepo::posts(&pool, 100, 0).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].slug, "live");
    assert_eq!(rows[0].category_slug, "movies");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_term_sections_skip_unused_terms(pool: PgPool) {
    seed(&pool).await;

    let categories = SitemapRepo::categories(&pool, 100, 0).await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].slug, "movies");
    assert!(categories[0].lastmod.is_some());

    let tags = SitemapRepo::tags(&pool, 100, 0).await.unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].slug, "action");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pagination_past_end_is_empty(pool: PgPool) {
    seed(&pool).await;
    assert!(SitemapRepo::posts(&pool, 100, 100).await.unwrap().is_empty());
}
