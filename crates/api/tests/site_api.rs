//! Public site: listings, post detail, redirects and comment submission.

mod common;

use axum::http::header::LOCATION;
use axum::http::StatusCode;
use common::{body_json, get, post_json};
use hypeblog_db::models::category::Category;
use hypeblog_db::models::download::CreateDownloadQuality;
use hypeblog_db::models::page::CreatePage;
use hypeblog_db::models::post::{CreatePost, Post};
use hypeblog_db::repositories::{
    CategoryRepo, CommentRepo, DownloadRepo, PageRepo, PostRepo, TagRepo,
};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

struct Fixture {
    category: Category,
    published: Post,
    draft: Post,
}

async fn seed(pool: &PgPool) -> Fixture {
    let author = common::create_user(pool, "author", "editor").await;
    let category = CategoryRepo::create(pool, "News", "news", "").await.unwrap();

    let published = PostRepo::create(
        pool,
        &CreatePost {
            title: "Hello World".into(),
            seo_title: Some("Hello World (2024) Full Movie".into()),
            content: Some("Body".into()),
            category_id: Some(category.id),
            ..Default::default()
        },
        "hello-world",
        author.id,
    )
    .await
    .unwrap();

    let draft = PostRepo::create(
        pool,
        &CreatePost {
            title: "Secret Draft".into(),
            category_id: Some(category.id),
            is_published: Some(false),
            ..Default::default()
        },
        "secret-draft",
        author.id,
    )
    .await
    .unwrap();

    Fixture {
        category,
        published,
        draft,
    }
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn home_lists_only_published_posts(pool: PgPool) {
    let fx = seed(&pool).await;
    let t = common::build_test_app(pool);

    let response = get(t.app(), "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["site"]["site_name"], "Hypeblog9jaTV");
    assert_eq!(json["posts"]["total"], 1);
    assert_eq!(json["posts"]["page"], 1);
    assert_eq!(json["posts"]["items"][0]["id"], fx.published.id);
    assert_eq!(json["posts"]["items"][0]["url"], "/news/hello-world/");
    assert!(json["sections"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn search_matches_title_and_ignores_blank_query(pool: PgPool) {
    seed(&pool).await;
    let t = common::build_test_app(pool);

    let json = body_json(get(t.app(), "/search/?q=hello").await).await;
    assert_eq!(json["query"], "hello");
    assert_eq!(json["posts"]["total"], 1);

    let json = body_json(get(t.app(), "/search/?q=secret").await).await;
    assert_eq!(json["posts"]["total"], 0);

    let json = body_json(get(t.app(), "/search/?q=%20%20").await).await;
    assert_eq!(json["posts"]["total"], 0);
    assert!(json["posts"]["items"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn category_and_tag_archives(pool: PgPool) {
    let fx = seed(&pool).await;
    let tag = TagRepo::create(&pool, "Comedy", "comedy").await.unwrap();
    TagRepo::set_post_tags(&pool, fx.published.id, &[tag.id])
        .await
        .unwrap();
    TagRepo::set_post_tags(&pool, fx.draft.id, &[tag.id])
        .await
        .unwrap();
    let t = common::build_test_app(pool);

    let json = body_json(get(t.app(), "/category/news/").await).await;
    assert_eq!(json["category"]["id"], fx.category.id);
    assert_eq!(json["url"], "/category/news/");
    assert_eq!(json["posts"]["total"], 1);

    let json = body_json(get(t.app(), "/tag/comedy/").await).await;
    assert_eq!(json["url"], "/tag/comedy/");
    assert_eq!(json["posts"]["total"], 1);

    assert_eq!(get(t.app(), "/category/missing/").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(t.app(), "/tag/missing/").await.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn homepage_sections_show_their_categories(pool: PgPool) {
    use hypeblog_db::models::homepage_section::CreateHomepageSection;
    use hypeblog_db::repositories::HomepageSectionRepo;

    let fx = seed(&pool).await;
    HomepageSectionRepo::create(
        &pool,
        &CreateHomepageSection {
            title: "Hidden".into(),
            enabled: Some(false),
            display_order: Some(0),
            category_ids: Some(vec![fx.category.id]),
        },
    )
    .await
    .unwrap();
    HomepageSectionRepo::create(
        &pool,
        &CreateHomepageSection {
            title: "Latest News".into(),
            enabled: None,
            display_order: Some(1),
            category_ids: Some(vec![fx.category.id]),
        },
    )
    .await
    .unwrap();
    let t = common::build_test_app(pool);

    let json = body_json(get(t.app(), "/").await).await;
    let sections = json["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0]["title"], "Latest News");
    assert_eq!(sections[0]["posts"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Detail pages
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn post_detail_counts_views(pool: PgPool) {
    let fx = seed(&pool).await;
    DownloadRepo::create_quality(
        &pool,
        fx.published.id,
        &CreateDownloadQuality {
            quality: "1080p".into(),
            download_url: "https://files.example.com/hello.mp4".into(),
            is_premium: None,
        },
    )
    .await
    .unwrap();
    let t = common::build_test_app(pool.clone());

    let response = get(t.app(), "/news/hello-world/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["post"]["views"], 1);
    assert_eq!(json["page_title"], "Hello World (2024) Full Movie");
    assert_eq!(json["url"], "/news/hello-world/");
    assert_eq!(json["category"]["slug"], "news");
    let quality_id = json["qualities"][0]["id"].as_i64().unwrap();
    assert_eq!(json["qualities"][0]["label"], "DOWNLOAD MOVIE 1080p (FHD)]");
    assert_eq!(
        json["qualities"][0]["download_path"],
        format!("/download/quality/{quality_id}/")
    );

    let json = body_json(get(t.app(), "/news/hello-world/").await).await;
    assert_eq!(json["post"]["views"], 2);

    // Counting views must not touch the modification time.
    let stored = PostRepo::find_by_id(&pool, fx.published.id).await.unwrap().unwrap();
    assert_eq!(stored.views, 2);
    assert_eq!(stored.updated_at, fx.published.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn disabled_downloads_are_not_listed(pool: PgPool) {
    let fx = seed(&pool).await;
    DownloadRepo::create_quality(
        &pool,
        fx.published.id,
        &CreateDownloadQuality {
            quality: "720p".into(),
            download_url: "https://files.example.com/a.mp4".into(),
            is_premium: None,
        },
    )
    .await
    .unwrap();
    sqlx::query("UPDATE posts SET enable_downloads = FALSE WHERE id = $1")
        .bind(fx.published.id)
        .execute(&pool)
        .await
        .unwrap();
    let t = common::build_test_app(pool);

    let json = body_json(get(t.app(), "/news/hello-world/").await).await;
    assert!(json["qualities"].as_array().unwrap().is_empty());
    assert!(json["subtitles"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unpublished_or_misplaced_posts_are_404(pool: PgPool) {
    seed(&pool).await;
    CategoryRepo::create(&pool, "Music", "music", "").await.unwrap();
    let t = common::build_test_app(pool);

    assert_eq!(get(t.app(), "/news/secret-draft/").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(t.app(), "/music/hello-world/").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(t.app(), "/posts/secret-draft/").await.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn legacy_post_url_redirects_permanently(pool: PgPool) {
    seed(&pool).await;
    let t = common::build_test_app(pool);

    let response = get(t.app(), "/posts/hello-world/").await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.headers()[LOCATION], "/news/hello-world/");

    let response = get(t.app(), "/posts/hello-world/?utm_source=feed&ref=1").await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        response.headers()[LOCATION],
        "/news/hello-world/?utm_source=feed&ref=1"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn comments_wait_for_approval(pool: PgPool) {
    seed(&pool).await;
    let t = common::build_test_app(pool.clone());

    let body = json!({ "name": "Ada", "email": "ada@example.com", "comment": "Great post" });
    let response = post_json(t.app(), "/news/hello-world/", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["is_approved"], false);
    let comment_id = created["data"]["id"].as_i64().unwrap();

    let json = body_json(get(t.app(), "/news/hello-world/").await).await;
    assert!(json["comments"].as_array().unwrap().is_empty());

    CommentRepo::approve_many(&pool, &[comment_id]).await.unwrap();

    let json = body_json(get(t.app(), "/news/hello-world/").await).await;
    assert_eq!(json["comments"][0]["name"], "Ada");
    assert!(json["comments"][0].get("email").is_none());

    // Comments on drafts are refused.
    let body = json!({ "name": "Ada", "email": "ada@example.com", "comment": "Hi" });
    let response = post_json(t.app(), "/news/secret-draft/", body).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_comment_is_rejected(pool: PgPool) {
    seed(&pool).await;
    let t = common::build_test_app(pool);

    let body = json!({ "name": "", "email": "not-an-email", "comment": "Hi" });
    let response = post_json(t.app(), "/news/hello-world/", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pages_are_served_by_slug(pool: PgPool) {
    PageRepo::create(
        &pool,
        &CreatePage {
            title: "About".into(),
            content: Some("Who we are".into()),
            ..Default::default()
        },
        "about",
    )
    .await
    .unwrap();
    PageRepo::create(
        &pool,
        &CreatePage {
            title: "Hidden".into(),
            is_published: Some(false),
            ..Default::default()
        },
        "hidden",
    )
    .await
    .unwrap();
    let t = common::build_test_app(pool);

    let response = get(t.app(), "/about/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["page"]["content"], "Who we are");
    assert_eq!(json["url"], "/about/");

    assert_eq!(get(t.app(), "/hidden/").await.status(), StatusCode::NOT_FOUND);
}
