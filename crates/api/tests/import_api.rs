//! WordPress (WXR) import, directly and through the back-office endpoint.

mod common;

use assert_matches::assert_matches;
use axum::http::{Method, StatusCode};
use common::{body_json, send_multipart, MultipartBody};
use hypeblog_api::importer::{import_wordpress, ImportOptions};
use hypeblog_core::error::CoreError;
use hypeblog_db::repositories::{CategoryRepo, PageRepo, PostRepo, TagRepo};
use sqlx::PgPool;

const EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"
    xmlns:excerpt="http://wordpress.org/export/1.2/excerpt/"
    xmlns:content="http://purl.org/rss/1.0/modules/content/"
    xmlns:wp="http://wordpress.org/export/1.2/">
<channel>
    <title>Old Blog</title>
    <wp:category>
        <wp:term_id>3</wp:term_id>
        <wp:category_nicename>movies</wp:category_nicename>
        <wp:cat_name><![CDATA[Movies]]></wp:cat_name>
    </wp:category>
    <wp:tag>
        <wp:term_id>9</wp:term_id>
        <wp:tag_slug>action</wp:tag_slug>
        <wp:tag_name><![CDATA[Action]]></wp:tag_name>
    </wp:tag>
    <item>
        <title>Henry Danger S1 &amp; S2</title>
        <content:encoded><![CDATA[<p>Full season.</p>]]></content:encoded>
        <excerpt:encoded><![CDATA[Season pack]]></excerpt:encoded>
        <wp:post_date_gmt><![CDATA[2024-01-02 10:00:00]]></wp:post_date_gmt>
        <wp:post_name><![CDATA[henry-danger]]></wp:post_name>
        <wp:status><![CDATA[publish]]></wp:status>
        <wp:post_type><![CDATA[post]]></wp:post_type>
        <category domain="category" nicename="movies"><![CDATA[Movies]]></category>
        <category domain="post_tag" nicename="action"><![CDATA[Action]]></category>
        <category domain="post_tag" nicename="comedy"><![CDATA[Comedy]]></category>
    </item>
    <item>
        <title>Loose Post</title>
        <content:encoded><![CDATA[No category here]]></content:encoded>
        <wp:post_name><![CDATA[loose-post]]></wp:post_name>
        <wp:status><![CDATA[draft]]></wp:status>
        <wp:post_type><![CDATA[post]]></wp:post_type>
    </item>
    <item>
        <title>About Us</title>
        <content:encoded><![CDATA[About page]]></content:encoded>
        <wp:post_date><![CDATA[2023-06-01 08:30:00]]></wp:post_date>
        <wp:post_name></wp:post_name>
        <wp:status><![CDATA[publish]]></wp:status>
        <wp:post_type><![CDATA[page]]></wp:post_type>
    </item>
    <item>
        <title>poster.jpg</title>
        <wp:post_name><![CDATA[poster-jpg]]></wp:post_name>
        <wp:status><![CDATA[inherit]]></wp:status>
        <wp:post_type><![CDATA[attachment]]></wp:post_type>
    </item>
</channel>
</rss>"#;

async fn options(pool: &PgPool, skip_existing: bool) -> ImportOptions {
    let author = common::create_user(pool, "importer", "editor").await;
    let fallback = CategoryRepo::create(pool, "Uncategorized", "uncategorized", "")
        .await
        .unwrap();
    ImportOptions {
        default_category_id: Some(fallback.id),
        skip_existing,
        author_id: author.id,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn import_creates_posts_pages_and_terms(pool: PgPool) {
    let opts = options(&pool, false).await;

    let report = import_wordpress(&pool, EXPORT, &opts).await.unwrap();

    assert_eq!(report.posts_created, 2);
    assert_eq!(report.pages_created, 1);
    assert_eq!(report.ignored, 1);
    assert_eq!(report.categories_created, 1);
    assert_eq!(report.tags_created, 2);
    assert!(report.errors.is_empty(), "{:?}", report.errors);

    let movies = CategoryRepo::find_by_slug(&pool, "movies").await.unwrap().unwrap();
    let post = PostRepo::find_by_slug(&pool, "henry-danger").await.unwrap().unwrap();
    assert_eq!(post.title, "Henry Danger S1 & S2");
    assert_eq!(post.category_id, Some(movies.id));
    assert_eq!(post.author_id, opts.author_id);
    assert!(post.is_published);

    let mut tags: Vec<String> = TagRepo::list_for_post(&pool, post.id)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.slug)
        .collect();
    tags.sort();
    assert_eq!(tags, vec!["action", "comedy"]);

    let loose = PostRepo::find_by_slug(&pool, "loose-post").await.unwrap().unwrap();
    assert_eq!(loose.category_id, opts.default_category_id);
    assert!(!loose.is_published);

    let page = PageRepo::find_by_slug(&pool, "about-us").await.unwrap().unwrap();
    assert_eq!(page.title, "About Us");
    assert!(page.is_published);

    assert!(PostRepo::find_by_slug(&pool, "poster-jpg").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reimport_updates_or_skips_existing(pool: PgPool) {
    let opts = options(&pool, false).await;
    import_wordpress(&pool, EXPORT, &opts).await.unwrap();

    let again = import_wordpress(&pool, EXPORT, &opts).await.unwrap();
    assert_eq!(again.posts_created, 0);
    assert_eq!(again.posts_updated, 2);
    assert_eq!(again.pages_updated, 1);
    assert_eq!(again.categories_created, 0);
    assert_eq!(again.tags_created, 0);

    let skipping = ImportOptions {
        skip_existing: true,
        ..opts
    };
    let report = import_wordpress(&pool, EXPORT, &skipping).await.unwrap();
    assert_eq!(report.skipped, 3);
    assert_eq!(report.posts_updated, 0);
    assert_eq!(report.pages_updated, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unparseable_export_is_rejected(pool: PgPool) {
    let opts = options(&pool, false).await;

    let result = import_wordpress(&pool, "<feed><entry/></feed>", &opts).await;

    assert_matches!(result, Err(CoreError::Validation(_)));
}

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn import_endpoint_returns_report(pool: PgPool) {
    let fallback = CategoryRepo::create(&pool, "Uncategorized", "uncategorized", "")
        .await
        .unwrap();
    let t = common::build_test_app(pool.clone());
    let token = t.editor_token().await;

    let body = MultipartBody::new()
        .file("xml_file", "export.xml", "application/xml", EXPORT.as_bytes())
        .text("default_category", "uncategorized")
        .text("skip_existing", "on");
    let response = send_multipart(t.app(), Method::POST, "/api/v1/posts/import", body, &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["posts_created"], 2);
    assert_eq!(json["data"]["pages_created"], 1);
    assert_eq!(json["data"]["ignored"], 1);

    let loose = PostRepo::find_by_slug(&pool, "loose-post").await.unwrap().unwrap();
    assert_eq!(loose.category_id, Some(fallback.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn import_endpoint_rejects_bad_input(pool: PgPool) {
    let t = common::build_test_app(pool);
    let token = t.editor_token().await;

    let body = MultipartBody::new()
        .file("xml_file", "export.xml", "application/xml", EXPORT.as_bytes())
        .text("default_category", "no-such-category");
    let response = send_multipart(t.app(), Method::POST, "/api/v1/posts/import", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = MultipartBody::new().text("skip_existing", "on");
    let response = send_multipart(t.app(), Method::POST, "/api/v1/posts/import", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = MultipartBody::new().file("xml_file", "export.xml", "application/xml", b"<html/>");
    let response = send_multipart(t.app(), Method::POST, "/api/v1/posts/import", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
