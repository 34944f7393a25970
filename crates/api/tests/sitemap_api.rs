//! XML sitemaps, the stylesheet and robots.txt.

mod common;

use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use common::{body_text, get};
use hypeblog_db::models::post::CreatePost;
use hypeblog_db::repositories::{CategoryRepo, PostRepo, TagRepo};
use sqlx::PgPool;

async fn seed(pool: &PgPool) {
    let author = common::create_user(pool, "author", "editor").await;
    let news = CategoryRepo::create(pool, "News", "news", "").await.unwrap();
    let empty = CategoryRepo::create(pool, "Empty", "empty", "").await.unwrap();
    let tag = TagRepo::create(pool, "Drama", "drama").await.unwrap();

    let live = PostRepo::create(
        pool,
        &CreatePost {
            title: "Live".into(),
            category_id: Some(news.id),
            ..Default::default()
        },
        "live-post",
        author.id,
    )
    .await
    .unwrap();
    TagRepo::set_post_tags(pool, live.id, &[tag.id]).await.unwrap();

    PostRepo::create(
        pool,
        &CreatePost {
            title: "Draft".into(),
            category_id: Some(empty.id),
            is_published: Some(false),
            ..Default::default()
        },
        "draft-post",
        author.id,
    )
    .await
    .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn index_lists_every_section(pool: PgPool) {
    let t = common::build_test_app(pool);

    let response = get(t.app(), "/sitemap.xml").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("application/xml"));

    let xml = body_text(response).await;
    assert!(xml.contains("<sitemapindex"));
    assert!(xml.contains(r#"<?xml-stylesheet type="text/xsl" href="/sitemap.xsl"?>"#));
    for section in ["blog", "categories", "tags", "static"] {
        assert!(
            xml.contains(&format!("<loc>http://testserver/sitemap-{section}.xml</loc>")),
            "missing {section}"
        );
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sections_list_only_published_content(pool: PgPool) {
    seed(&pool).await;
    let t = common::build_test_app(pool);

    let blog = body_text(get(t.app(), "/sitemap-blog.xml").await).await;
    assert!(blog.contains("<loc>http://testserver/news/live-post/</loc>"));
    assert!(blog.contains("<changefreq>daily</changefreq>"));
    assert!(blog.contains("<lastmod>"));
    assert!(!blog.contains("draft-post"));

    let categories = body_text(get(t.app(), "/sitemap-categories.xml").await).await;
    assert!(categories.contains("<loc>http://testserver/category/news/</loc>"));
    assert!(!categories.contains("/category/empty/"));

    let tags = body_text(get(t.app(), "/sitemaps/tags.xml").await).await;
    assert!(tags.contains("<loc>http://testserver/tag/drama/</loc>"));

    let response = get(t.app(), "/sitemap-static.xml").await;
    assert_eq!(response.status(), StatusCode::OK);
    let statics = body_text(response).await;
    assert!(statics.contains("<loc>http://testserver/</loc>"));
    assert!(statics.contains("<loc>http://testserver/search/</loc>"));

    // The older /sitemaps/ location serves the same document.
    let legacy = body_text(get(t.app(), "/sitemaps/static.xml").await).await;
    assert_eq!(legacy, statics);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_section_and_empty_page_are_404(pool: PgPool) {
    seed(&pool).await;
    let t = common::build_test_app(pool);

    assert_eq!(get(t.app(), "/sitemaps/videos.xml").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(t.app(), "/sitemaps/blog").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(t.app(), "/sitemaps/blog.xml?p=2").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(t.app(), "/sitemaps/static.xml?p=2").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(t.app(), "/sitemap-videos.xml").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(t.app(), "/sitemap-blog.xml?p=2").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(t.app(), "/favicon.ico").await.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_first_page_is_still_served(pool: PgPool) {
    let t = common::build_test_app(pool);

    let response = get(t.app(), "/sitemaps/blog.xml").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("<urlset"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn robots_and_stylesheet(pool: PgPool) {
    let t = common::build_test_app(pool);

    let response = get(t.app(), "/robots.txt").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    let robots = body_text(response).await;
    assert!(robots.contains("Sitemap: http://testserver/sitemap.xml"));

    let response = get(t.app(), "/sitemap.xsl").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("xsl:stylesheet"));
}
