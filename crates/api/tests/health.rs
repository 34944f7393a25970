//! Health probe and cross-cutting HTTP behaviour: request ids, error bodies,
//! CORS on the admin API and response compression.

mod common;

use axum::body::Body;
use axum::http::header::{
    ACCEPT_ENCODING, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_METHOD, CONTENT_ENCODING,
    ORIGIN,
};
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get};
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_reports_database(pool: PgPool) {
    let t = common::build_test_app(pool);
    let response = get(t.app(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn every_response_gets_a_request_id(pool: PgPool) {
    let t = common::build_test_app(pool);

    for uri in ["/health", "/robots.txt", "/no/such/post/here/"] {
        let response = get(t.app(), uri).await;
        let id = response
            .headers()
            .get("x-request-id")
            .unwrap_or_else(|| panic!("{uri} has no x-request-id"));
        assert_eq!(id.to_str().unwrap().len(), 36);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_content_is_a_json_404(pool: PgPool) {
    let t = common::build_test_app(pool);
    let response = get(t.app(), "/category/missing/").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert!(json["error"].as_str().unwrap().contains("missing"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_api_answers_cors_preflight(pool: PgPool) {
    let t = common::build_test_app(pool);
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/posts")
        .header(ORIGIN, "http://localhost:5173")
        .header(ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = t.app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn large_responses_are_gzipped_on_request(pool: PgPool) {
    let t = common::build_test_app(pool);
    let request = Request::builder()
        .uri("/sitemap.xsl")
        .header(ACCEPT_ENCODING, "gzip")
        .body(Body::empty())
        .unwrap();

    let response = t.app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_ENCODING], "gzip");
}
