//! Login, token handling and role enforcement.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json, post_json_auth, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let user = common::create_user(&pool, "loginuser", "admin").await;
    let t = common::build_test_app(pool);

    let body = json!({ "username": "loginuser", "password": TEST_PASSWORD });
    let response = post_json(t.app(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["expires_in"], 3600);
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["role"], "admin");
    assert!(json["user"].get("password_hash").is_none());

    // The issued token works against an authenticated endpoint.
    let token = json["access_token"].as_str().unwrap();
    let me = get_auth(t.app(), "/api/v1/auth/me", token).await;
    assert_eq!(me.status(), StatusCode::OK);
    let me = body_json(me).await;
    assert_eq!(me["data"]["username"], "loginuser");
    assert!(me["data"]["last_login_at"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    common::create_user(&pool, "wrongpw", "editor").await;
    let t = common::build_test_app(pool);

    let body = json!({ "username": "wrongpw", "password": "incorrect_password" });
    let response = post_json(t.app(), "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_nonexistent_user(pool: PgPool) {
    let t = common::build_test_app(pool);

    let body = json!({ "username": "ghost", "password": "whatever" });
    let response = post_json(t.app(), "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_inactive_user(pool: PgPool) {
    let user = common::create_user(&pool, "inactive", "editor").await;
    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();
    let t = common::build_test_app(pool);

    let body = json!({ "username": "inactive", "password": TEST_PASSWORD });
    let response = post_json(t.app(), "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_or_bad_token_is_401(pool: PgPool) {
    let t = common::build_test_app(pool);

    let response = get(t.app(), "/api/v1/posts").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(t.app(), "/api/v1/posts", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_editor_cannot_reach_admin_endpoints(pool: PgPool) {
    let t = common::build_test_app(pool);
    let editor = t.editor_token().await;

    let response = get_auth(t.app(), "/api/v1/posts", &editor).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(t.app(), "/api/v1/users", &editor).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(t.app(), "/api/v1/settings", &editor).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_creates_user(pool: PgPool) {
    let t = common::build_test_app(pool);
    let admin = t.admin_token().await;

    let body = json!({
        "username": "newbie",
        "email": "newbie@example.com",
        "password": "long-enough-password",
        "role": "editor",
    });
    let response = post_json_auth(t.app(), "/api/v1/users", body, &admin).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "newbie");
    assert_eq!(json["data"]["role"], "editor");

    // The new account can log in.
    let login = json!({ "username": "newbie", "password": "long-enough-password" });
    let response = post_json(t.app(), "/api/v1/auth/login", login).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Duplicate usernames conflict.
    let dup = json!({
        "username": "newbie",
        "email": "other@example.com",
        "password": "long-enough-password",
        "role": "editor",
    });
    let response = post_json_auth(t.app(), "/api/v1/users", dup, &admin).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_creation_validates_input(pool: PgPool) {
    let t = common::build_test_app(pool);
    let admin = t.admin_token().await;

    let cases = [
        json!({ "username": "a", "email": "not-an-email", "password": "long-enough-password", "role": "editor" }),
        json!({ "username": "b", "email": "b@example.com", "password": "short", "role": "editor" }),
        json!({ "username": "c", "email": "c@example.com", "password": "long-enough-password", "role": "viewer" }),
    ];
    for body in cases {
        let response = post_json_auth(t.app(), "/api/v1/users", body, &admin).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
