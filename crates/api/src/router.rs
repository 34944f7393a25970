//! The complete HTTP surface, shared by `main.rs` and the integration tests.
//!
//! ```text
//! /health, /robots.txt, /sitemap.xml, /sitemap.xsl, /sitemap-*.xml, /sitemaps/*
//! /api/v1/*        admin JSON API (CORS enabled for the back-office UI)
//! {MEDIA_URL}*     uploaded files straight from MEDIA_ROOT
//! /*               public site: listings, posts, pages, downloads
//! ```

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let request_id = HeaderName::from_static("x-request-id");
    let admin_api = routes::api_routes()
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(admin_cors(&config.cors_origins));

    let mut app = Router::new()
        .merge(routes::health::router())
        .merge(routes::sitemap::router())
        .nest("/api/v1", admin_api)
        .merge(routes::site::router());

    let media_prefix = config.media_url.trim_end_matches('/');
    if !media_prefix.is_empty() {
        app = app.nest_service(media_prefix, ServeDir::new(&config.media_root));
    }

    // Outermost last: request ids wrap tracing so every span carries one.
    app.layer(CompressionLayer::new())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .with_state(state)
}

/// CORS for the back-office UI. Origins that do not parse are skipped with
/// a warning.
fn admin_cors(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
