//! Public site routes, mounted at the root.

use axum::routing::get;
use axum::Router;

use crate::handlers::{downloads, media, site};
use crate::state::AppState;

/// Public routes. Static prefixes win over the slug patterns, so a page or
/// category slug equal to one of them is shadowed. The first segment of a
/// post URL is its category slug.
///
/// ```text
/// GET  /                              -> home
/// GET  /search/                       -> search
/// GET  /category/{slug}/              -> category_detail
/// GET  /tag/{slug}/                   -> tag_detail
/// GET  /download/quality/{id}/        -> downloads::quality
/// GET  /download/subtitle/{id}/       -> downloads::subtitle
/// GET  /posts/{slug}/                 -> post_redirect
/// GET  /media/                        -> media::public_list
/// GET  /media/{id}/                   -> media::public_detail
/// GET  /{slug}/                       -> page_detail
/// GET  /{slug}/{post_slug}/           -> post_detail
/// POST /{slug}/{post_slug}/           -> create_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(site::home))
        .route("/search/", get(site::search))
        .route("/category/{slug}/", get(site::category_detail))
        .route("/tag/{slug}/", get(site::tag_detail))
        .route("/download/quality/{id}/", get(downloads::quality))
        .route("/download/subtitle/{id}/", get(downloads::subtitle))
        .route("/posts/{slug}/", get(site::post_redirect))
        .route("/media/", get(media::public_list))
        .route("/media/{id}/", get(media::public_detail))
        .route("/{slug}/", get(site::page_detail))
        .route(
            "/{slug}/{post_slug}/",
            get(site::post_detail).post(site::create_comment),
        )
}
