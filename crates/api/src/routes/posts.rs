//! Back-office post routes, including nested download links.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{import, posts};
use crate::state::AppState;

/// Routes mounted at `/posts`.
///
/// ```text
/// GET    /                                      -> list
/// POST   /                                      -> create
/// PATCH  /                                      -> list_edit
/// GET    /quality-choices                       -> list_quality_choices
/// POST   /import                                -> import_wordpress_export
/// GET    /{id}                                  -> get
/// PUT    /{id}                                  -> update
/// DELETE /{id}                                  -> delete
/// PUT    /{id}/tags                             -> set_tags
/// POST   /{id}/featured-image                   -> upload_featured_image
/// DELETE /{id}/featured-image                   -> delete_featured_image
/// GET    /{id}/qualities                        -> list_qualities
/// POST   /{id}/qualities                        -> create_quality
/// PUT    /{id}/qualities/{quality_id}           -> update_quality
/// DELETE /{id}/qualities/{quality_id}           -> delete_quality
/// GET    /{id}/subtitles                        -> list_subtitles
/// POST   /{id}/subtitles                        -> create_subtitle
/// PUT    /{id}/subtitles/{subtitle_id}          -> update_subtitle
/// DELETE /{id}/subtitles/{subtitle_id}          -> delete_subtitle
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(posts::list).post(posts::create).patch(posts::list_edit),
        )
        .route("/quality-choices", get(posts::list_quality_choices))
        .route("/import", post(import::import_wordpress_export))
        .route(
            "/{id}",
            get(posts::get).put(posts::update).delete(posts::delete),
        )
        .route("/{id}/tags", put(posts::set_tags))
        .route(
            "/{id}/featured-image",
            post(posts::upload_featured_image).delete(posts::delete_featured_image),
        )
        .route(
            "/{id}/qualities",
            get(posts::list_qualities).post(posts::create_quality),
        )
        .route(
            "/{id}/qualities/{quality_id}",
            put(posts::update_quality).delete(posts::delete_quality),
        )
        .route(
            "/{id}/subtitles",
            get(posts::list_subtitles).post(posts::create_subtitle),
        )
        .route(
            "/{id}/subtitles/{subtitle_id}",
            put(posts::update_subtitle).delete(posts::delete_subtitle),
        )
}
