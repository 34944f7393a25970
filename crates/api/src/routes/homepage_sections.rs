use axum::routing::get;
use axum::Router;

use crate::handlers::homepage_sections;
use crate::state::AppState;

/// ```text
/// GET    /       -> list
/// POST   /       -> create
/// GET    /{id}   -> get
/// PUT    /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(homepage_sections::list).post(homepage_sections::create))
        .route(
            "/{id}",
            get(homepage_sections::get).put(homepage_sections::update).delete(homepage_sections::delete),
        )
}
