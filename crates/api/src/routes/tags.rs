use axum::routing::get;
use axum::Router;

use crate::handlers::tags;
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
        .route("/", get(tags::list).post(tags::create))
        .route(
            "/{id}",
            get(tags::get).put(tags::update).delete(tags::delete),
        )
}
