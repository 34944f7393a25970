use axum::routing::{get, post};
use axum::Router;

use crate::handlers::comments;
use crate::state::AppState;

/// Routes mounted at `/comments`.
///
/// ```text
/// GET    /          -> list
/// POST   /approve   -> approve
/// GET    /{id}      -> get
/// PUT    /{id}      -> update
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(comments::list))
        .route("/approve", post(comments::approve))
        .route(
            "/{id}",
            get(comments::get)
                .put(comments::update)
                .delete(comments::delete),
        )
}
