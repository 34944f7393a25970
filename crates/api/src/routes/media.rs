use axum::routing::get;
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// Back-office media library, mounted at `/media` under `/api/v1`.
///
/// ```text
/// GET    /       -> list
/// POST   /       -> upload (multipart)
/// GET    /{id}   -> get
/// PUT    /{id}   -> replace (multipart)
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(media::list).post(media::upload))
        .route(
            "/{id}",
            get(media::get).put(media::replace).delete(media::delete),
        )
}
