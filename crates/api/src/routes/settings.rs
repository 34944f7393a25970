use axum::routing::get;
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

/// `GET /` and `PUT /` at `/settings` (admin only).
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(settings::get).put(settings::update))
}
