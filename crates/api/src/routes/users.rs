use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// `GET /` and `POST /` at `/users` (admin only).
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(users::list).post(users::create))
}
