//! Site settings (admin only).

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use hypeblog_db::models::site_settings::UpdateSiteSettings;
use hypeblog_db::repositories::SiteSettingsRepo;

use crate::error::AppResult;
use crate::handlers::require_text;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/settings
pub async fn get(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let settings = SiteSettingsRepo::load(&state.pool).await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/settings
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpdateSiteSettings>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = &input.site_title {
        require_text("site_title", title)?;
    }
    if let Some(name) = &input.site_name {
        require_text("site_name", name)?;
    }

    let settings = SiteSettingsRepo::save(&state.pool, &input).await?;

    tracing::info!(user_id = admin.user_id, "Site settings updated");

    Ok(Json(DataResponse { data: settings }))
}
