//! Back-office handlers for tags.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hypeblog_core::types::DbId;
use hypeblog_db::models::tag::{CreateTag, UpdateTag};
use hypeblog_db::repositories::TagRepo;

use crate::error::AppResult;
use crate::handlers::categories::SearchParams;
use crate::handlers::{check_slug, not_found, require_text, resolve_slug, search_pattern};
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/tags
pub async fn list(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let pattern = search_pattern(params.q.as_deref());
    let tags = TagRepo::list(&state.pool, pattern.as_deref()).await?;

    Ok(Json(DataResponse { data: tags }))
}

/// POST /api/v1/tags
pub async fn create(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreateTag>,
) -> AppResult<impl IntoResponse> {
    require_text("name", &input.name)?;
    let slug = resolve_slug(input.slug.as_deref(), &input.name)?;

    let tag = TagRepo::create(&state.pool, input.name.trim(), &slug).await?;

    tracing::info!(tag_id = tag.id, user_id = user.user_id, "Tag created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: tag })))
}

/// GET /api/v1/tags/{id}
pub async fn get(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let tag = TagRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Tag", id))?;

    Ok(Json(DataResponse { data: tag }))
}

/// PUT /api/v1/tags/{id}
pub async fn update(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTag>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        require_text("name", name)?;
    }
    check_slug(input.slug.as_deref())?;

    let tag = TagRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Tag", id))?;

    tracing::info!(tag_id = id, user_id = user.user_id, "Tag updated");

    Ok(Json(DataResponse { data: tag }))
}

/// DELETE /api/v1/tags/{id}
pub async fn delete(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !TagRepo::delete(&state.pool, id).await? {
        return Err(not_found("Tag", id));
    }

    tracing::info!(tag_id = id, user_id = user.user_id, "Tag deleted");

    Ok(StatusCode::NO_CONTENT)
}
