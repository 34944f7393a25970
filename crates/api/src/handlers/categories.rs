//! Back-office handlers for categories.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hypeblog_core::types::DbId;
use hypeblog_db::models::category::{CreateCategory, UpdateCategory};
use hypeblog_db::repositories::CategoryRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::{check_slug, not_found, require_text, resolve_slug, search_pattern};
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// GET /api/v1/categories
pub async fn list(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let pattern = search_pattern(params.q.as_deref());
    let categories = CategoryRepo::list(&state.pool, pattern.as_deref()).await?;

    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/categories
pub async fn create(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    require_text("name", &input.name)?;
    let slug = resolve_slug(input.slug.as_deref(), &input.name)?;

    let category = CategoryRepo::create(
        &state.pool,
        input.name.trim(),
        &slug,
        input.description.as_deref().unwrap_or_default(),
    )
    .await?;

    tracing::info!(category_id = category.id, user_id = user.user_id, "Category created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// GET /api/v1/categories/{id}
pub async fn get(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Category", id))?;

    Ok(Json(DataResponse { data: category }))
}

/// PUT /api/v1/categories/{id}
pub async fn update(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        require_text("name", name)?;
    }
    check_slug(input.slug.as_deref())?;

    let category = CategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Category", id))?;

    tracing::info!(category_id = id, user_id = user.user_id, "Category updated");

    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/categories/{id}
///
/// Posts in the category are kept without a category.
pub async fn delete(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !CategoryRepo::delete(&state.pool, id).await? {
        return Err(not_found("Category", id));
    }

    tracing::info!(category_id = id, user_id = user.user_id, "Category deleted");

    Ok(StatusCode::NO_CONTENT)
}
