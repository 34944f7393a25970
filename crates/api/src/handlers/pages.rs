//! Back-office handlers for static pages.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hypeblog_core::types::DbId;
use hypeblog_db::models::page::{CreatePage, PageFilter, UpdatePage};
use hypeblog_db::repositories::PageRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::{check_slug, not_found, require_text, resolve_slug, search_pattern};
use crate::middleware::rbac::RequireStaff;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PageListParams {
    pub is_published: Option<bool>,
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/pages
pub async fn list(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<PageListParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();
    let filter = PageFilter {
        is_published: params.is_published,
        search: search_pattern(params.q.as_deref()),
    };
    let pages = PageRepo::list(&state.pool, &filter, limit, offset).await?;

    Ok(Json(DataResponse { data: pages }))
}

/// POST /api/v1/pages
pub async fn create(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreatePage>,
) -> AppResult<impl IntoResponse> {
    require_text("title", &input.title)?;
    let slug = resolve_slug(input.slug.as_deref(), &input.title)?;

    let page = PageRepo::create(&state.pool, &input, &slug).await?;

    tracing::info!(page_id = page.id, user_id = user.user_id, "Page created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: page })))
}

/// GET /api/v1/pages/{id}
pub async fn get(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let page = PageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Page", id))?;

    Ok(Json(DataResponse { data: page }))
}

/// PUT /api/v1/pages/{id}
pub async fn update(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePage>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = &input.title {
        require_text("title", title)?;
    }
    check_slug(input.slug.as_deref())?;

    let page = PageRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Page", id))?;

    tracing::info!(page_id = id, user_id = user.user_id, "Page updated");

    Ok(Json(DataResponse { data: page }))
}

/// DELETE /api/v1/pages/{id}
pub async fn delete(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !PageRepo::delete(&state.pool, id).await? {
        return Err(not_found("Page", id));
    }

    tracing::info!(page_id = id, user_id = user.user_id, "Page deleted");

    Ok(StatusCode::NO_CONTENT)
}
