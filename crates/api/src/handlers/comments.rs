//! Back-office comment moderation.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hypeblog_core::types::{DbId, Timestamp};
use hypeblog_db::models::comment::{CommentFilter, UpdateComment};
use hypeblog_db::repositories::CommentRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::{not_found, search_pattern};
use crate::middleware::rbac::RequireStaff;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CommentListParams {
    pub post_id: Option<DbId>,
    pub is_approved: Option<bool>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
    /// Matches name, email and comment text.
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub ids: Vec<DbId>,
}

#[derive(Debug, Serialize)]
pub struct ApproveResponse {
    pub approved: u64,
}

/// GET /api/v1/comments
pub async fn list(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<CommentListParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();
    let filter = CommentFilter {
        post_id: params.post_id,
        is_approved: params.is_approved,
        created_from: params.created_from,
        created_to: params.created_to,
        search: search_pattern(params.q.as_deref()),
    };
    let comments = CommentRepo::list(&state.pool, &filter, limit, offset).await?;

    Ok(Json(DataResponse { data: comments }))
}

/// GET /api/v1/comments/{id}
pub async fn get(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let comment = CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Comment", id))?;

    Ok(Json(DataResponse { data: comment }))
}

/// PUT /api/v1/comments/{id}
pub async fn update(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateComment>,
) -> AppResult<impl IntoResponse> {
    let comment = CommentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Comment", id))?;

    tracing::info!(comment_id = id, user_id = user.user_id, "Comment updated");

    Ok(Json(DataResponse { data: comment }))
}

/// POST /api/v1/comments/approve
///
/// Bulk "approve selected comments" action.
pub async fn approve(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<ApproveRequest>,
) -> AppResult<impl IntoResponse> {
    if input.ids.is_empty() {
        return Err(AppError::BadRequest("ids must not be empty".into()));
    }
    let approved = CommentRepo::approve_many(&state.pool, &input.ids).await?;

    tracing::info!(approved, user_id = user.user_id, "Comments approved");

    Ok(Json(DataResponse {
        data: ApproveResponse { approved },
    }))
}

/// DELETE /api/v1/comments/{id}
pub async fn delete(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !CommentRepo::delete(&state.pool, id).await? {
        return Err(not_found("Comment", id));
    }

    tracing::info!(comment_id = id, user_id = user.user_id, "Comment deleted");

    Ok(StatusCode::NO_CONTENT)
}
