//! Back-office handlers for homepage sections and their category sets.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hypeblog_core::error::CoreError;
use hypeblog_core::types::DbId;
use hypeblog_db::models::homepage_section::{
    CreateHomepageSection, HomepageSection, UpdateHomepageSection,
};
use hypeblog_db::repositories::HomepageSectionRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::{not_found, require_text};
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// A section together with the ids of the categories it draws posts from.
#[derive(Debug, Serialize)]
pub struct SectionWithCategories {
    #[serde(flatten)]
    pub section: HomepageSection,
    pub category_ids: Vec<DbId>,
}

async fn with_categories(
    state: &AppState,
    section: HomepageSection,
) -> AppResult<SectionWithCategories> {
    let category_ids = HomepageSectionRepo::category_ids(&state.pool, section.id).await?;
    Ok(SectionWithCategories {
        section,
        category_ids,
    })
}

fn check_display_order(order: Option<i32>) -> AppResult<()> {
    match order {
        Some(n) if n < 0 => Err(AppError::Core(CoreError::Validation(
            "display_order must not be negative".into(),
        ))),
        _ => Ok(()),
    }
}

/// GET /api/v1/homepage-sections
pub async fn list(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let mut sections = Vec::new();
    for section in HomepageSectionRepo::list(&state.pool).await? {
        sections.push(with_categories(&state, section).await?);
    }

    Ok(Json(DataResponse { data: sections }))
}

/// POST /api/v1/homepage-sections
pub async fn create(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreateHomepageSection>,
) -> AppResult<impl IntoResponse> {
    require_text("title", &input.title)?;
    check_display_order(input.display_order)?;

    let section = HomepageSectionRepo::create(&state.pool, &input).await?;

    tracing::info!(section_id = section.id, user_id = user.user_id, "Homepage section created");

    let data = with_categories(&state, section).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// GET /api/v1/homepage-sections/{id}
pub async fn get(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let section = HomepageSectionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("HomepageSection", id))?;

    Ok(Json(DataResponse {
        data: with_categories(&state, section).await?,
    }))
}

/// PUT /api/v1/homepage-sections/{id}
///
/// `category_ids`, when present, replaces the whole category set.
pub async fn update(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateHomepageSection>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = &input.title {
        require_text("title", title)?;
    }
    check_display_order(input.display_order)?;

    let section = HomepageSectionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("HomepageSection", id))?;

    tracing::info!(section_id = id, user_id = user.user_id, "Homepage section updated");

    Ok(Json(DataResponse {
        data: with_categories(&state, section).await?,
    }))
}

/// DELETE /api/v1/homepage-sections/{id}
pub async fn delete(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !HomepageSectionRepo::delete(&state.pool, id).await? {
        return Err(not_found("HomepageSection", id));
    }

    tracing::info!(section_id = id, user_id = user.user_id, "Homepage section deleted");

    Ok(StatusCode::NO_CONTENT)
}
