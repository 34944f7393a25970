//! Public download redirects.
//!
//! Each hit bumps the counter, then redirects (302) to the download URL
//! passed through the link shortener. The shortener falls back to the
//! original URL on its own.

use axum::extract::{Path, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderName, StatusCode};
use axum::response::IntoResponse;
use hypeblog_core::types::DbId;
use hypeblog_db::repositories::{DownloadRepo, PostRepo};

use crate::error::AppResult;
use crate::handlers::not_found;
use crate::state::AppState;

async fn redirect_to(
    state: &AppState,
    post_id: DbId,
    url: &str,
) -> AppResult<(StatusCode, [(HeaderName, String); 1])> {
    let title = PostRepo::find_by_id(&state.pool, post_id)
        .await?
        .map(|post| post.title);
    let location = state.shortener.shorten(url, title.as_deref()).await;

    Ok((StatusCode::FOUND, [(LOCATION, location)]))
}

/// GET /download/quality/{id}/
pub async fn quality(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let quality = DownloadRepo::increment_quality(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("DownloadQuality", id))?;

    tracing::debug!(
        quality_id = id,
        download_count = quality.download_count,
        "Quality download"
    );

    redirect_to(&state, quality.post_id, &quality.download_url).await
}

/// GET /download/subtitle/{id}/
pub async fn subtitle(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let subtitle = DownloadRepo::increment_subtitle(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Subtitle", id))?;

    tracing::debug!(
        subtitle_id = id,
        download_count = subtitle.download_count,
        "Subtitle download"
    );

    redirect_to(&state, subtitle.post_id, &subtitle.download_url).await
}
