//! Media library: public listing/detail and the back-office upload API.
//!
//! Uploads go through [`MediaService`], which owns thumbnail generation and
//! cleanup.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hypeblog_core::error::CoreError;
use hypeblog_core::media::{is_image_name, split_file_name, MEDIA_DIR, THUMBNAIL_DIR};
use hypeblog_core::search::DEFAULT_PAGE_SIZE;
use hypeblog_core::types::{DbId, Timestamp};
use hypeblog_db::models::media::{Media, MediaFilter, MediaInput};
use hypeblog_db::repositories::MediaRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::form::{MultipartForm, UploadedFile};
use crate::handlers::{not_found, search_pattern};
use crate::media_service::MediaService;
use crate::middleware::rbac::RequireStaff;
use crate::query::{PageParams, PaginationParams};
use crate::response::{DataResponse, Paginated};
use crate::state::AppState;
use crate::storage::MediaStorage;

/// A media item with public URLs.
#[derive(Debug, Serialize)]
pub struct MediaView {
    #[serde(flatten)]
    pub media: Media,
    pub file_url: Option<String>,
    pub thumbnail_url: Option<String>,
    /// File URL, else thumbnail URL, else `#`.
    pub url: String,
    pub is_image: bool,
}

impl MediaView {
    pub fn new(media: Media, storage: &MediaStorage) -> Self {
        let file_url = media.file.as_deref().map(|f| storage.url(f));
        let thumbnail_url = media.thumbnail.as_deref().map(|t| storage.url(t));
        let url = file_url
            .clone()
            .or_else(|| thumbnail_url.clone())
            .unwrap_or_else(|| "#".to_string());
        let is_image = media.file.as_deref().is_some_and(is_image_name);
        Self {
            media,
            file_url,
            thumbnail_url,
            url,
            is_image,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PublicMediaParams {
    pub q: Option<String>,
    pub page: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MediaListParams {
    pub q: Option<String>,
    pub uploaded_from: Option<Timestamp>,
    pub uploaded_to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// GET /media/
pub async fn public_list(
    State(state): State<AppState>,
    Query(params): Query<PublicMediaParams>,
) -> AppResult<Json<Paginated<MediaView>>> {
    let paging = PageParams { page: params.page };
    let filter = MediaFilter {
        search: search_pattern(params.q.as_deref()),
        ..Default::default()
    };
    let page_size = DEFAULT_PAGE_SIZE;

    let items = MediaRepo::list(&state.pool, &filter, page_size, paging.offset(page_size)).await?;
    let total = MediaRepo::count(&state.pool, &filter).await?;
    let views = items
        .into_iter()
        .map(|m| MediaView::new(m, &state.storage))
        .collect();

    Ok(Json(Paginated::new(views, paging.number(), page_size, total)))
}

/// GET /media/{id}/
pub async fn public_detail(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MediaView>> {
    let media = MediaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Media", id))?;

    Ok(Json(MediaView::new(media, &state.storage)))
}

// ---------------------------------------------------------------------------
// Back-office
// ---------------------------------------------------------------------------

/// GET /api/v1/media
pub async fn list(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<MediaListParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();
    let filter = MediaFilter {
        search: search_pattern(params.q.as_deref()),
        uploaded_from: params.uploaded_from,
        uploaded_to: params.uploaded_to,
    };

    let items: Vec<MediaView> = MediaRepo::list(&state.pool, &filter, limit, offset)
        .await?
        .into_iter()
        .map(|m| MediaView::new(m, &state.storage))
        .collect();

    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/media/{id}
pub async fn get(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let media = MediaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Media", id))?;

    Ok(Json(DataResponse {
        data: MediaView::new(media, &state.storage),
    }))
}

async fn store(state: &AppState, dir: &str, upload: &UploadedFile) -> AppResult<String> {
    state
        .storage
        .save(dir, &upload.file_name, &upload.bytes)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store upload: {e}")))
}

/// POST /api/v1/media (multipart)
///
/// Fields: `title`, `file` and/or `thumbnail`. The title defaults to the
/// file name stem.
pub async fn upload(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = MultipartForm::read(multipart).await?;
    let file = form.take_file("file");
    let thumbnail = form.take_file("thumbnail");

    let title = form
        .text("title")
        .map(str::to_string)
        .or_else(|| {
            file.as_ref()
                .map(|f| split_file_name(&f.file_name).0.to_string())
        })
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "A title or a file is required".into(),
            ))
        })?;

    let input = MediaInput {
        title,
        file: match &file {
            Some(upload) => Some(store(&state, MEDIA_DIR, upload).await?),
            None => None,
        },
        thumbnail: match &thumbnail {
            Some(upload) => Some(store(&state, THUMBNAIL_DIR, upload).await?),
            None => None,
        },
    };

    let media = MediaService::new(&state.pool, &state.storage)
        .save(None, &input)
        .await?;

    tracing::info!(media_id = media.id, user_id = user.user_id, "Media uploaded");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: MediaView::new(media, &state.storage),
        }),
    ))
}

/// PUT /api/v1/media/{id} (multipart)
///
/// Any of `title`, `file`, `thumbnail` replaces the stored value;
/// `clear_file` / `clear_thumbnail` empty the column.
pub async fn replace(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let previous = MediaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Media", id))?;

    let mut form = MultipartForm::read(multipart).await?;
    let mut input = MediaInput {
        title: form.text("title").unwrap_or(&previous.title).to_string(),
        file: previous.file.clone(),
        thumbnail: previous.thumbnail.clone(),
    };

    if form.flag("clear_file") {
        input.file = None;
    }
    if form.flag("clear_thumbnail") {
        input.thumbnail = None;
    }
    if let Some(upload) = form.take_file("file") {
        input.file = Some(store(&state, MEDIA_DIR, &upload).await?);
    }
    if let Some(upload) = form.take_file("thumbnail") {
        input.thumbnail = Some(store(&state, THUMBNAIL_DIR, &upload).await?);
    }

    let media = MediaService::new(&state.pool, &state.storage)
        .save(Some(&previous), &input)
        .await?;

    tracing::info!(media_id = id, user_id = user.user_id, "Media updated");

    Ok(Json(DataResponse {
        data: MediaView::new(media, &state.storage),
    }))
}

/// DELETE /api/v1/media/{id}
pub async fn delete(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let media = MediaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Media", id))?;

    if !MediaService::new(&state.pool, &state.storage)
        .delete(&media)
        .await?
    {
        return Err(not_found("Media", id));
    }

    tracing::info!(media_id = id, user_id = user.user_id, "Media deleted");

    Ok(StatusCode::NO_CONTENT)
}
