//! Back-office handlers for posts and their download links.
//!
//! All endpoints require a staff token.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hypeblog_core::content::{
    downloads_preview, quality_choices, quality_label, total_downloads, DownloadsPreview,
    TotalDownloads,
};
use hypeblog_core::error::CoreError;
use hypeblog_core::media::{
    split_file_name, FEATURED_IMAGE_QUALITY, FEATURED_IMAGE_SIZE, THUMBNAIL_DIR,
};
use hypeblog_core::thumbnail::{resize_to_fit, OutputFormat};
use hypeblog_core::types::DbId;
use hypeblog_db::models::download::{
    CreateDownloadQuality, CreateSubtitle, DownloadQuality, Subtitle, UpdateDownloadQuality,
    UpdateSubtitle,
};
use hypeblog_db::models::post::{
    post_url, CreatePost, Post, PostAdminRow, PostFilter, PostListEdit, UpdatePost,
};
use hypeblog_db::models::tag::Tag;
use hypeblog_db::repositories::{CategoryRepo, DownloadRepo, PostRepo, TagRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::form::MultipartForm;
use crate::handlers::{check_slug, not_found, require_text, resolve_slug, search_pattern};
use crate::middleware::rbac::RequireStaff;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct PostListParams {
    pub category_id: Option<DbId>,
    pub tag_id: Option<DbId>,
    pub is_published: Option<bool>,
    pub enable_downloads: Option<bool>,
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A row of the post change list.
#[derive(Debug, Serialize)]
pub struct PostListRow {
    #[serde(flatten)]
    pub row: PostAdminRow,
    pub has_downloads: bool,
    pub thumbnail_url: Option<String>,
    pub total_downloads: TotalDownloads,
}

/// A post as shown on its edit screen.
#[derive(Debug, Serialize)]
pub struct PostEdit {
    pub post: Post,
    pub url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub tags: Vec<Tag>,
    pub qualities: Vec<QualityRow>,
    pub subtitles: Vec<Subtitle>,
    pub downloads_preview: DownloadsPreview,
    pub total_downloads: TotalDownloads,
}

#[derive(Debug, Serialize)]
pub struct QualityRow {
    #[serde(flatten)]
    pub quality: DownloadQuality,
    pub label: Option<String>,
}

impl From<DownloadQuality> for QualityRow {
    fn from(quality: DownloadQuality) -> Self {
        Self {
            label: quality_label(&quality.quality),
            quality,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListEditRequest {
    pub items: Vec<PostListEdit>,
}

#[derive(Debug, Serialize)]
pub struct ListEditResponse {
    pub updated: u64,
}

#[derive(Debug, Deserialize)]
pub struct SetTagsRequest {
    pub tag_ids: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_post(state: &AppState, id: DbId) -> AppResult<Post> {
    PostRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Post", id))
}

async fn edit_view(state: &AppState, post: Post) -> AppResult<PostEdit> {
    let url = match post.category_id {
        Some(category_id) => CategoryRepo::find_by_id(&state.pool, category_id)
            .await?
            .map(|category| post_url(&category.slug, &post.slug)),
        None => None,
    };
    let tags = TagRepo::list_for_post(&state.pool, post.id).await?;
    let qualities = DownloadRepo::list_qualities(&state.pool, post.id).await?;
    let subtitles = DownloadRepo::list_subtitles(&state.pool, post.id).await?;

    let quality_counts: Vec<i32> = qualities.iter().map(|q| q.download_count).collect();
    let subtitle_counts: Vec<i32> = subtitles.iter().map(|s| s.download_count).collect();
    let preview = downloads_preview(
        post.enable_downloads,
        &post.download_section_title,
        qualities.len() as i64,
        subtitles.len() as i64,
    );

    Ok(PostEdit {
        url,
        thumbnail_url: post.thumbnail.as_deref().map(|t| state.storage.url(t)),
        tags,
        qualities: qualities.into_iter().map(QualityRow::from).collect(),
        subtitles,
        downloads_preview: preview,
        total_downloads: total_downloads(&quality_counts, &subtitle_counts),
        post,
    })
}

fn validate_quality_code(code: &str) -> AppResult<()> {
    if quality_label(code).is_none() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "'{code}' is not a valid quality"
        ))));
    }
    Ok(())
}

async fn remove_stored(state: &AppState, name: &str) {
    if let Err(e) = state.storage.delete(name).await {
        tracing::warn!(file = name, error = %e, "Failed to delete stored file");
    }
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// GET /api/v1/posts
pub async fn list(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<PostListParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();
    let filter = PostFilter {
        category_id: params.category_id,
        tag_id: params.tag_id,
        is_published: params.is_published,
        enable_downloads: params.enable_downloads,
        search: search_pattern(params.q.as_deref()),
    };

    let rows: Vec<PostListRow> = PostRepo::list_admin(&state.pool, &filter, limit, offset)
        .await?
        .into_iter()
        .map(|row| PostListRow {
            has_downloads: row.has_downloads(),
            thumbnail_url: row.thumbnail.as_deref().map(|t| state.storage.url(t)),
            total_downloads: TotalDownloads {
                video: row.video_downloads,
                subtitles: row.subtitle_downloads,
            },
            row,
        })
        .collect();

    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/posts/quality-choices
pub async fn list_quality_choices(RequireStaff(_user): RequireStaff) -> impl IntoResponse {
    Json(DataResponse {
        data: quality_choices(),
    })
}

/// POST /api/v1/posts
///
/// The slug is derived from the title when blank; the author defaults to
/// the caller.
pub async fn create(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreatePost>,
) -> AppResult<impl IntoResponse> {
    require_text("title", &input.title)?;
    let slug = resolve_slug(input.slug.as_deref(), &input.title)?;
    let author_id = input.author_id.unwrap_or(user.user_id);

    let post = PostRepo::create(&state.pool, &input, &slug, author_id).await?;

    tracing::info!(post_id = post.id, user_id = user.user_id, "Post created");

    let view = edit_view(&state, post).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// GET /api/v1/posts/{id}
pub async fn get(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let post = find_post(&state, id).await?;
    Ok(Json(DataResponse {
        data: edit_view(&state, post).await?,
    }))
}

/// PUT /api/v1/posts/{id}
pub async fn update(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePost>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = &input.title {
        require_text("title", title)?;
    }
    check_slug(input.slug.as_deref())?;

    let post = PostRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Post", id))?;

    tracing::info!(post_id = id, user_id = user.user_id, "Post updated");

    Ok(Json(DataResponse {
        data: edit_view(&state, post).await?,
    }))
}

/// PATCH /api/v1/posts
///
/// Bulk edit of the list-editable columns (`is_published`,
/// `enable_downloads`).
pub async fn list_edit(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<ListEditRequest>,
) -> AppResult<impl IntoResponse> {
    let updated = PostRepo::apply_list_edits(&state.pool, &input.items).await?;

    tracing::info!(updated, user_id = user.user_id, "Post list edited");

    Ok(Json(DataResponse {
        data: ListEditResponse { updated },
    }))
}

/// DELETE /api/v1/posts/{id}
pub async fn delete(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let post = find_post(&state, id).await?;
    if !PostRepo::delete(&state.pool, id).await? {
        return Err(not_found("Post", id));
    }
    if let Some(thumbnail) = post.thumbnail.as_deref() {
        remove_stored(&state, thumbnail).await;
    }

    tracing::info!(post_id = id, user_id = user.user_id, "Post deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/posts/{id}/tags
pub async fn set_tags(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetTagsRequest>,
) -> AppResult<impl IntoResponse> {
    find_post(&state, id).await?;
    TagRepo::set_post_tags(&state.pool, id, &input.tag_ids).await?;
    let tags = TagRepo::list_for_post(&state.pool, id).await?;

    Ok(Json(DataResponse { data: tags }))
}

// ---------------------------------------------------------------------------
// Featured image
// ---------------------------------------------------------------------------

/// POST /api/v1/posts/{id}/featured-image (multipart field `image`)
///
/// The image is shrunk to fit 300x450 and stored as JPEG.
pub async fn upload_featured_image(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let post = find_post(&state, id).await?;
    let mut form = MultipartForm::read(multipart).await?;
    let upload = form
        .take_file("image")
        .ok_or_else(|| AppError::BadRequest("Missing 'image' file".into()))?;

    let bytes = upload.bytes.clone();
    let resized = tokio::task::spawn_blocking(move || {
        resize_to_fit(
            &bytes,
            FEATURED_IMAGE_SIZE,
            OutputFormat::Jpeg {
                quality: FEATURED_IMAGE_QUALITY,
            },
        )
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Resize task failed: {e}")))?
    .map_err(|e| AppError::BadRequest(format!("Invalid image: {e}")))?;

    let (stem, _) = split_file_name(&upload.file_name);
    let stored = state
        .storage
        .save(THUMBNAIL_DIR, &format!("{stem}.jpg"), &resized)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store image: {e}")))?;

    let updated = PostRepo::set_thumbnail(&state.pool, id, Some(&stored))
        .await?
        .ok_or_else(|| not_found("Post", id))?;
    if let Some(old) = post.thumbnail.as_deref() {
        remove_stored(&state, old).await;
    }

    tracing::info!(post_id = id, user_id = user.user_id, thumbnail = %stored, "Featured image set");

    Ok(Json(DataResponse {
        data: edit_view(&state, updated).await?,
    }))
}

/// DELETE /api/v1/posts/{id}/featured-image
pub async fn delete_featured_image(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let post = find_post(&state, id).await?;
    PostRepo::set_thumbnail(&state.pool, id, None).await?;
    if let Some(old) = post.thumbnail.as_deref() {
        remove_stored(&state, old).await;
    }

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Download qualities
// ---------------------------------------------------------------------------

/// GET /api/v1/posts/{id}/qualities
pub async fn list_qualities(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    find_post(&state, post_id).await?;
    let rows: Vec<QualityRow> = DownloadRepo::list_qualities(&state.pool, post_id)
        .await?
        .into_iter()
        .map(QualityRow::from)
        .collect();

    Ok(Json(DataResponse { data: rows }))
}

/// POST /api/v1/posts/{id}/qualities
pub async fn create_quality(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    Json(input): Json<CreateDownloadQuality>,
) -> AppResult<impl IntoResponse> {
    validate_quality_code(&input.quality)?;
    require_text("download_url", &input.download_url)?;
    find_post(&state, post_id).await?;

    let quality = DownloadRepo::create_quality(&state.pool, post_id, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: QualityRow::from(quality),
        }),
    ))
}

/// PUT /api/v1/posts/{id}/qualities/{quality_id}
pub async fn update_quality(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path((post_id, quality_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateDownloadQuality>,
) -> AppResult<impl IntoResponse> {
    if let Some(code) = &input.quality {
        validate_quality_code(code)?;
    }
    if let Some(url) = &input.download_url {
        require_text("download_url", url)?;
    }

    let quality = DownloadRepo::update_quality(&state.pool, post_id, quality_id, &input)
        .await?
        .ok_or_else(|| not_found("DownloadQuality", quality_id))?;

    Ok(Json(DataResponse {
        data: QualityRow::from(quality),
    }))
}

/// DELETE /api/v1/posts/{id}/qualities/{quality_id}
pub async fn delete_quality(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path((post_id, quality_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    if !DownloadRepo::delete_quality(&state.pool, post_id, quality_id).await? {
        return Err(not_found("DownloadQuality", quality_id));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Subtitles
// ---------------------------------------------------------------------------

/// GET /api/v1/posts/{id}/subtitles
pub async fn list_subtitles(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    find_post(&state, post_id).await?;
    let subtitles = DownloadRepo::list_subtitles(&state.pool, post_id).await?;

    Ok(Json(DataResponse { data: subtitles }))
}

/// POST /api/v1/posts/{id}/subtitles
pub async fn create_subtitle(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    Json(input): Json<CreateSubtitle>,
) -> AppResult<impl IntoResponse> {
    require_text("language", &input.language)?;
    require_text("download_url", &input.download_url)?;
    find_post(&state, post_id).await?;

    let subtitle = DownloadRepo::create_subtitle(&state.pool, post_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: subtitle })))
}

/// PUT /api/v1/posts/{id}/subtitles/{subtitle_id}
pub async fn update_subtitle(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path((post_id, subtitle_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateSubtitle>,
) -> AppResult<impl IntoResponse> {
    if let Some(language) = &input.language {
        require_text("language", language)?;
    }
    if let Some(url) = &input.download_url {
        require_text("download_url", url)?;
    }

    let subtitle = DownloadRepo::update_subtitle(&state.pool, post_id, subtitle_id, &input)
        .await?
        .ok_or_else(|| not_found("Subtitle", subtitle_id))?;

    Ok(Json(DataResponse { data: subtitle }))
}

/// DELETE /api/v1/posts/{id}/subtitles/{subtitle_id}
pub async fn delete_subtitle(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path((post_id, subtitle_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    if !DownloadRepo::delete_subtitle(&state.pool, post_id, subtitle_id).await? {
        return Err(not_found("Subtitle", subtitle_id));
    }
    Ok(StatusCode::NO_CONTENT)
}
