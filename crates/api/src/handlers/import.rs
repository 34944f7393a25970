//! WordPress import from the back-office.

use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::Json;
use hypeblog_core::error::CoreError;
use hypeblog_core::types::DbId;
use hypeblog_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::form::MultipartForm;
use crate::importer::{import_wordpress, ImportOptions};
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/posts/import (multipart)
///
/// Fields: `xml_file` (the WXR export), `default_category` (id or slug,
/// optional) and `skip_existing` (checkbox). Imported posts are authored by
/// the caller.
pub async fn import_wordpress_export(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = MultipartForm::read(multipart).await?;
    let upload = form
        .take_file("xml_file")
        .ok_or_else(|| AppError::BadRequest("Missing 'xml_file' upload".into()))?;
    let xml = String::from_utf8(upload.bytes.to_vec())
        .map_err(|_| AppError::BadRequest("The export is not valid UTF-8".into()))?;

    let default_category_id = match form.text("default_category") {
        Some(value) => Some(resolve_category(&state, value).await?),
        None => None,
    };
    let options = ImportOptions {
        default_category_id,
        skip_existing: form.flag("skip_existing"),
        author_id: user.user_id,
    };

    tracing::info!(
        user_id = user.user_id,
        file = %upload.file_name,
        skip_existing = options.skip_existing,
        "WordPress import started"
    );

    let report = import_wordpress(&state.pool, &xml, &options).await?;

    Ok(Json(DataResponse { data: report }))
}

async fn resolve_category(state: &AppState, value: &str) -> AppResult<DbId> {
    let category = match value.parse::<DbId>() {
        Ok(id) => CategoryRepo::find_by_id(&state.pool, id).await?,
        Err(_) => CategoryRepo::find_by_slug(&state.pool, value).await?,
    };
    category.map(|c| c.id).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Unknown default category '{value}'"
        )))
    })
}
