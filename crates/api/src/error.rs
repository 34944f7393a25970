//! HTTP error type shared by the admin API and the public site.
//!
//! Every error leaves the server as `{ "error": <message>, "code": <CODE> }`.
//! Internal details (SQL, IO, hashing) are logged and replaced by a generic
//! message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hypeblog_core::error::CoreError;
use serde::Serialize;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A public resource looked up by slug or path that does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request outside of field validation (multipart, encodings).
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::from(errors))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl ErrorBody {
    fn new(code: &'static str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }

    fn internal() -> Self {
        Self::new("INTERNAL_ERROR", INTERNAL_MESSAGE)
    }
}

impl AppError {
    fn status_and_body(&self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Core(CoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                ErrorBody::new("NOT_FOUND", format!("{entity} {id} not found")),
            ),
            AppError::Core(CoreError::Validation(msg)) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("VALIDATION_ERROR", msg.as_str()),
            ),
            AppError::Core(CoreError::Conflict(msg)) => {
                (StatusCode::CONFLICT, ErrorBody::new("CONFLICT", msg.as_str()))
            }
            AppError::Core(CoreError::Unauthorized(msg)) => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("UNAUTHORIZED", msg.as_str()),
            ),
            AppError::Core(CoreError::Forbidden(msg)) => {
                (StatusCode::FORBIDDEN, ErrorBody::new("FORBIDDEN", msg.as_str()))
            }
            AppError::Core(CoreError::Internal(msg)) | AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
            }
            AppError::Database(err) => database_error(err),
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorBody::new("NOT_FOUND", msg.as_str()))
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("BAD_REQUEST", msg.as_str()),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

/// Postgres unique (23505) and foreign-key (23503) violations on named
/// `uq_*` / `fk_*` constraints are client errors; anything else is a 500.
fn database_error(err: &sqlx::Error) -> (StatusCode, ErrorBody) {
    let db_err = match err {
        sqlx::Error::RowNotFound => {
            return (
                StatusCode::NOT_FOUND,
                ErrorBody::new("NOT_FOUND", "Resource not found"),
            )
        }
        sqlx::Error::Database(db_err) => db_err,
        other => {
            tracing::error!(error = %other, "Database error");
            return (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal());
        }
    };

    let constraint = db_err.constraint().unwrap_or_default();
    match (db_err.code().as_deref(), constraint) {
        (Some("23505"), c) if c.starts_with("uq_") => (
            StatusCode::CONFLICT,
            ErrorBody::new("CONFLICT", duplicate_message(c)),
        ),
        (Some("23503"), c) if c.starts_with("fk_") => (
            StatusCode::BAD_REQUEST,
            ErrorBody::new(
                "INVALID_REFERENCE",
                format!("Referenced record does not exist: {c}"),
            ),
        ),
        _ => {
            tracing::error!(error = %db_err, constraint, "Database error");
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
        }
    }
}

/// `uq_posts_slug` -> "A post with this slug already exists."
fn duplicate_message(constraint: &str) -> String {
    let rest = constraint.trim_start_matches("uq_");
    let (table, column) = rest.split_once('_').unwrap_or((rest, "value"));
    let entity = match table {
        "categories" => "category",
        other => other.strip_suffix('s').unwrap_or(other),
    };
    format!("A {entity} with this {column} already exists.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_messages_name_the_entity() {
        assert_eq!(
            duplicate_message("uq_posts_slug"),
            "A post with this slug already exists."
        );
        assert_eq!(
            duplicate_message("uq_categories_name"),
            "A category with this name already exists."
        );
        assert_eq!(
            duplicate_message("uq_users_username"),
            "A user with this username already exists."
        );
    }

    #[test]
    fn internal_errors_are_sanitised() {
        let (status, body) =
            AppError::InternalError("disk on fire at /var/media".into()).status_and_body();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, INTERNAL_MESSAGE);
        assert_eq!(body.code, "INTERNAL_ERROR");
    }

    #[test]
    fn validation_maps_to_400() {
        let (status, body) =
            AppError::Core(CoreError::Validation("Title is required".into())).status_and_body();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "VALIDATION_ERROR");
        assert_eq!(body.error, "Title is required");
    }

    #[test]
    fn missing_row_is_404() {
        let (status, body) = database_error(&sqlx::Error::RowNotFound);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "NOT_FOUND");
    }
}
