//! Back-office user management (admin only).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hypeblog_core::error::CoreError;
use hypeblog_core::roles::VALID_ROLES;
use hypeblog_db::models::user::{CreateUser, UserResponse};
use hypeblog_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{check_password_policy, hash_password};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    pub password: String,
    pub role: String,
}

/// GET /api/v1/users
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let users: Vec<UserResponse> = UserRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(DataResponse { data: users }))
}

/// POST /api/v1/users
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if !VALID_ROLES.contains(&input.role.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown role '{}'",
            input.role
        ))));
    }
    check_password_policy(&input.password)?;
    let password_hash = hash_password(&input.password)?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username.trim().to_string(),
            email: input.email.trim().to_string(),
            password_hash,
            role: input.role,
        },
    )
    .await?;

    tracing::info!(new_user_id = user.id, admin_id = admin.user_id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(user),
        }),
    ))
}
