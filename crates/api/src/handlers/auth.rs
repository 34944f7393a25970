//! Handlers for the `/auth` resource (login, current user).

use axum::extract::State;
use axum::Json;
use hypeblog_core::error::CoreError;
use hypeblog_db::models::user::UserResponse;
use hypeblog_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::handlers::not_found;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// POST /api/v1/auth/login
///
/// Authenticate with username + password and return an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || {
        AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        ))
    };

    let user = UserRepo::find_by_username(&state.pool, input.username.trim())
        .await?
        .ok_or_else(invalid)?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    if !verify_password(&input.password, &user.password_hash)? {
        tracing::info!(username = %user.username, "Failed login attempt");
        return Err(invalid());
    }

    UserRepo::record_login(&state.pool, user.id).await?;

    let access_token = state
        .config
        .jwt
        .issue(user.id, &user.username, &user.role)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.expires_in_secs(),
        user: user.into(),
    }))
}

/// GET /api/v1/auth/me
pub async fn me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| not_found("User", auth.user_id))?;

    Ok(Json(DataResponse { data: user.into() }))
}
