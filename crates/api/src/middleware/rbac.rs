//! Role gates layered on [`AuthUser`].
//!
//! Editors manage content; only admins manage users and site settings.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use hypeblog_core::error::CoreError;
use hypeblog_core::roles::{is_staff, ROLE_ADMIN};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

async fn authorize(
    parts: &mut Parts,
    state: &AppState,
    allowed: fn(&str) -> bool,
    denied: &str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if !allowed(&user.role) {
        tracing::info!(user_id = user.user_id, role = %user.role, "Permission denied");
        return Err(AppError::Core(CoreError::Forbidden(denied.into())));
    }
    Ok(user)
}

/// Admin only: user accounts and site settings.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state, |role| role == ROLE_ADMIN, "Admin role required")
            .await
            .map(RequireAdmin)
    }
}

/// Admin or editor: every content endpoint.
pub struct RequireStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state, is_staff, "Staff role required")
            .await
            .map(RequireStaff)
    }
}
