//! Bearer-token extractors.
//!
//! Signed-in callers send `Authorization: Bearer <jwt>`. Routes that serve
//! guests too take [`MaybeAuthUser`]; routes that need an account take
//! [`AuthUser`].

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chimaek_core::error::CoreError;
use chimaek_core::roles::Role;
use chimaek_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: Role,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let MaybeAuthUser(user) = MaybeAuthUser::from_request_parts(parts, state).await?;
        user.ok_or_else(|| unauthorized("Missing Authorization header"))
    }
}

/// `None` for guests. A header that is present but unusable is a 401, never
/// a silent downgrade to guest.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(AUTHORIZATION) else {
            return Ok(MaybeAuthUser(None));
        };
        let token = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| unauthorized("Expected Authorization: Bearer <token>"))?;

        let claims = validate_token(token.trim(), &state.config.jwt).map_err(|err| {
            tracing::debug!(error = %err, "Rejected access token");
            unauthorized("Invalid or expired token")
        })?;

        Ok(MaybeAuthUser(Some(AuthUser {
            user_id: claims.sub,
            role: Role::from_claim(&claims.role),
        })))
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}
