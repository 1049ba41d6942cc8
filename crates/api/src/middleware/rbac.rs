//! Staff-only access for the administration routes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chimaek_core::error::CoreError;
use chimaek_db::repositories::ProfileRepo;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An authenticated caller holding an admin role. Missing or invalid tokens
/// are 401; anyone else is 403.
///
/// The role stored on the caller's profile wins over the token claim, so a
/// demoted admin loses access before their token expires. The wrapped
/// [`AuthUser`] carries that effective role.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let mut user = AuthUser::from_request_parts(parts, state).await?;
        if let Some(stored) = ProfileRepo::find_role(&state.pool, user.user_id).await? {
            user.role = stored;
        }
        if !user.role.is_admin() {
            tracing::warn!(user_id = user.user_id, role = %user.role, "Non-admin attempted an admin action");
            return Err(AppError::Core(CoreError::Forbidden(
                "This action requires the admin role".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
