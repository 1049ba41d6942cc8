//! Handlers for `/profile`: the signed-in user's own profile.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chimaek_core::profile::ProfileUpdate;
use chimaek_db::repositories::ProfileRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/profile
///
/// Creates the profile on first access, seeding its role from the token.
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let profile = ProfileRepo::ensure(&state.pool, user.user_id, user.role).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// PUT /api/v1/profile
///
/// A blank `display_name` clears it. The role cannot be changed here.
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ProfileUpdate>,
) -> AppResult<impl IntoResponse> {
    let display_name = input.normalized_display_name()?;
    let profile = ProfileRepo::set_display_name(
        &state.pool,
        user.user_id,
        display_name.as_deref(),
        user.role,
    )
    .await?;
    tracing::info!(user_id = user.user_id, "Profile updated");
    Ok(Json(DataResponse { data: profile }))
}
