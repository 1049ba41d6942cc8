//! Handlers for `/admin/users`: profile listing and role management.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chimaek_core::roles::{check_role_change, Role};
use chimaek_core::types::DbId;
use chimaek_db::repositories::ProfileRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: String,
}

/// GET /api/v1/admin/users
///
/// Every profile, newest first.
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let profiles = ProfileRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: profiles }))
}

/// PUT /api/v1/admin/users/{user_id}/role
///
/// Users without a profile get one. Only a super admin may grant or revoke
/// `super_admin`.
pub async fn set_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<SetRoleRequest>,
) -> AppResult<impl IntoResponse> {
    let new_role: Role = input.role.parse()?;
    let current = ProfileRepo::find_role(&state.pool, user_id)
        .await?
        .unwrap_or(Role::Customer);
    check_role_change(admin.role, current, new_role)?;

    let profile = ProfileRepo::set_role(&state.pool, user_id, new_role).await?;
    tracing::info!(
        user_id,
        from = %current,
        to = %profile.role(),
        admin_id = admin.user_id,
        "User role changed"
    );
    Ok(Json(DataResponse { data: profile }))
}
