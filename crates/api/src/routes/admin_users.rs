use axum::routing::{get, put};
use axum::Router;

use crate::handlers::admin_users;
use crate::state::AppState;

/// User administration routes mounted at `/admin/users`. Admin role only.
///
/// ```text
/// GET    /                -> list_users
/// PUT    /{user_id}/role  -> set_role
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin_users::list_users))
        .route("/{user_id}/role", put(admin_users::set_role))
}
