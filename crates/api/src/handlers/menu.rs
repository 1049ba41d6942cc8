//! Handlers for the public `/menu` resource.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chimaek_core::error::CoreError;
use chimaek_core::types::DbId;
use chimaek_db::repositories::{MenuCategoryRepo, MenuItemRepo};

use crate::error::{AppError, AppResult};
use crate::query::CategoryFilter;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/menu/categories
///
/// Active categories in menu order.
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = MenuCategoryRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/v1/menu/items?category=<slug>
///
/// Available items of active categories, optionally for one category.
pub async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<CategoryFilter>,
) -> AppResult<impl IntoResponse> {
    let items = MenuItemRepo::list_available(&state.pool, params.category.as_deref()).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/menu/items/{id}
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = MenuItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MenuItem",
            id,
        }))?;
    Ok(Json(DataResponse { data: item }))
}
