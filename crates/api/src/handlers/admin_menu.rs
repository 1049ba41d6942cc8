//! Handlers for `/admin/menu`: category and menu item management.
//!
//! All routes require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chimaek_core::error::CoreError;
use chimaek_core::menu::{slugify, validate_item_prices, validate_name, validate_slug};
use chimaek_core::types::DbId;
use chimaek_db::models::menu_category::{CreateMenuCategory, UpdateMenuCategory};
use chimaek_db::models::menu_item::{CreateMenuItem, UpdateMenuItem};
use chimaek_db::repositories::{MenuCategoryRepo, MenuItemRepo};
use chimaek_db::DbPool;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /admin/menu/items`.
#[derive(Debug, Deserialize)]
pub struct AdminItemFilter {
    pub category_id: Option<DbId>,
}

/// Request body for toggling a menu item's availability.
#[derive(Debug, Deserialize)]
pub struct SetAvailabilityRequest {
    pub is_available: bool,
}

fn category_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "MenuCategory",
        id,
    })
}

fn item_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "MenuItem",
        id,
    })
}

/// Menu items reference their category; reject unknown ids up front
/// instead of surfacing a foreign key error.
async fn ensure_category(pool: &DbPool, id: DbId) -> AppResult<()> {
    MenuCategoryRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| category_not_found(id))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/menu/categories
///
/// Every category, inactive ones included.
pub async fn list_categories(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let categories = MenuCategoryRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/admin/menu/categories
///
/// The slug is derived from the name when omitted. 409 if it is taken.
pub async fn create_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateMenuCategory>,
) -> AppResult<impl IntoResponse> {
    validate_name(&input.name)?;
    let slug = match &input.slug {
        Some(slug) => slug.clone(),
        None => slugify(&input.name),
    };
    validate_slug(&slug)?;

    let category = MenuCategoryRepo::create(&state.pool, &input, &slug).await?;
    tracing::info!(category_id = category.id, %slug, admin_id = admin.user_id, "Menu category created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PUT /api/v1/admin/menu/categories/{id}
pub async fn update_category(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMenuCategory>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    if let Some(slug) = &input.slug {
        validate_slug(slug)?;
    }
    let category = MenuCategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| category_not_found(id))?;
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/admin/menu/categories/{id}
///
/// Removes the category and its items. 409 when any of those items appear
/// on an order.
pub async fn delete_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !MenuCategoryRepo::delete(&state.pool, id).await? {
        return Err(category_not_found(id));
    }
    tracing::info!(category_id = id, admin_id = admin.user_id, "Menu category deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/menu/items?category_id=<id>
///
/// Every item, unavailable ones and those of inactive categories included.
pub async fn list_items(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(filter): Query<AdminItemFilter>,
) -> AppResult<impl IntoResponse> {
    let items = MenuItemRepo::list_all(&state.pool, filter.category_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/admin/menu/items
pub async fn create_item(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateMenuItem>,
) -> AppResult<impl IntoResponse> {
    validate_name(&input.name)?;
    validate_item_prices(&input.prices)?;
    ensure_category(&state.pool, input.category_id).await?;

    let item = MenuItemRepo::create(&state.pool, &input).await?;
    tracing::info!(menu_item_id = item.id, admin_id = admin.user_id, "Menu item created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// PUT /api/v1/admin/menu/items/{id}
///
/// A `prices` object replaces all three tier prices.
pub async fn update_item(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMenuItem>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    if let Some(prices) = &input.prices {
        validate_item_prices(prices)?;
    }
    if let Some(category_id) = input.category_id {
        ensure_category(&state.pool, category_id).await?;
    }
    let item = MenuItemRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| item_not_found(id))?;
    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/admin/menu/items/{id}
///
/// 409 when the item appears on an order.
pub async fn delete_item(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !MenuItemRepo::delete(&state.pool, id).await? {
        return Err(item_not_found(id));
    }
    tracing::info!(menu_item_id = id, admin_id = admin.user_id, "Menu item deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/menu/items/{id}/availability
pub async fn set_availability(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetAvailabilityRequest>,
) -> AppResult<impl IntoResponse> {
    let item = MenuItemRepo::set_availability(&state.pool, id, input.is_available)
        .await?
        .ok_or_else(|| item_not_found(id))?;
    Ok(Json(DataResponse { data: item }))
}
