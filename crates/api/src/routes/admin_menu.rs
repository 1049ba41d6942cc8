use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::admin_menu;
use crate::state::AppState;

/// Menu administration routes mounted at `/admin/menu`. Admin role only.
///
/// ```text
/// GET    /categories                 -> list_categories
/// POST   /categories                 -> create_category
/// PUT    /categories/{id}            -> update_category
/// DELETE /categories/{id}            -> delete_category
/// GET    /items                      -> list_items (?category_id=)
/// POST   /items                      -> create_item
/// PUT    /items/{id}                 -> update_item
/// DELETE /items/{id}                 -> delete_item
/// POST   /items/{id}/availability    -> set_availability
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/categories",
            get(admin_menu::list_categories).post(admin_menu::create_category),
        )
        .route(
            "/categories/{id}",
            put(admin_menu::update_category).delete(admin_menu::delete_category),
        )
        .route(
            "/items",
            get(admin_menu::list_items).post(admin_menu::create_item),
        )
        .route(
            "/items/{id}",
            put(admin_menu::update_item).delete(admin_menu::delete_item),
        )
        .route("/items/{id}/availability", post(admin_menu::set_availability))
}
