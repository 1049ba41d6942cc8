use axum::routing::get;
use axum::Router;

use crate::handlers::menu;
use crate::state::AppState;

/// Public catalog routes mounted at `/menu`.
///
/// ```text
/// GET    /categories        -> list_categories
/// GET    /items             -> list_items
/// GET    /items/{id}        -> get_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(menu::list_categories))
        .route("/items", get(menu::list_items))
        .route("/items/{id}", get(menu::get_item))
}
