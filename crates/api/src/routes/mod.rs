pub mod admin_menu;
pub mod admin_users;
pub mod bookings;
pub mod cart;
pub mod health;
pub mod menu;
pub mod orders;
pub mod profile;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /menu/categories                       active categories (public)
/// /menu/items?category=slug              available items (public)
/// /menu/items/{id}                       one item (public)
///
/// /cart                                  view, clear (guest or user)
/// /cart/items                            add
/// /cart/items/{id}                       update quantity, remove
/// /cart/claim                            merge guest cart (requires auth)
///
/// /orders                                checkout, history (guest or user)
/// /orders/{id}                           one order
///
/// /bookings                              request (guest or user), list (requires auth)
///
/// /profile                               own profile view, update (requires auth)
///
/// /admin/menu/categories                 list all, create (admin only)
/// /admin/menu/categories/{id}            update, delete
/// /admin/menu/items                      list all, create
/// /admin/menu/items/{id}                 update, delete
/// /admin/menu/items/{id}/availability    toggle availability
/// /admin/users                           list profiles (admin only)
/// /admin/users/{user_id}/role            set role
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/menu", menu::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
        .nest("/bookings", bookings::router())
        .nest("/profile", profile::router())
        .nest("/admin/menu", admin_menu::router())
        .nest("/admin/users", admin_users::router())
}
