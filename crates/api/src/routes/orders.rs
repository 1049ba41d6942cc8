use axum::routing::get;
use axum::Router;

use crate::handlers::order;
use crate::state::AppState;

/// Checkout and order history mounted at `/orders`.
///
/// ```text
/// POST   /                  -> place_order
/// GET    /                  -> list_orders
/// GET    /{id}              -> get_order
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(order::list_orders).post(order::place_order))
        .route("/{id}", get(order::get_order))
}
