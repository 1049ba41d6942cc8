use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::cart;
use crate::state::AppState;

/// Cart routes mounted at `/cart`.
///
/// ```text
/// GET    /                  -> get_cart
/// DELETE /                  -> clear_cart
/// POST   /items             -> add_item
/// PUT    /items/{id}        -> update_item
/// DELETE /items/{id}        -> remove_item
/// POST   /claim             -> claim_guest_cart
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::get_cart).delete(cart::clear_cart))
        .route("/items", post(cart::add_item))
        .route("/items/{id}", put(cart::update_item).delete(cart::remove_item))
        .route("/claim", post(cart::claim_guest_cart))
}
