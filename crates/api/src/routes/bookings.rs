use axum::routing::get;
use axum::Router;

use crate::handlers::booking;
use crate::state::AppState;

/// Table booking routes mounted at `/bookings`.
///
/// ```text
/// POST   /                  -> create_booking
/// GET    /                  -> list_bookings (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(booking::list_bookings).post(booking::create_booking),
    )
}
