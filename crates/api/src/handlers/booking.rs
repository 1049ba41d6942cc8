//! Handlers for the `/bookings` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chimaek_core::booking::BookingForm;
use chimaek_db::models::booking::CreateBooking;
use chimaek_db::repositories::BookingRepo;
use chrono::Utc;

use crate::error::AppResult;
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/bookings
///
/// Request a table. Open to guests; the user id is recorded when a Bearer
/// token is sent.
pub async fn create_booking(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    Json(form): Json<BookingForm>,
) -> AppResult<impl IntoResponse> {
    form.check(Utc::now().date_naive())?;

    let input = CreateBooking {
        user_id: user.map(|u| u.user_id),
        form,
    };
    let booking = BookingRepo::create(&state.pool, &input).await?;
    tracing::info!(booking_id = booking.id, party_size = booking.party_size, "Booking requested");

    Ok((StatusCode::CREATED, Json(DataResponse { data: booking })))
}

/// GET /api/v1/bookings
///
/// The signed-in user's bookings, newest first.
pub async fn list_bookings(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let bookings = BookingRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: bookings }))
}
