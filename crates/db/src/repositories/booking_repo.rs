//! Repository for the `bookings` table.

use chimaek_core::booking::BOOKING_PENDING;
use chimaek_core::types::DbId;
use sqlx::PgPool;

use crate::models::booking::{Booking, CreateBooking};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, customer_name, customer_email, customer_phone, \
    booking_date, booking_time, party_size, special_requests, status, created_at, updated_at";

/// Provides booking creation and per-user listing.
pub struct BookingRepo;

impl BookingRepo {
    /// Insert a new booking in `pending` status.
    pub async fn create(pool: &PgPool, input: &CreateBooking) -> Result<Booking, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings \
                (user_id, customer_name, customer_email, customer_phone, booking_date, \
                 booking_time, party_size, special_requests, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        let form = &input.form;
        sqlx::query_as::<_, Booking>(&query)
            .bind(input.user_id)
            .bind(form.customer_name.trim())
            .bind(form.customer_email.trim())
            .bind(&form.customer_phone)
            .bind(form.booking_date)
            .bind(form.booking_time)
            .bind(form.party_size)
            .bind(&form.special_requests)
            .bind(BOOKING_PENDING)
            .fetch_one(pool)
            .await
    }

    /// A user's bookings, newest booking date first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings WHERE user_id = $1 \
             ORDER BY booking_date DESC, booking_time DESC, id DESC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
