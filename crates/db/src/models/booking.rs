//! Table booking model and DTO.

use chimaek_core::booking::BookingForm;
use chimaek_core::types::{DbId, Timestamp};
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub party_size: i32,
    pub special_requests: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a booking: a checked form plus the signed-in user, if
/// any.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub user_id: Option<DbId>,
    pub form: BookingForm,
}
