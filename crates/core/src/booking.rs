//! Table booking requests.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use validator::Validate;

use crate::error::CoreError;

pub const MIN_PARTY_SIZE: i32 = 1;
pub const MAX_PARTY_SIZE: i32 = 20;

/// Status every new booking starts in.
pub const BOOKING_PENDING: &str = "pending";

/// Booking form submitted by a guest or signed-in customer.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookingForm {
    #[validate(length(min = 1, max = 200))]
    pub customer_name: String,
    #[validate(email)]
    pub customer_email: String,
    #[validate(length(max = 50))]
    pub customer_phone: Option<String>,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    #[validate(range(min = 1, max = 20))]
    pub party_size: i32,
    #[validate(length(max = 1000))]
    pub special_requests: Option<String>,
}

impl BookingForm {
    /// Field validation plus the "not in the past" rule relative to `today`.
    pub fn check(&self, today: NaiveDate) -> Result<(), CoreError> {
        self.validate()?;
        if self.customer_name.trim().is_empty() {
            return Err(CoreError::Validation(
                "customer_name must not be blank".to_string(),
            ));
        }
        validate_party_size(self.party_size)?;
        if self.booking_date < today {
            return Err(CoreError::Validation(format!(
                "booking_date {} is in the past",
                self.booking_date
            )));
        }
        Ok(())
    }
}

pub fn validate_party_size(size: i32) -> Result<(), CoreError> {
    if !(MIN_PARTY_SIZE..=MAX_PARTY_SIZE).contains(&size) {
        return Err(CoreError::Validation(format!(
            "party_size must be between {MIN_PARTY_SIZE} and {MAX_PARTY_SIZE}, got {size}"
        )));
    }
    Ok(())
}
