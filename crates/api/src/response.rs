//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Cart and checkout
//! responses add the `notices` emitted while handling the request.

use chimaek_core::notify::{Notice, NoticeLog};
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": T, "notices": [...] }` envelope for cart and checkout
/// operations.
#[derive(Debug, Serialize)]
pub struct NoticedResponse<T: Serialize> {
    pub data: T,
    pub notices: Vec<Notice>,
}

impl<T: Serialize> NoticedResponse<T> {
    /// Wrap `data` with every notice collected so far, draining the log.
    pub fn new(data: T, log: &NoticeLog) -> Self {
        Self {
            data,
            notices: log.drain(),
        }
    }
}
