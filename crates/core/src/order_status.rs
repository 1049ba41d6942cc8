//! Well-known order status names.
//!
//! These must match the `ck_orders_status` constraint in
//! `20260301000003_create_orders_tables.sql`. Checkout only ever writes
//! [`ORDER_PENDING`]; the other transitions belong to staff tooling.

pub const ORDER_PENDING: &str = "pending";
pub const ORDER_CONFIRMED: &str = "confirmed";
pub const ORDER_PREPARING: &str = "preparing";
pub const ORDER_READY: &str = "ready";
pub const ORDER_DELIVERED: &str = "delivered";
pub const ORDER_COMPLETED: &str = "completed";
pub const ORDER_CANCELLED: &str = "cancelled";

/// Statuses from which no further transition happens.
pub fn is_terminal(status: &str) -> bool {
    matches!(status, ORDER_COMPLETED | ORDER_CANCELLED)
}
