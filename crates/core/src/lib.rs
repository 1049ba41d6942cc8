//! Domain logic for the restaurant backend: cart owner identity, the cart
//! store, tier pricing, checkout, and the validation rules shared by the
//! HTTP layer. No database or network code lives here; persistence is
//! reached through the [`cart::CartBackend`] and [`order::OrderBackend`]
//! traits.

pub mod booking;
pub mod cart;
pub mod error;
pub mod identity;
pub mod memory;
pub mod menu;
pub mod notify;
pub mod order;
pub mod order_status;
pub mod pricing;
pub mod profile;
pub mod roles;
pub mod types;
