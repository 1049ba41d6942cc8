pub mod admin_menu;
pub mod admin_users;
pub mod booking;
pub mod cart;
pub mod menu;
pub mod order;
pub mod profile;
