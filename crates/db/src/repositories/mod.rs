//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod booking_repo;
pub mod cart_item_repo;
pub mod menu_category_repo;
pub mod menu_item_repo;
pub mod order_repo;
pub mod profile_repo;

pub use booking_repo::BookingRepo;
pub use cart_item_repo::CartItemRepo;
pub use menu_category_repo::MenuCategoryRepo;
pub use menu_item_repo::MenuItemRepo;
pub use order_repo::OrderRepo;
pub use profile_repo::ProfileRepo;
