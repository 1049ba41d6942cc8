//! Menu category model and DTOs.

use chimaek_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `menu_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MenuCategory {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a category. The slug is derived from the name when
/// omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMenuCategory {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// DTO for updating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMenuCategory {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}
