//! Menu item model and DTOs.

use chimaek_core::cart::MenuItemSummary;
use chimaek_core::pricing::MenuPrices;
use chimaek_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `menu_items` table. A `None` tier price means the tier is
/// not offered.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MenuItem {
    pub id: DbId,
    pub category_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub full_price: Option<Decimal>,
    pub half_price: Option<Decimal>,
    pub extra_price: Option<Decimal>,
    pub emoji: Option<String>,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub is_spicy: bool,
    pub is_vegan: bool,
    pub display_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MenuItem {
    pub fn prices(&self) -> MenuPrices {
        MenuPrices {
            full_price: self.full_price,
            half_price: self.half_price,
            extra_price: self.extra_price,
        }
    }

    /// Projection the cart store works with.
    pub fn summary(&self) -> MenuItemSummary {
        MenuItemSummary {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            emoji: self.emoji.clone(),
            image_url: self.image_url.clone(),
            is_available: self.is_available,
            prices: self.prices(),
        }
    }
}

/// DTO for creating a menu item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMenuItem {
    pub category_id: DbId,
    pub name: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub prices: MenuPrices,
    pub emoji: Option<String>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
    pub is_spicy: Option<bool>,
    pub is_vegan: Option<bool>,
    pub display_order: Option<i32>,
}

/// DTO for updating a menu item.
///
/// When `prices` is `Some`, all three tier prices are replaced, so a tier
/// can be withdrawn by omitting it.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMenuItem {
    pub category_id: Option<DbId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub prices: Option<MenuPrices>,
    pub emoji: Option<String>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
    pub is_spicy: Option<bool>,
    pub is_vegan: Option<bool>,
    pub display_order: Option<i32>,
}
