//! Cart line rows.
//!
//! Cart rows are always read joined with their menu item, so the row struct
//! carries both the `cart_items` columns and the menu projection.

use chimaek_core::cart::{CartLine, MenuItemSummary};
use chimaek_core::error::CoreError;
use chimaek_core::pricing::{MenuPrices, PriceTier};
use chimaek_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// A `cart_items` row joined with `menu_items`.
#[derive(Debug, Clone, FromRow)]
pub struct CartItemRow {
    pub id: DbId,
    pub menu_item_id: DbId,
    pub price_tier: String,
    pub quantity: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub item_name: String,
    pub item_description: Option<String>,
    pub item_emoji: Option<String>,
    pub item_image_url: Option<String>,
    pub item_is_available: bool,
    pub full_price: Option<Decimal>,
    pub half_price: Option<Decimal>,
    pub extra_price: Option<Decimal>,
}

impl TryFrom<CartItemRow> for CartLine {
    type Error = CoreError;

    fn try_from(row: CartItemRow) -> Result<Self, Self::Error> {
        let price_tier: PriceTier = row
            .price_tier
            .parse()
            .map_err(|_| CoreError::Internal(format!("unknown price tier in cart row {}", row.id)))?;
        Ok(CartLine {
            id: row.id,
            menu_item_id: row.menu_item_id,
            price_tier,
            quantity: row.quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
            menu_item: MenuItemSummary {
                id: row.menu_item_id,
                name: row.item_name,
                description: row.item_description,
                emoji: row.item_emoji,
                image_url: row.item_image_url,
                is_available: row.item_is_available,
                prices: MenuPrices {
                    full_price: row.full_price,
                    half_price: row.half_price,
                    extra_price: row.extra_price,
                },
            },
        })
    }
}
