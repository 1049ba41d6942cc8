//! Order and order line rows.

use chimaek_core::error::CoreError;
use chimaek_core::identity::OwnerKey;
use chimaek_core::order::{Order, OrderLine, OrderType};
use chimaek_core::pricing::PriceTier;
use chimaek_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// A row from the `orders` table.
#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub session_id: Option<String>,
    pub order_type: String,
    pub status: String,
    pub total_amount: Decimal,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub delivery_address: Option<String>,
    pub special_instructions: Option<String>,
    pub idempotency_key: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `order_items` table.
#[derive(Debug, Clone, FromRow)]
pub struct OrderItemRow {
    pub id: DbId,
    pub order_id: DbId,
    pub menu_item_id: DbId,
    pub price_tier: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub item_name: Option<String>,
    pub item_emoji: Option<String>,
    pub created_at: Timestamp,
}

impl OrderRow {
    /// The owner recorded on the row; exactly one column is populated.
    pub fn owner(&self) -> Result<OwnerKey, CoreError> {
        match (self.user_id, &self.session_id) {
            (Some(id), None) => Ok(OwnerKey::User { id }),
            (None, Some(token)) => Ok(OwnerKey::Guest {
                token: token.clone(),
            }),
            _ => Err(CoreError::Internal(format!(
                "order {} does not have exactly one owner",
                self.id
            ))),
        }
    }

    /// Combine with its line rows into the domain order.
    pub fn into_order(self, items: Vec<OrderItemRow>) -> Result<Order, CoreError> {
        let owner = self.owner()?;
        let order_type: OrderType = self.order_type.parse().map_err(|_| {
            CoreError::Internal(format!("unknown order type in order {}", self.id))
        })?;
        let lines = items
            .into_iter()
            .map(OrderLine::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Order {
            id: self.id,
            owner,
            order_type,
            status: self.status,
            total_amount: self.total_amount,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            delivery_address: self.delivery_address,
            special_instructions: self.special_instructions,
            idempotency_key: self.idempotency_key,
            created_at: self.created_at,
            updated_at: self.updated_at,
            lines,
        })
    }
}

impl TryFrom<OrderItemRow> for OrderLine {
    type Error = CoreError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        let price_tier: PriceTier = row.price_tier.parse().map_err(|_| {
            CoreError::Internal(format!("unknown price tier in order line {}", row.id))
        })?;
        Ok(OrderLine {
            id: row.id,
            order_id: row.order_id,
            menu_item_id: row.menu_item_id,
            price_tier,
            quantity: row.quantity,
            unit_price: row.unit_price,
            line_total: row.line_total,
            item_name: row.item_name,
            item_emoji: row.item_emoji,
            created_at: row.created_at,
        })
    }
}
