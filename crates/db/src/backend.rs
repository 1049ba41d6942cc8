//! Postgres implementation of the core cart and order backends.

use std::collections::HashMap;

use async_trait::async_trait;
use chimaek_core::cart::{CartBackend, CartLine, MenuItemSummary};
use chimaek_core::error::CoreError;
use chimaek_core::identity::OwnerKey;
use chimaek_core::order::{NewOrder, NewOrderLine, Order, OrderBackend};
use chimaek_core::pricing::PriceTier;
use chimaek_core::types::DbId;

use crate::models::order::{OrderItemRow, OrderRow};
use crate::repositories::{CartItemRepo, MenuItemRepo, OrderRepo};
use crate::{violated_constraint, DbPool, FOREIGN_KEY_VIOLATION, UNIQUE_VIOLATION};

/// Cart and order persistence backed by the connection pool.
#[derive(Debug, Clone)]
pub struct PgBackend {
    pool: DbPool,
}

impl PgBackend {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// One of the owner's orders with its lines.
    pub async fn find_order(&self, owner: &OwnerKey, id: DbId) -> Result<Option<Order>, CoreError> {
        let Some(row) = OrderRepo::find_for_owner(&self.pool, owner, id)
            .await
            .map_err(|e| persistence("load order", e))?
        else {
            return Ok(None);
        };
        self.with_items(vec![row]).await.map(|mut orders| orders.pop())
    }

    /// The owner's order history, newest first.
    pub async fn list_orders(&self, owner: &OwnerKey) -> Result<Vec<Order>, CoreError> {
        let rows = OrderRepo::list_for_owner(&self.pool, owner)
            .await
            .map_err(|e| persistence("list orders", e))?;
        self.with_items(rows).await
    }

    async fn with_items(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, CoreError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
        let items = OrderRepo::list_items(&self.pool, &ids)
            .await
            .map_err(|e| persistence("load order lines", e))?;

        let mut by_order: HashMap<DbId, Vec<OrderItemRow>> = HashMap::new();
        for item in items {
            by_order.entry(item.order_id).or_default().push(item);
        }
        rows.into_iter()
            .map(|row| {
                let lines = by_order.remove(&row.id).unwrap_or_default();
                row.into_order(lines)
            })
            .collect()
    }
}

/// Log the database error and hide its detail from callers.
fn persistence(operation: &str, err: sqlx::Error) -> CoreError {
    tracing::error!(operation, error = %err, "Database operation failed");
    CoreError::Persistence(format!("failed to {operation}"))
}

#[async_trait]
impl CartBackend for PgBackend {
    async fn fetch_lines(&self, owner: &OwnerKey) -> Result<Vec<CartLine>, CoreError> {
        CartItemRepo::list_for_owner(&self.pool, owner)
            .await
            .map_err(|e| persistence("load cart", e))?
            .into_iter()
            .map(CartLine::try_from)
            .collect()
    }

    async fn find_menu_item(
        &self,
        menu_item_id: DbId,
    ) -> Result<Option<MenuItemSummary>, CoreError> {
        let item = MenuItemRepo::find_by_id(&self.pool, menu_item_id)
            .await
            .map_err(|e| persistence("load menu item", e))?;
        Ok(item.map(|i| i.summary()))
    }

    async fn upsert_line(
        &self,
        owner: &OwnerKey,
        menu_item_id: DbId,
        tier: PriceTier,
        quantity: i32,
    ) -> Result<(), CoreError> {
        match CartItemRepo::upsert(&self.pool, owner, menu_item_id, tier, quantity).await {
            Ok(_) => Ok(()),
            // The item was deleted between the lookup and the insert.
            Err(e) if violated_constraint(&e, FOREIGN_KEY_VIOLATION).is_some() => {
                Err(CoreError::NotFound {
                    entity: "MenuItem",
                    id: menu_item_id,
                })
            }
            Err(e) => Err(persistence("save cart line", e)),
        }
    }

    async fn set_quantity(
        &self,
        owner: &OwnerKey,
        line_id: DbId,
        quantity: i32,
    ) -> Result<bool, CoreError> {
        CartItemRepo::set_quantity(&self.pool, owner, line_id, quantity)
            .await
            .map_err(|e| persistence("update cart line", e))
    }

    async fn delete_line(&self, owner: &OwnerKey, line_id: DbId) -> Result<bool, CoreError> {
        CartItemRepo::delete(&self.pool, owner, line_id)
            .await
            .map_err(|e| persistence("remove cart line", e))
    }

    async fn delete_all(&self, owner: &OwnerKey) -> Result<u64, CoreError> {
        CartItemRepo::delete_all(&self.pool, owner)
            .await
            .map_err(|e| persistence("clear cart", e))
    }

    async fn move_lines(&self, from: &OwnerKey, to: &OwnerKey) -> Result<u64, CoreError> {
        CartItemRepo::move_lines(&self.pool, from, to)
            .await
            .map_err(|e| persistence("merge guest cart", e))
    }
}

#[async_trait]
impl OrderBackend for PgBackend {
    async fn insert_order(
        &self,
        order: &NewOrder,
        lines: &[NewOrderLine],
    ) -> Result<Order, CoreError> {
        match OrderRepo::create_with_items(&self.pool, order, lines).await {
            Ok((row, items)) => row.into_order(items),
            Err(e) => {
                let duplicate_key = violated_constraint(&e, UNIQUE_VIOLATION)
                    .is_some_and(|constraint| constraint.contains("idempotency_key"));
                if duplicate_key {
                    return Err(CoreError::Conflict(
                        "an order with this idempotency key is already being placed".to_string(),
                    ));
                }
                Err(persistence("place order", e))
            }
        }
    }

    async fn find_by_idempotency_key(
        &self,
        owner: &OwnerKey,
        key: &str,
    ) -> Result<Option<Order>, CoreError> {
        let Some(row) = OrderRepo::find_by_idempotency_key(&self.pool, owner, key)
            .await
            .map_err(|e| persistence("look up order", e))?
        else {
            return Ok(None);
        };
        self.with_items(vec![row]).await.map(|mut orders| orders.pop())
    }
}
