//! Repository for the `orders` and `order_items` tables.

use chimaek_core::identity::OwnerKey;
use chimaek_core::order::{NewOrder, NewOrderLine};
use chimaek_core::order_status::ORDER_PENDING;
use chimaek_core::types::DbId;
use sqlx::PgPool;

use crate::models::order::{OrderItemRow, OrderRow};

/// Column list for the `orders` table.
const COLUMNS: &str = "id, user_id, session_id, order_type, status, total_amount, \
    customer_name, customer_email, customer_phone, delivery_address, special_instructions, \
    idempotency_key, created_at, updated_at";

/// Column list for `order_items` (alias `oi`) joined with `menu_items`
/// (alias `mi`) for display fields.
const ITEM_COLUMNS: &str = "oi.id, oi.order_id, oi.menu_item_id, oi.price_tier, oi.quantity, \
    oi.unit_price, oi.line_total, mi.name AS item_name, mi.emoji AS item_emoji, oi.created_at";

/// Provides order creation and owner-scoped order history.
pub struct OrderRepo;

impl OrderRepo {
    /// Insert an order and all of its lines in one transaction.
    ///
    /// Any failure rolls the whole insert back; an order is never stored
    /// without its lines.
    pub async fn create_with_items(
        pool: &PgPool,
        order: &NewOrder,
        lines: &[NewOrderLine],
    ) -> Result<(OrderRow, Vec<OrderItemRow>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_order = format!(
            "INSERT INTO orders \
                (user_id, session_id, order_type, status, total_amount, customer_name, \
                 customer_email, customer_phone, delivery_address, special_instructions, \
                 idempotency_key) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, OrderRow>(&insert_order)
            .bind(order.owner.user_id())
            .bind(order.owner.session_token())
            .bind(order.order_type.as_str())
            .bind(ORDER_PENDING)
            .bind(order.total_amount)
            .bind(&order.customer_name)
            .bind(&order.customer_email)
            .bind(&order.customer_phone)
            .bind(&order.delivery_address)
            .bind(&order.special_instructions)
            .bind(&order.idempotency_key)
            .fetch_one(&mut *tx)
            .await?;

        let insert_item = format!(
            "WITH oi AS ( \
                INSERT INTO order_items \
                    (order_id, menu_item_id, price_tier, quantity, unit_price, line_total) \
                VALUES ($1, $2, $3, $4, $5, $6) \
                RETURNING * \
             ) \
             SELECT {ITEM_COLUMNS} FROM oi JOIN menu_items mi ON mi.id = oi.menu_item_id"
        );
        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            let item = sqlx::query_as::<_, OrderItemRow>(&insert_item)
                .bind(row.id)
                .bind(line.menu_item_id)
                .bind(line.price_tier.as_str())
                .bind(line.quantity)
                .bind(line.unit_price)
                .bind(line.line_total)
                .fetch_one(&mut *tx)
                .await?;
            items.push(item);
        }

        tx.commit().await?;
        Ok((row, items))
    }

    /// Find one of the owner's orders by ID.
    pub async fn find_for_owner(
        pool: &PgPool,
        owner: &OwnerKey,
        id: DbId,
    ) -> Result<Option<OrderRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders WHERE id = $3 AND (user_id = $1 OR session_id = $2)"
        );
        sqlx::query_as::<_, OrderRow>(&query)
            .bind(owner.user_id())
            .bind(owner.session_token())
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the owner's order created with `key`, if any.
    pub async fn find_by_idempotency_key(
        pool: &PgPool,
        owner: &OwnerKey,
        key: &str,
    ) -> Result<Option<OrderRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders \
             WHERE idempotency_key = $3 AND (user_id = $1 OR session_id = $2)"
        );
        sqlx::query_as::<_, OrderRow>(&query)
            .bind(owner.user_id())
            .bind(owner.session_token())
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// The owner's orders, newest first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner: &OwnerKey,
    ) -> Result<Vec<OrderRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders WHERE (user_id = $1 OR session_id = $2) \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, OrderRow>(&query)
            .bind(owner.user_id())
            .bind(owner.session_token())
            .fetch_all(pool)
            .await
    }

    /// Lines of the given orders, grouped by order and in insertion order.
    pub async fn list_items(
        pool: &PgPool,
        order_ids: &[DbId],
    ) -> Result<Vec<OrderItemRow>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM order_items oi \
             LEFT JOIN menu_items mi ON mi.id = oi.menu_item_id \
             WHERE oi.order_id = ANY($1) \
             ORDER BY oi.order_id, oi.id"
        );
        sqlx::query_as::<_, OrderItemRow>(&query)
            .bind(order_ids)
            .fetch_all(pool)
            .await
    }
}
