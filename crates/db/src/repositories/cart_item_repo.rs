//! Repository for the `cart_items` table.
//!
//! Every query is scoped by an [`OwnerKey`], bound as the pair
//! `(user_id, session_id)` with exactly one side populated. Comparing a
//! column against a NULL parameter is never true, so
//! `(user_id = $1 OR session_id = $2)` matches only the owner's rows.

use chimaek_core::cart::MAX_LINE_QUANTITY;
use chimaek_core::identity::OwnerKey;
use chimaek_core::pricing::PriceTier;
use chimaek_core::types::DbId;
use sqlx::PgPool;

use crate::models::cart_item::CartItemRow;

/// Cart columns joined with the menu projection.
const JOINED_SELECT: &str = "SELECT ci.id, ci.menu_item_id, ci.price_tier, ci.quantity, \
    ci.created_at, ci.updated_at, mi.name AS item_name, mi.description AS item_description, \
    mi.emoji AS item_emoji, mi.image_url AS item_image_url, \
    mi.is_available AS item_is_available, mi.full_price, mi.half_price, mi.extra_price \
    FROM cart_items ci JOIN menu_items mi ON mi.id = ci.menu_item_id";

/// Unique constraint guarding one line per (owner, item, tier).
fn line_constraint(owner: &OwnerKey) -> &'static str {
    match owner {
        OwnerKey::User { .. } => "uq_cart_items_user_line",
        OwnerKey::Guest { .. } => "uq_cart_items_session_line",
    }
}

/// Provides owner-scoped operations on cart lines.
pub struct CartItemRepo;

impl CartItemRepo {
    /// All lines of `owner` with their menu item, oldest first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner: &OwnerKey,
    ) -> Result<Vec<CartItemRow>, sqlx::Error> {
        let query = format!(
            "{JOINED_SELECT} WHERE (ci.user_id = $1 OR ci.session_id = $2) ORDER BY ci.id"
        );
        sqlx::query_as::<_, CartItemRow>(&query)
            .bind(owner.user_id())
            .bind(owner.session_token())
            .fetch_all(pool)
            .await
    }

    /// Insert a line or, when (owner, item, tier) exists, set its quantity.
    pub async fn upsert(
        pool: &PgPool,
        owner: &OwnerKey,
        menu_item_id: DbId,
        tier: PriceTier,
        quantity: i32,
    ) -> Result<DbId, sqlx::Error> {
        let query = format!(
            "INSERT INTO cart_items (user_id, session_id, menu_item_id, price_tier, quantity) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT ON CONSTRAINT {} \
             DO UPDATE SET quantity = EXCLUDED.quantity \
             RETURNING id",
            line_constraint(owner)
        );
        let (id,): (DbId,) = sqlx::query_as(&query)
            .bind(owner.user_id())
            .bind(owner.session_token())
            .bind(menu_item_id)
            .bind(tier.as_str())
            .bind(quantity)
            .fetch_one(pool)
            .await?;
        Ok(id)
    }

    /// Set the quantity of one of the owner's lines. Returns `true` if a row
    /// was updated.
    pub async fn set_quantity(
        pool: &PgPool,
        owner: &OwnerKey,
        line_id: DbId,
        quantity: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE cart_items SET quantity = $4 \
             WHERE id = $3 AND (user_id = $1 OR session_id = $2)",
        )
        .bind(owner.user_id())
        .bind(owner.session_token())
        .bind(line_id)
        .bind(quantity)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete one of the owner's lines. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, owner: &OwnerKey, line_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM cart_items WHERE id = $3 AND (user_id = $1 OR session_id = $2)",
        )
        .bind(owner.user_id())
        .bind(owner.session_token())
        .bind(line_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every line of the owner. Returns the number of rows removed.
    pub async fn delete_all(pool: &PgPool, owner: &OwnerKey) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart_items WHERE (user_id = $1 OR session_id = $2)")
            .bind(owner.user_id())
            .bind(owner.session_token())
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Move all lines of `from` to `to` in one transaction.
    ///
    /// Lines whose (item, tier) already exists for `to` are folded into that
    /// line with quantities summed and clamped to [`MAX_LINE_QUANTITY`]; the
    /// rest are re-owned. Returns the number
    /// of `from` lines consumed.
    pub async fn move_lines(
        pool: &PgPool,
        from: &OwnerKey,
        to: &OwnerKey,
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE cart_items dst \
             SET quantity = LEAST(dst.quantity::BIGINT + src.quantity, $5)::INTEGER \
             FROM cart_items src \
             WHERE (src.user_id = $1 OR src.session_id = $2) \
               AND (dst.user_id = $3 OR dst.session_id = $4) \
               AND dst.menu_item_id = src.menu_item_id \
               AND dst.price_tier = src.price_tier",
        )
        .bind(from.user_id())
        .bind(from.session_token())
        .bind(to.user_id())
        .bind(to.session_token())
        .bind(MAX_LINE_QUANTITY)
        .execute(&mut *tx)
        .await?;

        let merged = sqlx::query(
            "DELETE FROM cart_items src \
             WHERE (src.user_id = $1 OR src.session_id = $2) \
               AND EXISTS ( \
                 SELECT 1 FROM cart_items dst \
                 WHERE (dst.user_id = $3 OR dst.session_id = $4) \
                   AND dst.menu_item_id = src.menu_item_id \
                   AND dst.price_tier = src.price_tier)",
        )
        .bind(from.user_id())
        .bind(from.session_token())
        .bind(to.user_id())
        .bind(to.session_token())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let reowned = sqlx::query(
            "UPDATE cart_items SET user_id = $3, session_id = $4 \
             WHERE (user_id = $1 OR session_id = $2)",
        )
        .bind(from.user_id())
        .bind(from.session_token())
        .bind(to.user_id())
        .bind(to.session_token())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;
        Ok(merged + reowned)
    }
}
