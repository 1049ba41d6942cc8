//! Repository for the `menu_items` table.

use chimaek_core::types::DbId;
use sqlx::PgPool;

use crate::models::menu_item::{CreateMenuItem, MenuItem, UpdateMenuItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, category_id, name, description, full_price, half_price, \
    extra_price, emoji, image_url, is_available, is_spicy, is_vegan, display_order, \
    created_at, updated_at";

/// Same columns qualified with the `mi` alias, for joins.
const QUALIFIED_COLUMNS: &str = "mi.id, mi.category_id, mi.name, mi.description, \
    mi.full_price, mi.half_price, mi.extra_price, mi.emoji, mi.image_url, mi.is_available, \
    mi.is_spicy, mi.is_vegan, mi.display_order, mi.created_at, mi.updated_at";

/// Provides catalog reads and admin CRUD for menu items.
pub struct MenuItemRepo;

impl MenuItemRepo {
    /// Insert a new menu item, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateMenuItem) -> Result<MenuItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO menu_items \
                (category_id, name, description, full_price, half_price, extra_price, \
                 emoji, image_url, is_available, is_spicy, is_vegan, display_order) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, \
                 COALESCE($9, true), COALESCE($10, false), COALESCE($11, false), COALESCE($12, 0)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MenuItem>(&query)
            .bind(input.category_id)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(input.prices.full_price)
            .bind(input.prices.half_price)
            .bind(input.prices.extra_price)
            .bind(&input.emoji)
            .bind(&input.image_url)
            .bind(input.is_available)
            .bind(input.is_spicy)
            .bind(input.is_vegan)
            .bind(input.display_order)
            .fetch_one(pool)
            .await
    }

    /// Find a menu item by ID, available or not.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MenuItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM menu_items WHERE id = $1");
        sqlx::query_as::<_, MenuItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Available items of active categories in menu order, optionally
    /// restricted to the category with `category_slug`.
    pub async fn list_available(
        pool: &PgPool,
        category_slug: Option<&str>,
    ) -> Result<Vec<MenuItem>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED_COLUMNS} FROM menu_items mi \
             JOIN menu_categories mc ON mc.id = mi.category_id \
             WHERE mi.is_available AND mc.is_active \
               AND ($1::TEXT IS NULL OR mc.slug = $1) \
             ORDER BY mc.display_order, mi.display_order, mi.name"
        );
        sqlx::query_as::<_, MenuItem>(&query)
            .bind(category_slug)
            .fetch_all(pool)
            .await
    }

    /// Every item regardless of availability or category state, in menu
    /// order, optionally for one category.
    pub async fn list_all(
        pool: &PgPool,
        category_id: Option<DbId>,
    ) -> Result<Vec<MenuItem>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED_COLUMNS} FROM menu_items mi \
             JOIN menu_categories mc ON mc.id = mi.category_id \
             WHERE ($1::BIGINT IS NULL OR mi.category_id = $1) \
             ORDER BY mc.display_order, mi.display_order, mi.name"
        );
        sqlx::query_as::<_, MenuItem>(&query)
            .bind(category_id)
            .fetch_all(pool)
            .await
    }

    /// Update a menu item. Only non-`None` fields in `input` are applied,
    /// except prices, which are replaced as a set when present.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMenuItem,
    ) -> Result<Option<MenuItem>, sqlx::Error> {
        let query = format!(
            "UPDATE menu_items SET \
                category_id = COALESCE($2, category_id), \
                name = COALESCE($3, name), \
                description = COALESCE($4, description), \
                full_price = CASE WHEN $5 THEN $6 ELSE full_price END, \
                half_price = CASE WHEN $5 THEN $7 ELSE half_price END, \
                extra_price = CASE WHEN $5 THEN $8 ELSE extra_price END, \
                emoji = COALESCE($9, emoji), \
                image_url = COALESCE($10, image_url), \
                is_available = COALESCE($11, is_available), \
                is_spicy = COALESCE($12, is_spicy), \
                is_vegan = COALESCE($13, is_vegan), \
                display_order = COALESCE($14, display_order) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let prices = input.prices.unwrap_or_default();
        sqlx::query_as::<_, MenuItem>(&query)
            .bind(id)
            .bind(input.category_id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.prices.is_some())
            .bind(prices.full_price)
            .bind(prices.half_price)
            .bind(prices.extra_price)
            .bind(&input.emoji)
            .bind(&input.image_url)
            .bind(input.is_available)
            .bind(input.is_spicy)
            .bind(input.is_vegan)
            .bind(input.display_order)
            .fetch_optional(pool)
            .await
    }

    /// Set `is_available`. Returns `None` if the item does not exist.
    pub async fn set_availability(
        pool: &PgPool,
        id: DbId,
        is_available: bool,
    ) -> Result<Option<MenuItem>, sqlx::Error> {
        let query = format!(
            "UPDATE menu_items SET is_available = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MenuItem>(&query)
            .bind(id)
            .bind(is_available)
            .fetch_optional(pool)
            .await
    }

    /// Delete a menu item; cart lines holding it go with it.
    ///
    /// Fails with a foreign key violation when the item appears on an order
    /// line. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
