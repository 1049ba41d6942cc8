//! Repository for the `menu_categories` table.

use chimaek_core::types::DbId;
use sqlx::PgPool;

use crate::models::menu_category::{CreateMenuCategory, MenuCategory, UpdateMenuCategory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, slug, description, display_order, is_active, created_at, updated_at";

/// Provides CRUD operations for menu categories.
pub struct MenuCategoryRepo;

impl MenuCategoryRepo {
    /// Insert a new category. `slug` is the already-resolved slug (the DTO's
    /// own slug or one derived from the name).
    pub async fn create(
        pool: &PgPool,
        input: &CreateMenuCategory,
        slug: &str,
    ) -> Result<MenuCategory, sqlx::Error> {
        let query = format!(
            "INSERT INTO menu_categories (name, slug, description, display_order, is_active) \
             VALUES ($1, $2, $3, COALESCE($4, 0), COALESCE($5, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MenuCategory>(&query)
            .bind(input.name.trim())
            .bind(slug)
            .bind(&input.description)
            .bind(input.display_order)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MenuCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM menu_categories WHERE id = $1");
        sqlx::query_as::<_, MenuCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Active categories in menu order.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<MenuCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM menu_categories WHERE is_active \
             ORDER BY display_order, name"
        );
        sqlx::query_as::<_, MenuCategory>(&query).fetch_all(pool).await
    }

    /// Every category, inactive ones included, in menu order.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<MenuCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM menu_categories ORDER BY display_order, name");
        sqlx::query_as::<_, MenuCategory>(&query).fetch_all(pool).await
    }

    /// Update a category. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMenuCategory,
    ) -> Result<Option<MenuCategory>, sqlx::Error> {
        let query = format!(
            "UPDATE menu_categories SET \
                name = COALESCE($2, name), \
                slug = COALESCE($3, slug), \
                description = COALESCE($4, description), \
                display_order = COALESCE($5, display_order), \
                is_active = COALESCE($6, is_active) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MenuCategory>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.slug)
            .bind(&input.description)
            .bind(input.display_order)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a category and, through the foreign key cascade, its items.
    ///
    /// Fails with a foreign key violation when one of its items appears on
    /// an order line. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM menu_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
