//! Integration tests for the menu catalog repositories.
//!
//! - Category create / list ordering / slug uniqueness
//! - Available-item listing with category filter, and the full admin listing
//! - Price replacement on update
//! - Cascade and restrict rules on delete

use chimaek_core::pricing::MenuPrices;
use chimaek_db::models::menu_category::{CreateMenuCategory, UpdateMenuCategory};
use chimaek_db::models::menu_item::{CreateMenuItem, UpdateMenuItem};
use chimaek_db::repositories::{MenuCategoryRepo, MenuItemRepo};
use chimaek_db::{violated_constraint, FOREIGN_KEY_VIOLATION, UNIQUE_VIOLATION};
use rust_decimal::Decimal;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_category(name: &str, display_order: i32) -> CreateMenuCategory {
    CreateMenuCategory {
        name: name.to_string(),
        slug: None,
        description: None,
        display_order: Some(display_order),
        is_active: None,
    }
}

fn new_item(category_id: i64, name: &str, full_cents: i64) -> CreateMenuItem {
    CreateMenuItem {
        category_id,
        name: name.to_string(),
        description: None,
        prices: MenuPrices {
            full_price: Some(Decimal::new(full_cents, 2)),
            half_price: None,
            extra_price: None,
        },
        emoji: None,
        image_url: None,
        is_available: None,
        is_spicy: None,
        is_vegan: None,
        display_order: None,
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_categories_listed_in_display_order(pool: PgPool) {
    MenuCategoryRepo::create(&pool, &new_category("Sides", 2), "sides")
        .await
        .unwrap();
    MenuCategoryRepo::create(&pool, &new_category("Chicken", 1), "chicken")
        .await
        .unwrap();
    let hidden = MenuCategoryRepo::create(&pool, &new_category("Seasonal", 0), "seasonal")
        .await
        .unwrap();
    MenuCategoryRepo::update(
        &pool,
        hidden.id,
        &UpdateMenuCategory {
            name: None,
            slug: None,
            description: None,
            display_order: None,
            is_active: Some(false),
        },
    )
    .await
    .unwrap();

    let slugs: Vec<String> = MenuCategoryRepo::list_active(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.slug)
        .collect();
    assert_eq!(slugs, vec!["chicken", "sides"]);

    let everything: Vec<String> = MenuCategoryRepo::list_all(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.slug)
        .collect();
    assert_eq!(everything, vec!["seasonal", "chicken", "sides"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_slug_is_unique_violation(pool: PgPool) {
    MenuCategoryRepo::create(&pool, &new_category("Chicken", 1), "chicken")
        .await
        .unwrap();
    let err = MenuCategoryRepo::create(&pool, &new_category("Chicken 2", 2), "chicken")
        .await
        .unwrap_err();
    assert_eq!(
        violated_constraint(&err, UNIQUE_VIOLATION),
        Some("uq_menu_categories_slug")
    );
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_list_available_filters_by_category_slug(pool: PgPool) {
    let chicken = MenuCategoryRepo::create(&pool, &new_category("Chicken", 1), "chicken")
        .await
        .unwrap();
    let sides = MenuCategoryRepo::create(&pool, &new_category("Sides", 2), "sides")
        .await
        .unwrap();
    MenuItemRepo::create(&pool, &new_item(chicken.id, "Yangnyeom", 4000))
        .await
        .unwrap();
    MenuItemRepo::create(&pool, &new_item(sides.id, "Pickled Radish", 300))
        .await
        .unwrap();
    let sold_out = MenuItemRepo::create(&pool, &new_item(chicken.id, "Padak", 3900))
        .await
        .unwrap();
    MenuItemRepo::set_availability(&pool, sold_out.id, false)
        .await
        .unwrap();

    let all = MenuItemRepo::list_available(&pool, None).await.unwrap();
    assert_eq!(all.len(), 2);

    let only_chicken = MenuItemRepo::list_available(&pool, Some("chicken"))
        .await
        .unwrap();
    assert_eq!(only_chicken.len(), 1);
    assert_eq!(only_chicken[0].name, "Yangnyeom");

    let unknown = MenuItemRepo::list_available(&pool, Some("desserts"))
        .await
        .unwrap();
    assert!(unknown.is_empty());

    let admin_view = MenuItemRepo::list_all(&pool, Some(chicken.id)).await.unwrap();
    let names: Vec<&str> = admin_view.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Padak", "Yangnyeom"]);
    assert_eq!(MenuItemRepo::list_all(&pool, None).await.unwrap().len(), 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_replaces_prices_as_a_set(pool: PgPool) {
    let cat = MenuCategoryRepo::create(&pool, &new_category("Chicken", 1), "chicken")
        .await
        .unwrap();
    let mut input = new_item(cat.id, "Fried Chicken", 4000);
    input.prices.half_price = Some(Decimal::new(2500, 2));
    let item = MenuItemRepo::create(&pool, &input).await.unwrap();

    let updated = MenuItemRepo::update(
        &pool,
        item.id,
        &UpdateMenuItem {
            category_id: None,
            name: Some("  Crispy Fried Chicken ".to_string()),
            description: None,
            prices: Some(MenuPrices {
                full_price: Some(Decimal::new(4200, 2)),
                half_price: None,
                extra_price: None,
            }),
            emoji: None,
            image_url: None,
            is_available: None,
            is_spicy: None,
            is_vegan: None,
            display_order: None,
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.name, "Crispy Fried Chicken");
    assert_eq!(updated.full_price, Some(Decimal::new(4200, 2)));
    assert_eq!(updated.half_price, None);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_missing_item_returns_none(pool: PgPool) {
    let result = MenuItemRepo::set_availability(&pool, 999_999, true)
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_negative_price_rejected_by_check_constraint(pool: PgPool) {
    let cat = MenuCategoryRepo::create(&pool, &new_category("Chicken", 1), "chicken")
        .await
        .unwrap();
    let result = MenuItemRepo::create(&pool, &new_item(cat.id, "Broken", -100)).await;
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Delete rules
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_category_cascades_to_items(pool: PgPool) {
    let cat = MenuCategoryRepo::create(&pool, &new_category("Drinks", 3), "drinks")
        .await
        .unwrap();
    let item = MenuItemRepo::create(&pool, &new_item(cat.id, "Soju", 800))
        .await
        .unwrap();

    assert!(MenuCategoryRepo::delete(&pool, cat.id).await.unwrap());
    assert!(MenuItemRepo::find_by_id(&pool, item.id).await.unwrap().is_none());
    assert!(!MenuCategoryRepo::delete(&pool, cat.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_item_on_order_line_is_restricted(pool: PgPool) {
    let cat = MenuCategoryRepo::create(&pool, &new_category("Chicken", 1), "chicken")
        .await
        .unwrap();
    let item = MenuItemRepo::create(&pool, &new_item(cat.id, "Garlic Chicken", 4100))
        .await
        .unwrap();
    let (order_id,): (i64,) = sqlx::query_as(
        "INSERT INTO orders (session_id, order_type, total_amount, customer_name, customer_email) \
         VALUES ('guest-session-token-0000000000000000', 'pickup', 41.00, 'A', 'a@example.com') \
         RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO order_items (order_id, menu_item_id, price_tier, quantity, unit_price, line_total) \
         VALUES ($1, $2, 'full', 1, 41.00, 41.00)",
    )
    .bind(order_id)
    .bind(item.id)
    .execute(&pool)
    .await
    .unwrap();

    let err = MenuItemRepo::delete(&pool, item.id).await.unwrap_err();
    assert!(violated_constraint(&err, FOREIGN_KEY_VIOLATION).is_some());
    assert!(MenuItemRepo::find_by_id(&pool, item.id).await.unwrap().is_some());
}
