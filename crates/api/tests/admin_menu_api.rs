//! Integration tests for the admin menu endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    bearer, body_json, delete_with, get, get_with, post_json, post_json_with, put_json_with,
    seed_category, seed_item, session_of, SESSION_HEADER,
};
use serde_json::json;
use sqlx::PgPool;

fn admin() -> String {
    bearer(1, "admin")
}

// ---------------------------------------------------------------------------
// Access control
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_anonymous_caller_gets_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/v1/admin/menu/categories", json!({ "name": "Sides" })).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_customer_gets_403(pool: PgPool) {
    let app = common::build_test_app(pool);
    let customer = bearer(2, "customer");

    let response = post_json_with(
        app,
        "/api/v1/admin/menu/categories",
        json!({ "name": "Sides" }),
        &[("authorization", customer.as_str())],
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_customer_cannot_list_admin_menu(pool: PgPool) {
    let app = common::build_test_app(pool);
    let customer = bearer(2, "customer");

    let response = get_with(
        app,
        "/api/v1/admin/menu/items",
        &[("authorization", customer.as_str())],
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_listing_includes_inactive_categories(pool: PgPool) {
    seed_category(&pool, "Drinks", "drinks", 2).await;
    let hidden = seed_category(&pool, "Seasonal", "seasonal", 1).await;
    sqlx::query("UPDATE menu_categories SET is_active = false WHERE id = $1")
        .bind(hidden)
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool);
    let auth = admin();

    let public = body_json(get(app.clone(), "/api/v1/menu/categories").await).await;
    assert_eq!(public["data"].as_array().unwrap().len(), 1);

    let response = get_with(
        app,
        "/api/v1/admin/menu/categories",
        &[("authorization", auth.as_str())],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let slugs: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, ["seasonal", "drinks"]);
    assert_eq!(json["data"][0]["is_active"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_category_derives_slug(pool: PgPool) {
    let app = common::build_test_app(pool);
    let auth = admin();

    let response = post_json_with(
        app,
        "/api/v1/admin/menu/categories",
        json!({ "name": "Beer & Soju", "display_order": 5 }),
        &[("authorization", auth.as_str())],
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["slug"], "beer-soju");
    assert_eq!(json["data"]["display_order"], 5);
    assert_eq!(json["data"]["is_active"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_slug_returns_409(pool: PgPool) {
    seed_category(&pool, "Chicken", "chicken", 1).await;
    let app = common::build_test_app(pool);
    let auth = admin();

    let response = post_json_with(
        app,
        "/api/v1/admin/menu/categories",
        json!({ "name": "Chicken" }),
        &[("authorization", auth.as_str())],
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_invalid_slug_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let auth = admin();

    let response = post_json_with(
        app,
        "/api/v1/admin/menu/categories",
        json!({ "name": "Sides", "slug": "Side Dishes" }),
        &[("authorization", auth.as_str())],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_missing_category_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let auth = admin();

    let response = put_json_with(
        app,
        "/api/v1/admin/menu/categories/999",
        json!({ "name": "Renamed" }),
        &[("authorization", auth.as_str())],
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_item_and_toggle_availability(pool: PgPool) {
    let category = seed_category(&pool, "Chicken", "chicken", 1).await;
    let app = common::build_test_app(pool);
    let auth = admin();
    let headers = [("authorization", auth.as_str())];

    let response = post_json_with(
        app.clone(),
        "/api/v1/admin/menu/items",
        json!({
            "category_id": category,
            "name": "Honey Butter",
            "full_price": "19.50",
            "half_price": "11.00",
            "emoji": "🍯",
        }),
        &headers,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let item = body_json(response).await;
    let id = item["data"]["id"].as_i64().unwrap();
    assert_eq!(item["data"]["is_available"], true);
    assert!(item["data"]["extra_price"].is_null());

    let response = post_json_with(
        app.clone(),
        &format!("/api/v1/admin/menu/items/{id}/availability"),
        json!({ "is_available": false }),
        &headers,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let listing = body_json(get(app.clone(), "/api/v1/menu/items").await).await;
    assert_eq!(listing["data"].as_array().unwrap().len(), 0);

    // Still reachable from the admin listing.
    let response = get_with(
        app,
        &format!("/api/v1/admin/menu/items?category_id={category}"),
        &headers,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let admin_listing = body_json(response).await;
    assert_eq!(admin_listing["data"].as_array().unwrap().len(), 1);
    assert_eq!(admin_listing["data"][0]["id"], id);
    assert_eq!(admin_listing["data"][0]["is_available"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_item_in_missing_category_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let auth = admin();

    let response = post_json_with(
        app,
        "/api/v1/admin/menu/items",
        json!({ "category_id": 777, "name": "Orphan", "full_price": "10.00" }),
        &[("authorization", auth.as_str())],
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_negative_or_missing_prices_are_rejected(pool: PgPool) {
    let category = seed_category(&pool, "Chicken", "chicken", 1).await;
    let app = common::build_test_app(pool);
    let auth = admin();
    let headers = [("authorization", auth.as_str())];

    let negative = post_json_with(
        app.clone(),
        "/api/v1/admin/menu/items",
        json!({ "category_id": category, "name": "Bad", "full_price": "-1.00" }),
        &headers,
    )
    .await;
    assert_eq!(negative.status(), StatusCode::BAD_REQUEST);

    let unpriced = post_json_with(
        app,
        "/api/v1/admin/menu/items",
        json!({ "category_id": category, "name": "Free" }),
        &headers,
    )
    .await;
    assert_eq!(unpriced.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_item_replaces_price_set(pool: PgPool) {
    let category = seed_category(&pool, "Chicken", "chicken", 1).await;
    let item = seed_item(&pool, category, "Original Fried", 1800, Some(1000)).await;
    let app = common::build_test_app(pool);
    let auth = admin();

    let response = put_json_with(
        app,
        &format!("/api/v1/admin/menu/items/{item}"),
        json!({ "prices": { "full_price": "20.00" } }),
        &[("authorization", auth.as_str())],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["full_price"], "20.00");
    assert!(json["data"]["half_price"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_ordered_item_cannot_be_deleted(pool: PgPool) {
    let category = seed_category(&pool, "Chicken", "chicken", 1).await;
    let item = seed_item(&pool, category, "Original Fried", 1800, None).await;
    let app = common::build_test_app(pool);
    let auth = admin();

    let token = session_of(&get(app.clone(), "/api/v1/cart").await).unwrap();
    let guest = [(SESSION_HEADER, token.as_str())];
    post_json_with(
        app.clone(),
        "/api/v1/cart/items",
        json!({ "menu_item_id": item, "price_tier": "full" }),
        &guest,
    )
    .await;
    let placed = post_json_with(
        app.clone(),
        "/api/v1/orders",
        json!({
            "order_type": "pickup",
            "customer_name": "Ha-eun",
            "customer_email": "haeun@example.com",
        }),
        &guest,
    )
    .await;
    assert_eq!(placed.status(), StatusCode::CREATED);

    let response = delete_with(
        app.clone(),
        &format!("/api/v1/admin/menu/items/{item}"),
        &[("authorization", auth.as_str())],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = delete_with(
        app,
        &format!("/api/v1/admin/menu/categories/{category}"),
        &[("authorization", auth.as_str())],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unordered_item_is_deleted(pool: PgPool) {
    let category = seed_category(&pool, "Chicken", "chicken", 1).await;
    let item = seed_item(&pool, category, "Original Fried", 1800, None).await;
    let app = common::build_test_app(pool);
    let auth = admin();
    let headers = [("authorization", auth.as_str())];

    let response = delete_with(app.clone(), &format!("/api/v1/admin/menu/items/{item}"), &headers).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_with(app, &format!("/api/v1/admin/menu/items/{item}"), &headers).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
