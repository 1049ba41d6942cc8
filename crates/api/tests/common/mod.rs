#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chimaek_api::auth::jwt::{issue_token, JwtConfig};
use chimaek_api::config::ServerConfig;
use chimaek_api::router::build_app_router;
use chimaek_api::state::AppState;
use chimaek_core::pricing::MenuPrices;
use chimaek_core::types::DbId;
use chimaek_db::models::menu_category::CreateMenuCategory;
use chimaek_db::models::menu_item::CreateMenuItem;
use chimaek_db::repositories::{MenuCategoryRepo, MenuItemRepo};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

pub const SESSION_HEADER: &str = "x-cart-session";

/// Test `ServerConfig` with dev defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        db_max_connections: 5,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            leeway_secs: 0,
        },
    }
}

/// The production router and middleware stack over `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    build_app_router(AppState::new(pool, config.clone()), &config)
}

/// `Authorization` header value for a user with `role`.
pub fn bearer(user_id: DbId, role: &str) -> String {
    let token = issue_token(user_id, role, chrono::Duration::minutes(15), &test_config().jwt)
        .expect("token generation should succeed");
    format!("Bearer {token}")
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `x-cart-session` header of a response, if present.
pub fn session_of(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(SESSION_HEADER)
        .map(|v| v.to_str().unwrap().to_string())
}

/// Send a request with optional JSON body and extra headers.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, &[]).await
}

pub async fn get_with(app: Router, uri: &str, headers: &[(&str, &str)]) -> Response<Body> {
    send(app, Method::GET, uri, None, headers).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), &[]).await
}

pub async fn post_json_with(
    app: Router,
    uri: &str,
    body: Value,
    headers: &[(&str, &str)],
) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), headers).await
}

pub async fn put_json_with(
    app: Router,
    uri: &str,
    body: Value,
    headers: &[(&str, &str)],
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body), headers).await
}

pub async fn delete_with(app: Router, uri: &str, headers: &[(&str, &str)]) -> Response<Body> {
    send(app, Method::DELETE, uri, None, headers).await
}

pub fn dollars(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Insert an active category, returning its id.
pub async fn seed_category(pool: &PgPool, name: &str, slug: &str, display_order: i32) -> DbId {
    MenuCategoryRepo::create(
        pool,
        &CreateMenuCategory {
            name: name.to_string(),
            slug: None,
            description: None,
            display_order: Some(display_order),
            is_active: None,
        },
        slug,
    )
    .await
    .unwrap()
    .id
}

/// Insert an available item offering the full tier and, when given, the
/// half tier. Returns its id.
pub async fn seed_item(
    pool: &PgPool,
    category_id: DbId,
    name: &str,
    full_cents: i64,
    half_cents: Option<i64>,
) -> DbId {
    MenuItemRepo::create(
        pool,
        &CreateMenuItem {
            category_id,
            name: name.to_string(),
            description: None,
            prices: MenuPrices {
                full_price: Some(dollars(full_cents)),
                half_price: half_cents.map(dollars),
                extra_price: None,
            },
            emoji: Some("🍗".to_string()),
            image_url: None,
            is_available: None,
            is_spicy: None,
            is_vegan: None,
            display_order: None,
        },
    )
    .await
    .unwrap()
    .id
}
