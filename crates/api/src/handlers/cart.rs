//! Handlers for the `/cart` resource.
//!
//! Every handler resolves the caller to a [`CartOwner`], runs one cart store
//! operation and returns the refreshed cart with the notices it produced.
//! Guest responses, failures included, carry the session token in
//! `x-cart-session`.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use chimaek_core::cart::{CartLine, CartStore};
use chimaek_core::error::CoreError;
use chimaek_core::pricing::PriceTier;
use chimaek_core::types::DbId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::middleware::session::{session_token, CartOwner, CartResult, SESSION_HEADER};
use crate::response::NoticedResponse;
use crate::state::AppState;

/// Request body for adding an item to the cart.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub menu_item_id: DbId,
    pub price_tier: PriceTier,
    /// Defaults to 1.
    pub quantity: Option<i32>,
}

/// Request body for changing a line's quantity. Zero or less removes it.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

/// The cart as returned to clients.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub total_price: Decimal,
    pub total_items: i64,
}

impl CartView {
    pub fn of(cart: &CartStore) -> Self {
        Self {
            lines: cart.lines().to_vec(),
            total_price: cart.total_price(),
            total_items: cart.total_items(),
        }
    }
}

/// Result of merging a guest cart into the signed-in user's cart.
#[derive(Debug, Serialize)]
pub struct ClaimResult {
    pub moved: u64,
    pub cart: CartView,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/cart
pub async fn get_cart(
    State(state): State<AppState>,
    owner: CartOwner,
) -> CartResult<impl IntoResponse> {
    let (mut cart, log) = owner.cart(&state);
    cart.refresh().await.map_err(|e| owner.fail(e))?;
    Ok((
        owner.session_headers(),
        Json(NoticedResponse::new(CartView::of(&cart), &log)),
    ))
}

/// POST /api/v1/cart/items
///
/// Put an item at a price tier in the cart. The quantity replaces any
/// existing quantity of the same item and tier.
pub async fn add_item(
    State(state): State<AppState>,
    owner: CartOwner,
    Json(input): Json<AddToCartRequest>,
) -> CartResult<impl IntoResponse> {
    let (mut cart, log) = owner.cart(&state);
    cart.add(input.menu_item_id, input.price_tier, input.quantity.unwrap_or(1))
        .await
        .map_err(|e| owner.fail(e))?;
    Ok((
        owner.session_headers(),
        Json(NoticedResponse::new(CartView::of(&cart), &log)),
    ))
}

/// PUT /api/v1/cart/items/{id}
pub async fn update_item(
    State(state): State<AppState>,
    owner: CartOwner,
    Path(line_id): Path<DbId>,
    Json(input): Json<UpdateQuantityRequest>,
) -> CartResult<impl IntoResponse> {
    let (mut cart, log) = owner.cart(&state);
    cart.update_quantity(line_id, input.quantity)
        .await
        .map_err(|e| owner.fail(e))?;
    Ok((
        owner.session_headers(),
        Json(NoticedResponse::new(CartView::of(&cart), &log)),
    ))
}

/// DELETE /api/v1/cart/items/{id}
pub async fn remove_item(
    State(state): State<AppState>,
    owner: CartOwner,
    Path(line_id): Path<DbId>,
) -> CartResult<impl IntoResponse> {
    let (mut cart, log) = owner.cart(&state);
    cart.remove(line_id).await.map_err(|e| owner.fail(e))?;
    Ok((
        owner.session_headers(),
        Json(NoticedResponse::new(CartView::of(&cart), &log)),
    ))
}

/// DELETE /api/v1/cart
pub async fn clear_cart(
    State(state): State<AppState>,
    owner: CartOwner,
) -> CartResult<impl IntoResponse> {
    let (mut cart, log) = owner.cart(&state);
    cart.clear().await.map_err(|e| owner.fail(e))?;
    Ok((
        owner.session_headers(),
        Json(NoticedResponse::new(CartView::of(&cart), &log)),
    ))
}

/// POST /api/v1/cart/claim
///
/// Merge the guest cart named by the `x-cart-session` header into the
/// signed-in user's cart. Requires a Bearer token.
pub async fn claim_guest_cart(
    State(state): State<AppState>,
    headers: HeaderMap,
    owner: CartOwner,
) -> CartResult<impl IntoResponse> {
    if owner.user.is_none() {
        return Err(owner.fail(CoreError::Unauthorized(
            "Sign in to claim a guest cart".into(),
        )));
    }
    let guest_token = session_token(&headers).ok_or_else(|| {
        owner.fail(AppError::BadRequest(format!("Missing {SESSION_HEADER} header")))
    })?;

    let (mut cart, log) = owner.cart(&state);
    let moved = cart
        .claim_guest_cart(&guest_token)
        .await
        .map_err(|e| owner.fail(e))?;
    let result = ClaimResult {
        moved,
        cart: CartView::of(&cart),
    };
    Ok(Json(NoticedResponse::new(result, &log)))
}
