//! Handlers for the `/orders` resource: checkout and order history.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chimaek_core::error::CoreError;
use chimaek_core::order::{Order, OrderAssembler, OrderForm};
use chimaek_core::order_status;
use chimaek_core::types::DbId;
use serde::Serialize;

use crate::middleware::session::{CartOwner, CartResult};
use crate::response::{DataResponse, NoticedResponse};
use crate::state::AppState;

/// An order as returned to clients.
#[derive(Debug, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    /// Whether the order has reached a terminal status.
    pub is_final: bool,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        let is_final = order_status::is_terminal(&order.status);
        Self { order, is_final }
    }
}

/// POST /api/v1/orders
///
/// Place an order from the caller's cart. Repeating the request with the
/// same `idempotency_key` returns the order created the first time.
pub async fn place_order(
    State(state): State<AppState>,
    owner: CartOwner,
    Json(form): Json<OrderForm>,
) -> CartResult<impl IntoResponse> {
    let (mut cart, log) = owner.cart(&state);
    let assembler = OrderAssembler::new(state.backend.clone());
    let order = assembler
        .place_order(&mut cart, &form)
        .await
        .map_err(|e| owner.fail(e))?;
    Ok((
        StatusCode::CREATED,
        owner.session_headers(),
        Json(NoticedResponse::new(OrderView::from(order), &log)),
    ))
}

/// GET /api/v1/orders
///
/// The caller's orders, newest first.
pub async fn list_orders(
    State(state): State<AppState>,
    owner: CartOwner,
) -> CartResult<impl IntoResponse> {
    let orders = state
        .backend
        .list_orders(&owner.owner)
        .await
        .map_err(|e| owner.fail(e))?;
    let data: Vec<OrderView> = orders.into_iter().map(OrderView::from).collect();
    Ok((owner.session_headers(), Json(DataResponse { data })))
}

/// GET /api/v1/orders/{id}
///
/// 404 unless the order belongs to the caller.
pub async fn get_order(
    State(state): State<AppState>,
    owner: CartOwner,
    Path(id): Path<DbId>,
) -> CartResult<impl IntoResponse> {
    let order = state
        .backend
        .find_order(&owner.owner, id)
        .await
        .map_err(|e| owner.fail(e))?
        .ok_or_else(|| owner.fail(CoreError::NotFound { entity: "Order", id }))?;
    Ok((
        owner.session_headers(),
        Json(DataResponse {
            data: OrderView::from(order),
        }),
    ))
}
