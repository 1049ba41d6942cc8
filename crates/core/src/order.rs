//! Checkout: snapshot a cart into an immutable order.
//!
//! Unit prices are copied from the menu at the moment of checkout and
//! stored on each order line; later menu price changes never touch
//! historical orders.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::cart::{CartLine, CartStore};
use crate::error::CoreError;
use crate::identity::OwnerKey;
use crate::notify::NoticeKind;
use crate::pricing::{self, PriceTier};
use crate::types::{DbId, Timestamp};

/// Largest order total the money columns can store (`NUMERIC(10,2)`).
pub const MAX_ORDER_TOTAL: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// How the customer receives the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Pickup,
    Delivery,
}

impl OrderType {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderType::Pickup => "pickup",
            OrderType::Delivery => "delivery",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pickup" => Ok(OrderType::Pickup),
            "delivery" => Ok(OrderType::Delivery),
            other => Err(CoreError::Validation(format!(
                "unknown order type '{other}', expected pickup or delivery"
            ))),
        }
    }
}

/// Checkout form submitted by the customer.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OrderForm {
    pub order_type: OrderType,
    #[validate(length(min = 1, max = 200))]
    pub customer_name: String,
    #[validate(email)]
    pub customer_email: String,
    #[validate(length(max = 50))]
    pub customer_phone: Option<String>,
    /// Required when `order_type` is `delivery`.
    #[validate(length(max = 500))]
    pub delivery_address: Option<String>,
    #[validate(length(max = 1000))]
    pub special_instructions: Option<String>,
    /// Client-generated token; a retry with the same key returns the
    /// order created by the first attempt.
    #[validate(length(min = 8, max = 128))]
    pub idempotency_key: Option<String>,
}

impl OrderForm {
    /// Field validation plus the delivery-address rule.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()?;

        if self.customer_name.trim().is_empty() {
            return Err(CoreError::Validation(
                "customer_name must not be blank".to_string(),
            ));
        }

        let has_address = self
            .delivery_address
            .as_deref()
            .is_some_and(|a| !a.trim().is_empty());
        if self.order_type == OrderType::Delivery && !has_address {
            return Err(CoreError::Validation(
                "delivery_address is required for delivery orders".to_string(),
            ));
        }
        Ok(())
    }
}

/// Order row to insert. Status is always `pending`.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub owner: OwnerKey,
    pub order_type: OrderType,
    pub total_amount: Decimal,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub delivery_address: Option<String>,
    pub special_instructions: Option<String>,
    pub idempotency_key: Option<String>,
}

/// Order line to insert, priced at checkout time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderLine {
    pub menu_item_id: DbId,
    pub price_tier: PriceTier,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// A persisted order and its lines.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: DbId,
    #[serde(skip)]
    pub owner: OwnerKey,
    pub order_type: OrderType,
    pub status: String,
    pub total_amount: Decimal,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub delivery_address: Option<String>,
    pub special_instructions: Option<String>,
    pub idempotency_key: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub lines: Vec<OrderLine>,
}

/// A persisted, frozen order line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    pub id: DbId,
    pub order_id: DbId,
    pub menu_item_id: DbId,
    pub price_tier: PriceTier,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    /// Current name of the menu item, for display in order history.
    pub item_name: Option<String>,
    pub item_emoji: Option<String>,
    pub created_at: Timestamp,
}

/// Persistence operations checkout needs.
#[async_trait]
pub trait OrderBackend: Send + Sync {
    /// Insert the order and all its lines atomically: either everything is
    /// stored or nothing is.
    async fn insert_order(
        &self,
        order: &NewOrder,
        lines: &[NewOrderLine],
    ) -> Result<Order, CoreError>;

    async fn find_by_idempotency_key(
        &self,
        owner: &OwnerKey,
        key: &str,
    ) -> Result<Option<Order>, CoreError>;
}

/// Price every cart line at its current menu price.
///
/// Fails if any line is no longer purchasable (its tier price was removed
/// after it was added).
pub fn snapshot_lines(lines: &[CartLine]) -> Result<Vec<NewOrderLine>, CoreError> {
    lines
        .iter()
        .map(|line| {
            let unit_price = pricing::resolve_price(line);
            if !pricing::is_purchasable(unit_price) {
                return Err(CoreError::Validation(format!(
                    "'{}' is no longer offered as {}",
                    line.menu_item.name, line.price_tier
                )));
            }
            Ok(NewOrderLine {
                menu_item_id: line.menu_item_id,
                price_tier: line.price_tier,
                quantity: line.quantity,
                unit_price,
                line_total: pricing::line_total(unit_price, line.quantity),
            })
        })
        .collect()
}

/// Turns the current cart into an order.
pub struct OrderAssembler {
    backend: Arc<dyn OrderBackend>,
}

impl OrderAssembler {
    pub fn new(backend: Arc<dyn OrderBackend>) -> Self {
        Self { backend }
    }

    /// Place an order from `cart` and empty the cart on success.
    ///
    /// The form is checked before any I/O. The cart is re-read so prices are
    /// those at call time. On failure nothing is stored and the cart keeps
    /// its lines.
    pub async fn place_order(
        &self,
        cart: &mut CartStore,
        form: &OrderForm,
    ) -> Result<Order, CoreError> {
        match self.try_place(cart, form).await {
            Ok(order) => {
                cart.notifier().notify(
                    NoticeKind::Success,
                    &format!("Your order #{} has been received.", order.id),
                );
                Ok(order)
            }
            Err(err) => {
                cart.report_failure(&err, "Failed to place order. Please try again.");
                Err(err)
            }
        }
    }

    async fn try_place(&self, cart: &mut CartStore, form: &OrderForm) -> Result<Order, CoreError> {
        form.check()?;

        if let Some(key) = form.idempotency_key.as_deref() {
            if let Some(existing) = self.backend.find_by_idempotency_key(cart.owner(), key).await? {
                tracing::info!(order_id = existing.id, "Checkout retry matched existing order");
                return Ok(existing);
            }
        }

        cart.reload().await?;
        if cart.is_empty() {
            return Err(CoreError::Validation("cart is empty".to_string()));
        }

        let lines = snapshot_lines(cart.lines())?;
        let total_amount = cart.total_price();
        if total_amount > MAX_ORDER_TOTAL {
            return Err(CoreError::Validation(format!(
                "order total {total_amount} exceeds the maximum of {MAX_ORDER_TOTAL}"
            )));
        }
        let new_order = NewOrder {
            owner: cart.owner().clone(),
            order_type: form.order_type,
            total_amount,
            customer_name: form.customer_name.trim().to_string(),
            customer_email: form.customer_email.trim().to_string(),
            customer_phone: form.customer_phone.clone(),
            delivery_address: match form.order_type {
                OrderType::Delivery => form.delivery_address.clone(),
                OrderType::Pickup => None,
            },
            special_instructions: form.special_instructions.clone(),
            idempotency_key: form.idempotency_key.clone(),
        };

        let order = self.backend.insert_order(&new_order, &lines).await?;
        tracing::info!(
            order_id = order.id,
            order_type = %order.order_type,
            total = %order.total_amount,
            lines = order.lines.len(),
            "Order placed"
        );

        if let Err(err) = cart.clear_rows().await {
            tracing::warn!(order_id = order.id, error = %err, "Order placed but cart not cleared");
            cart.notifier().notify(
                NoticeKind::Error,
                "Your order was placed but the cart could not be emptied",
            );
        }

        Ok(order)
    }
}
