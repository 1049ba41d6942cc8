//! Cart store: the in-memory view of one owner's cart lines, kept
//! consistent with the backing table by re-reading after every mutation.
//!
//! A [`CartStore`] is constructed explicitly for an [`OwnerKey`] and handed
//! to whoever needs it. It never reads or writes lines of another owner,
//! except through the explicit [`CartStore::claim_guest_cart`] merge.
//!
//! Every mutation goes to the [`CartBackend`] first and is only reflected in
//! [`CartStore::lines`] after a successful re-fetch, so a failed operation
//! leaves the in-memory list exactly as it was.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::CoreError;
use crate::identity::{is_valid_session_token, OwnerKey};
use crate::notify::{NoticeKind, Notifier};
use crate::pricing::{self, MenuPrices, PriceTier};
use crate::types::{DbId, Timestamp};

/// Largest quantity a single cart line may hold. Claims that sum two lines
/// are clamped to it.
pub const MAX_LINE_QUANTITY: i32 = 99;

/// Menu item projection joined onto each cart line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuItemSummary {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub emoji: Option<String>,
    pub image_url: Option<String>,
    pub is_available: bool,
    #[serde(flatten)]
    pub prices: MenuPrices,
}

/// One persisted cart row: an item, a tier and a quantity for an owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub id: DbId,
    pub menu_item_id: DbId,
    pub price_tier: PriceTier,
    pub quantity: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub menu_item: MenuItemSummary,
}

/// Persistence operations the cart store needs.
///
/// Implementations must enforce uniqueness of (owner, menu item, tier) at
/// the storage layer; the store does no locking of its own.
#[async_trait]
pub trait CartBackend: Send + Sync {
    /// All lines of `owner` joined with their menu item, in insertion order.
    async fn fetch_lines(&self, owner: &OwnerKey) -> Result<Vec<CartLine>, CoreError>;

    async fn find_menu_item(
        &self,
        menu_item_id: DbId,
    ) -> Result<Option<MenuItemSummary>, CoreError>;

    /// Insert a line, or set its quantity when (owner, item, tier) exists.
    async fn upsert_line(
        &self,
        owner: &OwnerKey,
        menu_item_id: DbId,
        tier: PriceTier,
        quantity: i32,
    ) -> Result<(), CoreError>;

    /// Returns `false` when `owner` has no line with this id.
    async fn set_quantity(
        &self,
        owner: &OwnerKey,
        line_id: DbId,
        quantity: i32,
    ) -> Result<bool, CoreError>;

    /// Returns `false` when `owner` has no line with this id.
    async fn delete_line(&self, owner: &OwnerKey, line_id: DbId) -> Result<bool, CoreError>;

    async fn delete_all(&self, owner: &OwnerKey) -> Result<u64, CoreError>;

    /// Move every line of `from` into `to`, summing quantities on
    /// (item, tier) collisions and clamping the sum to
    /// [`MAX_LINE_QUANTITY`]. Returns the number of lines moved.
    async fn move_lines(&self, from: &OwnerKey, to: &OwnerKey) -> Result<u64, CoreError>;
}

fn check_line_quantity(quantity: i32) -> Result<(), CoreError> {
    if quantity > MAX_LINE_QUANTITY {
        return Err(CoreError::Validation(format!(
            "quantity must be at most {MAX_LINE_QUANTITY}, got {quantity}"
        )));
    }
    Ok(())
}

/// Cart for a single owner.
pub struct CartStore {
    owner: OwnerKey,
    backend: Arc<dyn CartBackend>,
    notifier: Arc<dyn Notifier>,
    lines: Vec<CartLine>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("owner", &self.owner)
            .field("lines", &self.lines.len())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create an empty store. Call [`CartStore::refresh`] to load lines.
    pub fn new(
        owner: OwnerKey,
        backend: Arc<dyn CartBackend>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            owner,
            backend,
            notifier,
            lines: Vec::new(),
        }
    }

    pub fn owner(&self) -> &OwnerKey {
        &self.owner
    }

    /// Lines as of the last successful fetch.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub(crate) fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// Re-read the owner's lines from the backing store.
    pub async fn refresh(&mut self) -> Result<&[CartLine], CoreError> {
        let result = self.reload().await;
        self.report(result, None, "Failed to load cart items")?;
        Ok(&self.lines)
    }

    /// Put `quantity` of `menu_item_id` at `tier` in the cart.
    ///
    /// The quantity is set, not added: a repeated call with the same value
    /// leaves the line unchanged. It must lie in `1..=MAX_LINE_QUANTITY`.
    /// Callers wanting "one more" read the current quantity first.
    pub async fn add(
        &mut self,
        menu_item_id: DbId,
        tier: PriceTier,
        quantity: i32,
    ) -> Result<(), CoreError> {
        let result = self.try_add(menu_item_id, tier, quantity).await;
        self.report(
            result,
            Some("Item has been added to your cart"),
            "Failed to add item to cart",
        )
    }

    /// [`CartStore::add`] with a quantity of one.
    pub async fn add_one(&mut self, menu_item_id: DbId, tier: PriceTier) -> Result<(), CoreError> {
        self.add(menu_item_id, tier, 1).await
    }

    /// Change a line's quantity; zero or less removes the line. More than
    /// [`MAX_LINE_QUANTITY`] is rejected.
    pub async fn update_quantity(&mut self, line_id: DbId, quantity: i32) -> Result<(), CoreError> {
        if quantity <= 0 {
            return self.remove(line_id).await;
        }
        let result = self.try_update_quantity(line_id, quantity).await;
        self.report(result, None, "Failed to update item quantity")
    }

    pub async fn remove(&mut self, line_id: DbId) -> Result<(), CoreError> {
        let result = self.try_remove(line_id).await;
        self.report(
            result,
            Some("Item has been removed from your cart"),
            "Failed to remove item from cart",
        )
    }

    /// Delete every line of the owner.
    pub async fn clear(&mut self) -> Result<(), CoreError> {
        let result = self.clear_rows().await.map(|_| ());
        self.report(
            result,
            Some("All items have been removed from your cart"),
            "Failed to clear cart",
        )
    }

    /// Merge the cart of guest session `guest_token` into this user's cart.
    ///
    /// Quantities are summed when both carts hold the same item and tier;
    /// the guest cart is left empty. Returns the number of guest lines moved.
    pub async fn claim_guest_cart(&mut self, guest_token: &str) -> Result<u64, CoreError> {
        let result = self.try_claim(guest_token).await;
        let moved = self.report(result, None, "Failed to merge guest cart")?;
        if moved > 0 {
            self.notifier.notify(
                NoticeKind::Success,
                &format!("Moved {moved} item(s) from your guest cart"),
            );
        }
        Ok(moved)
    }

    /// Sum of unit price × quantity over the current lines.
    pub fn total_price(&self) -> Decimal {
        pricing::cart_total(&self.lines)
    }

    /// Sum of quantities over the current lines.
    pub fn total_items(&self) -> i64 {
        pricing::total_items(&self.lines)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    pub(crate) async fn reload(&mut self) -> Result<(), CoreError> {
        self.lines = self.backend.fetch_lines(&self.owner).await?;
        Ok(())
    }

    /// Delete the owner's rows without emitting a notice.
    pub(crate) async fn clear_rows(&mut self) -> Result<u64, CoreError> {
        let deleted = self.backend.delete_all(&self.owner).await?;
        self.lines.clear();
        tracing::debug!(owner = ?self.owner, deleted, "Cart cleared");
        Ok(deleted)
    }

    async fn try_add(
        &mut self,
        menu_item_id: DbId,
        tier: PriceTier,
        quantity: i32,
    ) -> Result<(), CoreError> {
        if quantity < 1 {
            return Err(CoreError::Validation(format!(
                "quantity must be >= 1, got {quantity}"
            )));
        }
        check_line_quantity(quantity)?;

        let item = self
            .backend
            .find_menu_item(menu_item_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "MenuItem",
                id: menu_item_id,
            })?;

        if !item.is_available {
            return Err(CoreError::Validation(format!(
                "'{}' is currently unavailable",
                item.name
            )));
        }
        if item.prices.price_for(tier).is_none() {
            return Err(CoreError::Validation(format!(
                "'{}' is not offered as {tier}",
                item.name
            )));
        }

        self.backend
            .upsert_line(&self.owner, menu_item_id, tier, quantity)
            .await?;
        tracing::debug!(owner = ?self.owner, menu_item_id, %tier, quantity, "Cart line upserted");

        self.reload().await
    }

    async fn try_update_quantity(&mut self, line_id: DbId, quantity: i32) -> Result<(), CoreError> {
        check_line_quantity(quantity)?;
        let updated = self
            .backend
            .set_quantity(&self.owner, line_id, quantity)
            .await?;
        if !updated {
            return Err(CoreError::NotFound {
                entity: "CartLine",
                id: line_id,
            });
        }
        self.reload().await
    }

    async fn try_remove(&mut self, line_id: DbId) -> Result<(), CoreError> {
        let deleted = self.backend.delete_line(&self.owner, line_id).await?;
        if !deleted {
            return Err(CoreError::NotFound {
                entity: "CartLine",
                id: line_id,
            });
        }
        self.reload().await
    }

    async fn try_claim(&mut self, guest_token: &str) -> Result<u64, CoreError> {
        if self.owner.is_guest() {
            return Err(CoreError::Validation(
                "sign in before claiming a guest cart".to_string(),
            ));
        }
        if !is_valid_session_token(guest_token) {
            return Err(CoreError::Validation(
                "guest session token is malformed".to_string(),
            ));
        }

        let guest = OwnerKey::Guest {
            token: guest_token.to_string(),
        };
        let moved = self.backend.move_lines(&guest, &self.owner).await?;
        tracing::info!(owner = ?self.owner, moved, "Guest cart claimed");

        self.reload().await?;
        Ok(moved)
    }

    /// Emit the notice matching `result` and pass it through.
    fn report<T>(
        &self,
        result: Result<T, CoreError>,
        success: Option<&str>,
        failure: &str,
    ) -> Result<T, CoreError> {
        match &result {
            Ok(_) => {
                if let Some(message) = success {
                    self.notifier.notify(NoticeKind::Success, message);
                }
            }
            Err(err) => self.report_failure(err, failure),
        }
        result
    }

    pub(crate) fn report_failure(&self, err: &CoreError, failure: &str) {
        tracing::warn!(owner = ?self.owner, error = %err, "{failure}");
        let message = match err {
            CoreError::Validation(detail) => format!("{failure}: {detail}"),
            CoreError::NotFound { .. } => format!("{failure}: {err}"),
            _ => failure.to_string(),
        };
        self.notifier.notify(NoticeKind::Error, &message);
    }
}
