//! In-process implementation of the cart and order backends.
//!
//! Enforces the same (owner, menu item, tier) uniqueness and all-or-nothing
//! order insertion as the Postgres backend. Used by unit tests and by
//! embeddings that run without a database. Failure switches simulate a
//! store that rejects reads, writes, or the order-line insert.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::cart::{CartBackend, CartLine, MenuItemSummary, MAX_LINE_QUANTITY};
use crate::error::CoreError;
use crate::identity::OwnerKey;
use crate::order::{NewOrder, NewOrderLine, Order, OrderBackend, OrderLine};
use crate::order_status::ORDER_PENDING;
use crate::pricing::{MenuPrices, PriceTier};
use crate::types::{DbId, Timestamp};

#[derive(Debug, Clone)]
struct StoredLine {
    id: DbId,
    owner: OwnerKey,
    menu_item_id: DbId,
    tier: PriceTier,
    quantity: i32,
    created_at: Timestamp,
    updated_at: Timestamp,
}

#[derive(Debug, Default)]
struct MemoryState {
    menu: BTreeMap<DbId, MenuItemSummary>,
    lines: Vec<StoredLine>,
    orders: Vec<Order>,
    next_id: DbId,
}

impl MemoryState {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn join(&self, line: &StoredLine) -> Option<CartLine> {
        let menu_item = self.menu.get(&line.menu_item_id)?.clone();
        Some(CartLine {
            id: line.id,
            menu_item_id: line.menu_item_id,
            price_tier: line.tier,
            quantity: line.quantity,
            created_at: line.created_at,
            updated_at: line.updated_at,
            menu_item,
        })
    }
}

/// Cart and order backend held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_order_lines: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>, CoreError> {
        self.state
            .lock()
            .map_err(|_| CoreError::Internal("memory backend lock poisoned".to_string()))
    }

    fn check_reads(&self) -> Result<(), CoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CoreError::Persistence("simulated read failure".to_string()));
        }
        Ok(())
    }

    fn check_writes(&self) -> Result<(), CoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::Persistence("simulated write failure".to_string()));
        }
        Ok(())
    }

    // -- failure switches ----------------------------------------------------

    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    /// Make the next order inserts fail after the order row would have been
    /// written, exercising the rollback path.
    pub fn fail_order_lines(&self, on: bool) {
        self.fail_order_lines.store(on, Ordering::SeqCst);
    }

    // -- menu fixtures -------------------------------------------------------

    /// Add an available menu item and return its id.
    ///
    /// Fixture helpers do nothing if the lock is poisoned.
    pub fn add_menu_item(&self, name: &str, prices: MenuPrices) -> DbId {
        let Ok(mut state) = self.state() else {
            return 0;
        };
        let id = state.next_id();
        state.menu.insert(
            id,
            MenuItemSummary {
                id,
                name: name.to_string(),
                description: None,
                emoji: None,
                image_url: None,
                is_available: true,
                prices,
            },
        );
        id
    }

    pub fn set_price(&self, menu_item_id: DbId, tier: PriceTier, price: Option<Decimal>) {
        if let Ok(mut state) = self.state() {
            if let Some(item) = state.menu.get_mut(&menu_item_id) {
                match tier {
                    PriceTier::Full => item.prices.full_price = price,
                    PriceTier::Half => item.prices.half_price = price,
                    PriceTier::Extra => item.prices.extra_price = price,
                }
            }
        }
    }

    pub fn set_available(&self, menu_item_id: DbId, available: bool) {
        if let Ok(mut state) = self.state() {
            if let Some(item) = state.menu.get_mut(&menu_item_id) {
                item.is_available = available;
            }
        }
    }

    /// Delete a menu item; its cart lines go with it.
    pub fn remove_menu_item(&self, menu_item_id: DbId) {
        if let Ok(mut state) = self.state() {
            state.menu.remove(&menu_item_id);
            state.lines.retain(|l| l.menu_item_id != menu_item_id);
        }
    }

    /// Snapshot of every stored order.
    pub fn orders(&self) -> Vec<Order> {
        self.state().map(|s| s.orders.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CartBackend for MemoryBackend {
    async fn fetch_lines(&self, owner: &OwnerKey) -> Result<Vec<CartLine>, CoreError> {
        self.check_reads()?;
        let state = self.state()?;
        Ok(state
            .lines
            .iter()
            .filter(|l| &l.owner == owner)
            .filter_map(|l| state.join(l))
            .collect())
    }

    async fn find_menu_item(
        &self,
        menu_item_id: DbId,
    ) -> Result<Option<MenuItemSummary>, CoreError> {
        self.check_reads()?;
        Ok(self.state()?.menu.get(&menu_item_id).cloned())
    }

    async fn upsert_line(
        &self,
        owner: &OwnerKey,
        menu_item_id: DbId,
        tier: PriceTier,
        quantity: i32,
    ) -> Result<(), CoreError> {
        self.check_writes()?;
        let mut state = self.state()?;
        if !state.menu.contains_key(&menu_item_id) {
            return Err(CoreError::NotFound {
                entity: "MenuItem",
                id: menu_item_id,
            });
        }

        let now = Utc::now();
        let existing = state
            .lines
            .iter_mut()
            .find(|l| &l.owner == owner && l.menu_item_id == menu_item_id && l.tier == tier);
        match existing {
            Some(line) => {
                line.quantity = quantity;
                line.updated_at = now;
            }
            None => {
                let id = state.next_id();
                state.lines.push(StoredLine {
                    id,
                    owner: owner.clone(),
                    menu_item_id,
                    tier,
                    quantity,
                    created_at: now,
                    updated_at: now,
                });
            }
        }
        Ok(())
    }

    async fn set_quantity(
        &self,
        owner: &OwnerKey,
        line_id: DbId,
        quantity: i32,
    ) -> Result<bool, CoreError> {
        self.check_writes()?;
        let mut state = self.state()?;
        match state
            .lines
            .iter_mut()
            .find(|l| l.id == line_id && &l.owner == owner)
        {
            Some(line) => {
                line.quantity = quantity;
                line.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_line(&self, owner: &OwnerKey, line_id: DbId) -> Result<bool, CoreError> {
        self.check_writes()?;
        let mut state = self.state()?;
        let before = state.lines.len();
        state
            .lines
            .retain(|l| !(l.id == line_id && &l.owner == owner));
        Ok(state.lines.len() < before)
    }

    async fn delete_all(&self, owner: &OwnerKey) -> Result<u64, CoreError> {
        self.check_writes()?;
        let mut state = self.state()?;
        let before = state.lines.len();
        state.lines.retain(|l| &l.owner != owner);
        Ok((before - state.lines.len()) as u64)
    }

    async fn move_lines(&self, from: &OwnerKey, to: &OwnerKey) -> Result<u64, CoreError> {
        self.check_writes()?;
        let mut state = self.state()?;
        let (moving, mut kept): (Vec<StoredLine>, Vec<StoredLine>) =
            state.lines.drain(..).partition(|l| &l.owner == from);

        let now = Utc::now();
        let moved = moving.len() as u64;
        for line in moving {
            let target = kept.iter_mut().find(|l| {
                &l.owner == to && l.menu_item_id == line.menu_item_id && l.tier == line.tier
            });
            match target {
                Some(existing) => {
                    existing.quantity = existing
                        .quantity
                        .saturating_add(line.quantity)
                        .min(MAX_LINE_QUANTITY);
                    existing.updated_at = now;
                }
                None => kept.push(StoredLine {
                    owner: to.clone(),
                    updated_at: now,
                    ..line
                }),
            }
        }
        state.lines = kept;
        Ok(moved)
    }
}

#[async_trait]
impl OrderBackend for MemoryBackend {
    async fn insert_order(
        &self,
        order: &NewOrder,
        lines: &[NewOrderLine],
    ) -> Result<Order, CoreError> {
        self.check_writes()?;
        if self.fail_order_lines.load(Ordering::SeqCst) {
            return Err(CoreError::Persistence(
                "simulated order line insert failure".to_string(),
            ));
        }

        let mut state = self.state()?;
        let now = Utc::now();
        let order_id = state.next_id();
        let mut stored_lines = Vec::with_capacity(lines.len());
        for line in lines {
            let id = state.next_id();
            let item = state.menu.get(&line.menu_item_id);
            let item_name = item.map(|i| i.name.clone());
            let item_emoji = item.and_then(|i| i.emoji.clone());
            stored_lines.push(OrderLine {
                id,
                order_id,
                menu_item_id: line.menu_item_id,
                price_tier: line.price_tier,
                quantity: line.quantity,
                unit_price: line.unit_price,
                line_total: line.line_total,
                item_name,
                item_emoji,
                created_at: now,
            });
        }

        let stored = Order {
            id: order_id,
            owner: order.owner.clone(),
            order_type: order.order_type,
            status: ORDER_PENDING.to_string(),
            total_amount: order.total_amount,
            customer_name: order.customer_name.clone(),
            customer_email: order.customer_email.clone(),
            customer_phone: order.customer_phone.clone(),
            delivery_address: order.delivery_address.clone(),
            special_instructions: order.special_instructions.clone(),
            idempotency_key: order.idempotency_key.clone(),
            created_at: now,
            updated_at: now,
            lines: stored_lines,
        };
        state.orders.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_idempotency_key(
        &self,
        owner: &OwnerKey,
        key: &str,
    ) -> Result<Option<Order>, CoreError> {
        self.check_reads()?;
        Ok(self
            .state()?
            .orders
            .iter()
            .find(|o| &o.owner == owner && o.idempotency_key.as_deref() == Some(key))
            .cloned())
    }
}
