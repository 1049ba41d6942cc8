//! Price tiers and cart aggregates.
//!
//! A menu item offers up to three tiers (full, half, extra). A tier whose
//! price is absent is not offered; it resolves to zero here and callers
//! treat zero as "not purchasable".

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::error::CoreError;

/// Portion / pricing mode selected for a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTier {
    Full,
    Half,
    Extra,
}

impl PriceTier {
    pub const ALL: [PriceTier; 3] = [PriceTier::Full, PriceTier::Half, PriceTier::Extra];

    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            PriceTier::Full => "full",
            PriceTier::Half => "half",
            PriceTier::Extra => "extra",
        }
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(PriceTier::Full),
            "half" => Ok(PriceTier::Half),
            "extra" => Ok(PriceTier::Extra),
            other => Err(CoreError::Validation(format!(
                "unknown price tier '{other}', expected one of: full, half, extra"
            ))),
        }
    }
}

/// The three optional tier prices of a menu item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuPrices {
    pub full_price: Option<Decimal>,
    pub half_price: Option<Decimal>,
    pub extra_price: Option<Decimal>,
}

impl MenuPrices {
    /// Price for `tier`, or `None` when the tier is not offered.
    pub fn price_for(&self, tier: PriceTier) -> Option<Decimal> {
        match tier {
            PriceTier::Full => self.full_price,
            PriceTier::Half => self.half_price,
            PriceTier::Extra => self.extra_price,
        }
    }

    /// Tiers with a price present, in full/half/extra order.
    pub fn offered_tiers(&self) -> Vec<PriceTier> {
        PriceTier::ALL
            .into_iter()
            .filter(|tier| self.price_for(*tier).is_some())
            .collect()
    }

    /// Reject negative prices.
    pub fn validate(&self) -> Result<(), CoreError> {
        for tier in PriceTier::ALL {
            if let Some(price) = self.price_for(tier) {
                if price < Decimal::ZERO {
                    return Err(CoreError::Validation(format!(
                        "{tier}_price must be >= 0, got {price}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Unit price for a cart line; zero when the tier is not offered.
pub fn resolve_price(line: &CartLine) -> Decimal {
    line.menu_item
        .prices
        .price_for(line.price_tier)
        .unwrap_or(Decimal::ZERO)
}

/// Whether a resolved unit price allows the line to be ordered.
pub fn is_purchasable(unit_price: Decimal) -> bool {
    unit_price > Decimal::ZERO
}

/// `unit_price × quantity`.
pub fn line_total(unit_price: Decimal, quantity: i32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

/// Sum of `resolve_price(line) × quantity` over all lines.
pub fn cart_total(lines: &[CartLine]) -> Decimal {
    lines
        .iter()
        .map(|line| line_total(resolve_price(line), line.quantity))
        .sum()
}

/// Sum of quantities over all lines.
pub fn total_items(lines: &[CartLine]) -> i64 {
    lines.iter().map(|line| i64::from(line.quantity)).sum()
}
