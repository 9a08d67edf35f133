//! Tiered pricing over decimal arithmetic.
//!
//! Quote totals are money, so they go through `rust_decimal` rather than
//! floats. Supplier price tables are quantity breakpoints: the more units
//! in a run, the lower the unit price.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A quantity breakpoint in a supplier price table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTier {
    /// Minimum quantity for this tier to apply.
    pub min_quantity: u32,
    /// Unit price at this tier.
    pub unit_price: Decimal,
}

/// Resolve the unit price for a quantity from tier breakpoints.
///
/// Picks the tier with the highest `min_quantity` not exceeding the
/// quantity. Returns `None` when the quantity is below every tier.
#[must_use]
pub fn tier_unit_price(tiers: &[PriceTier], quantity: u32) -> Option<Decimal> {
    tiers
        .iter()
        .filter(|tier| tier.min_quantity <= quantity)
        .max_by_key(|tier| tier.min_quantity)
        .map(|tier| tier.unit_price)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> [PriceTier; 3] {
        [
            PriceTier {
                min_quantity: 1,
                unit_price: Decimal::from(12),
            },
            PriceTier {
                min_quantity: 24,
                unit_price: Decimal::from(9),
            },
            PriceTier {
                min_quantity: 100,
                unit_price: Decimal::from(7),
            },
        ]
    }

    #[test]
    fn test_tier_unit_price_picks_highest_applicable() {
        let tiers = table();
        assert_eq!(tier_unit_price(&tiers, 1), Some(Decimal::from(12)));
        assert_eq!(tier_unit_price(&tiers, 23), Some(Decimal::from(12)));
        assert_eq!(tier_unit_price(&tiers, 24), Some(Decimal::from(9)));
        assert_eq!(tier_unit_price(&tiers, 500), Some(Decimal::from(7)));
    }

    #[test]
    fn test_below_every_tier_is_none() {
        assert_eq!(tier_unit_price(&table(), 0), None);
        assert_eq!(tier_unit_price(&[], 10), None);
    }

    #[test]
    fn test_tier_order_does_not_matter() {
        let mut tiers = table();
        tiers.reverse();
        assert_eq!(tier_unit_price(&tiers, 50), Some(Decimal::from(9)));
    }
}
