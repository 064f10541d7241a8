//! Cart pricing calculations.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Pricing breakdown for a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Sum of line totals.
    pub subtotal: Money,
    /// Shipping cost from the shipping policy.
    pub shipping: Money,
    /// subtotal + shipping
    pub total: Money,
    /// Total number of units.
    pub item_count: i64,
    /// Per-line breakdown.
    pub lines: Vec<LinePricing>,
}

impl CartPricing {
    pub fn has_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }

    /// Amount still needed to reach free shipping, if any.
    pub fn missing_for_free_shipping(&self, threshold: &Money) -> Option<Money> {
        if self.subtotal.amount > threshold.amount {
            return None;
        }
        threshold
            .try_subtract(&self.subtotal)
            .and_then(|m| m.try_add(&Money::new(1, m.currency)))
    }
}

/// Pricing for a single line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinePricing {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    /// unit_price * quantity
    pub line_total: Money,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pricing(subtotal: i64, shipping: i64) -> CartPricing {
        CartPricing {
            subtotal: Money::clp(subtotal),
            shipping: Money::clp(shipping),
            total: Money::clp(subtotal + shipping),
            item_count: 1,
            lines: vec![],
        }
    }

    #[test]
    fn test_missing_for_free_shipping() {
        let threshold = Money::clp(50_000);
        assert_eq!(
            pricing(30_000, 5_000).missing_for_free_shipping(&threshold),
            Some(Money::clp(20_001))
        );
        assert_eq!(
            pricing(50_000, 5_000).missing_for_free_shipping(&threshold),
            Some(Money::clp(1))
        );
        assert_eq!(pricing(50_001, 0).missing_for_free_shipping(&threshold), None);
    }

    #[test]
    fn test_has_free_shipping() {
        assert!(pricing(60_000, 0).has_free_shipping());
        assert!(!pricing(10_000, 5_000).has_free_shipping());
    }
}
