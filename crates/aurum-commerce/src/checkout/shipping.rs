//! Shipping cost policy.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Subtotal above which shipping is free, in pesos.
pub const DEFAULT_FREE_SHIPPING_THRESHOLD: i64 = 50_000;

/// Flat shipping rate, in pesos.
pub const DEFAULT_FLAT_SHIPPING_RATE: i64 = 5_000;

/// Flat-rate shipping with a free-shipping threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingPolicy {
    /// Subtotals strictly above this ship for free.
    pub free_threshold: Money,
    /// Cost charged otherwise.
    pub flat_rate: Money,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            free_threshold: Money::clp(DEFAULT_FREE_SHIPPING_THRESHOLD),
            flat_rate: Money::clp(DEFAULT_FLAT_SHIPPING_RATE),
        }
    }
}

impl ShippingPolicy {
    pub fn new(free_threshold: Money, flat_rate: Money) -> Self {
        Self {
            free_threshold,
            flat_rate,
        }
    }

    /// Shipping cost for a subtotal.
    ///
    /// An empty cart (subtotal 0) is still charged the flat rate.
    pub fn cost_for(&self, subtotal: &Money) -> Money {
        if subtotal.amount > self.free_threshold.amount {
            Money::zero(self.flat_rate.currency)
        } else {
            self.flat_rate
        }
    }

    pub fn qualifies_for_free_shipping(&self, subtotal: &Money) -> bool {
        self.cost_for(subtotal).is_zero()
    }
}
