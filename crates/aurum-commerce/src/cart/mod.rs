//! Shopping cart module.
//!
//! Contains the cart, its line items and the pricing breakdown.

mod cart;
mod pricing;

pub use cart::{Cart, CartItem, MAX_QUANTITY_PER_ITEM};
pub use pricing::{CartPricing, LinePricing};
