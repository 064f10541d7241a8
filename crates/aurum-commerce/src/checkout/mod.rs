//! Checkout module.
//!
//! Contains the three-step checkout flow, addresses, payment, shipping
//! policy and orders.

mod address;
mod flow;
mod order;
mod payment;
mod shipping;

pub use address::{Address, ShippingAddress};
pub use flow::{CheckoutFlow, CheckoutStep};
pub use order::{
    add_business_days, generate_order_number, NewOrder, Order, OrderConfirmation, OrderItem,
    OrderStatus, DELIVERY_BUSINESS_DAYS,
};
pub use payment::{PaymentDetails, PaymentMethod, PaymentSummary};
pub use shipping::{ShippingPolicy, DEFAULT_FLAT_SHIPPING_RATE, DEFAULT_FREE_SHIPPING_THRESHOLD};
