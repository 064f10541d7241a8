//! Order types.

use crate::cart::{Cart, CartItem, CartPricing};
use crate::checkout::{PaymentSummary, ShippingAddress};
use crate::ids::{CustomerId, OrderId, ProductId};
use crate::money::{self, Money};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Business days between confirmation and estimated delivery.
pub const DELIVERY_BUSINESS_DAYS: u32 = 5;

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, awaiting payment confirmation.
    #[default]
    Pending,
    /// Payment received.
    Paid,
    /// Handed to the courier.
    Shipped,
    /// Delivered to the customer.
    Delivered,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pendiente",
            OrderStatus::Paid => "Pagado",
            OrderStatus::Shipped => "Enviado",
            OrderStatus::Delivered => "Entregado",
            OrderStatus::Cancelled => "Cancelado",
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn all() -> &'static [OrderStatus] {
        &[
            OrderStatus::Pending,
            OrderStatus::Paid,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ]
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::all()
            .iter()
            .copied()
            .find(|status| {
                status.as_str().eq_ignore_ascii_case(s)
                    || status.display_name().eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| format!("Estado de pedido desconocido: {s}"))
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// An order as listed by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(with = "money::as_clp")]
    pub total: Money,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Get total item count.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// A line of an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub product_id: ProductId,
    #[serde(default)]
    pub name: String,
    pub quantity: i64,
    #[serde(rename = "price", with = "money::as_clp")]
    pub unit_price: Money,
}

impl From<&CartItem> for OrderItem {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
        }
    }
}

/// Payload for creating an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewOrder {
    pub customer_id: CustomerId,
    pub items: Vec<OrderItem>,
    #[serde(with = "money::as_clp")]
    pub total: Money,
    pub shipping_address: ShippingAddress,
}

/// Confirmation shown after the summary step.
///
/// Nothing is persisted server-side: the order number and delivery date
/// are generated locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderConfirmation {
    /// `AUR-XXXXXX`
    pub order_number: String,
    pub placed_at: DateTime<Utc>,
    pub estimated_delivery: NaiveDate,
    pub items: Vec<CartItem>,
    pub pricing: CartPricing,
    pub shipping_address: ShippingAddress,
    pub payment: PaymentSummary,
}

impl OrderConfirmation {
    /// Build a simulated confirmation for the given cart.
    pub fn simulate(
        cart: &Cart,
        pricing: CartPricing,
        shipping_address: ShippingAddress,
        payment: PaymentSummary,
        placed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            order_number: generate_order_number(),
            placed_at,
            estimated_delivery: add_business_days(placed_at.date_naive(), DELIVERY_BUSINESS_DAYS),
            items: cart.items.clone(),
            pricing,
            shipping_address,
            payment,
        }
    }

    pub fn item_count(&self) -> i64 {
        self.pricing.item_count
    }

    pub fn to_new_order(&self, customer_id: CustomerId) -> NewOrder {
        NewOrder {
            customer_id,
            items: self.items.iter().map(OrderItem::from).collect(),
            total: self.pricing.total,
            shipping_address: self.shipping_address.clone(),
        }
    }
}

/// Generate a mock order number (`AUR-` followed by six characters).
pub fn generate_order_number() -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("AUR-{suffix}")
}

/// Add business days, skipping Saturdays and Sundays.
pub fn add_business_days(from: NaiveDate, days: u32) -> NaiveDate {
    let mut date = from;
    let mut remaining = days;
    while remaining > 0 {
        date += Duration::days(1);
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            remaining -= 1;
        }
    }
    date
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::{PaymentMethod, ShippingPolicy};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_order_number_format() {
        for _ in 0..50 {
            let number = generate_order_number();
            assert!(number.starts_with("AUR-"));
            assert_eq!(number.len(), 10);
            assert!(number[4..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_business_days_skip_weekend() {
        // Friday + 5 business days = next Friday
        assert_eq!(add_business_days(date(2026, 10, 16), 5), date(2026, 10, 23));
        // Wednesday + 5 = next Wednesday
        assert_eq!(add_business_days(date(2026, 10, 14), 5), date(2026, 10, 21));
        // Saturday + 1 = Monday
        assert_eq!(add_business_days(date(2026, 10, 17), 1), date(2026, 10, 19));
    }

    #[test]
    fn test_order_status_parse_and_display() {
        assert_eq!("shipped".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
        assert_eq!("Pagado".parse::<OrderStatus>().unwrap(), OrderStatus::Paid);
        assert!("lost".parse::<OrderStatus>().is_err());
        assert_eq!(OrderStatus::Cancelled.to_string(), "Cancelado");
        assert!(OrderStatus::Delivered.is_terminal());
    }

    #[test]
    fn test_order_deserialize() {
        let json = r#"{
            "id": 12, "customer_id": 3, "status": "paid", "total": 57980,
            "items": [{"product_id": 1, "name": "Anillo", "quantity": 2, "price": 28990}]
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.item_count(), 2);
        assert_eq!(order.total, Money::clp(57980));
    }

    #[test]
    fn test_simulated_confirmation() {
        let mut cart = Cart::new();
        cart.add_item(CartItem::new("1", "Anillo", 2, Money::clp(28990)))
            .unwrap();
        let pricing = cart.calculate_pricing(&ShippingPolicy::default()).unwrap();
        let placed_at = date(2026, 10, 16).and_hms_opt(12, 0, 0).unwrap().and_utc();

        let confirmation = OrderConfirmation::simulate(
            &cart,
            pricing,
            ShippingAddress::default(),
            PaymentSummary {
                method: PaymentMethod::Transfer,
                last_four: None,
                holder_name: None,
            },
            placed_at,
        );

        assert!(confirmation.order_number.starts_with("AUR-"));
        assert_eq!(confirmation.estimated_delivery, date(2026, 10, 23));
        assert_eq!(confirmation.pricing.total, Money::clp(57980));
        assert_eq!(confirmation.item_count(), 2);

        let order = confirmation.to_new_order(CustomerId::new("3"));
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.total, Money::clp(57980));
    }
}
