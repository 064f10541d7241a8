//! Cart and line item types.

use crate::cart::{CartPricing, LinePricing};
use crate::catalog::Product;
use crate::checkout::ShippingPolicy;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{self, Currency, Money};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 99;

/// A shopping cart.
///
/// Line items are keyed by product id: a product appears at most once and
/// its quantity is always at least 1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Cart {
    /// Items in the cart.
    #[serde(default)]
    pub items: Vec<CartItem>,
    /// Unix timestamp of last update.
    #[serde(default)]
    pub updated_at: i64,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from backend lines, folding duplicates together.
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.quantity > 0 {
                cart.merge_line(item);
            }
        }
        cart
    }

    /// Add a product to the cart.
    ///
    /// Adding a product that is already present increments its quantity.
    pub fn add(&mut self, product: &Product, quantity: i64) -> Result<i64, CommerceError> {
        if !product.active {
            return Err(CommerceError::OutOfStock(product.name.clone()));
        }
        self.add_item(CartItem::from_product(product, quantity))
    }

    /// Add a line item, merging with an existing line for the same product.
    ///
    /// Returns the resulting quantity for that product.
    pub fn add_item(&mut self, item: CartItem) -> Result<i64, CommerceError> {
        if item.quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(item.quantity));
        }

        if let Some(existing) = self.get_mut(&item.product_id) {
            let new_quantity = existing
                .quantity
                .checked_add(item.quantity)
                .ok_or(CommerceError::Overflow)?;
            if new_quantity > MAX_QUANTITY_PER_ITEM {
                return Err(CommerceError::QuantityExceedsLimit(
                    new_quantity,
                    MAX_QUANTITY_PER_ITEM,
                ));
            }
            existing.quantity = new_quantity;
            self.touch();
            return Ok(new_quantity);
        }

        if item.quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                item.quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        let quantity = item.quantity;
        self.items.push(item);
        self.touch();
        Ok(quantity)
    }

    /// Decrease a product's quantity by one.
    ///
    /// Returns the remaining quantity, or `None` when the line was removed.
    pub fn decrease(&mut self, product_id: &ProductId) -> Result<Option<i64>, CommerceError> {
        let item = self
            .get_mut(product_id)
            .ok_or_else(|| CommerceError::ItemNotInCart(product_id.to_string()))?;

        if item.quantity <= 1 {
            self.remove(product_id);
            return Ok(None);
        }

        item.quantity -= 1;
        let remaining = item.quantity;
        self.touch();
        Ok(Some(remaining))
    }

    /// Set an exact quantity. Zero or less removes the item.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Ok(self.remove(product_id));
        }
        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        match self.get_mut(product_id) {
            Some(item) => {
                item.quantity = quantity;
                self.touch();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a product from the cart.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.product_id != product_id);
        let removed = self.items.len() < len_before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.touch();
    }

    /// Merge another cart into this one (e.g., a guest cart on login).
    ///
    /// Quantities for the same product are summed and capped at
    /// `MAX_QUANTITY_PER_ITEM`.
    pub fn merge(&mut self, other: Cart) {
        for item in other.items {
            self.merge_line(item);
        }
        self.touch();
    }

    fn merge_line(&mut self, item: CartItem) {
        if let Some(existing) = self.get_mut(&item.product_id) {
            existing.quantity = existing
                .quantity
                .saturating_add(item.quantity)
                .min(MAX_QUANTITY_PER_ITEM);
        } else {
            let mut item = item;
            item.quantity = item.quantity.min(MAX_QUANTITY_PER_ITEM);
            self.items.push(item);
        }
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Number of distinct products.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.product_id == product_id)
    }

    pub fn quantity_of(&self, product_id: &ProductId) -> i64 {
        self.get(product_id).map(|i| i.quantity).unwrap_or(0)
    }

    fn get_mut(&mut self, product_id: &ProductId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|i| &i.product_id == product_id)
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        let mut subtotal = Money::zero(Currency::CLP);
        for item in &self.items {
            let line = item.line_total()?;
            subtotal = subtotal
                .try_add(&line)
                .ok_or_else(|| CommerceError::CurrencyMismatch {
                    expected: subtotal.currency.code().to_string(),
                    got: line.currency.code().to_string(),
                })?;
        }
        Ok(subtotal)
    }

    /// Calculate subtotal, shipping and total.
    pub fn calculate_pricing(&self, policy: &ShippingPolicy) -> Result<CartPricing, CommerceError> {
        let lines = self
            .items
            .iter()
            .map(|item| {
                Ok(LinePricing {
                    product_id: item.product_id.clone(),
                    name: item.name.clone(),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    line_total: item.line_total()?,
                })
            })
            .collect::<Result<Vec<_>, CommerceError>>()?;

        let subtotal = self.subtotal()?;
        let shipping = policy.cost_for(&subtotal);
        let total = subtotal.try_add(&shipping).ok_or(CommerceError::Overflow)?;

        Ok(CartPricing {
            subtotal,
            shipping,
            total,
            item_count: self.item_count(),
            lines,
        })
    }

    fn touch(&mut self) {
        self.updated_at = current_timestamp();
    }
}

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Product being purchased.
    pub product_id: ProductId,
    /// Product name (denormalized for display).
    #[serde(default)]
    pub name: String,
    /// Quantity, always at least 1 while in a cart.
    pub quantity: i64,
    /// Unit price in pesos.
    #[serde(rename = "price", with = "money::as_clp")]
    pub unit_price: Money,
    /// Product image (denormalized for display).
    #[serde(default)]
    pub image_url: Option<String>,
}

impl CartItem {
    pub fn new(
        product_id: impl Into<ProductId>,
        name: impl Into<String>,
        quantity: i64,
        unit_price: Money,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            quantity,
            unit_price,
            image_url: None,
        }
    }

    pub fn from_product(product: &Product, quantity: i64) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            quantity,
            unit_price: product.price,
            image_url: product.image_url.clone(),
        }
    }

    /// unit_price * quantity
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        self.unit_price
            .try_multiply(self.quantity)
            .ok_or(CommerceError::Overflow)
    }
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
