//! Back-office dashboard figures.

use crate::catalog::{Category, Collection, Product};
use crate::contact::{unread_count, ContactMessage};
use crate::customer::Customer;
use crate::error::CommerceError;
use crate::ids::CategoryId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Label for products without a category.
pub const UNCATEGORIZED: &str = "Sin categoría";

/// Share of the catalog held by one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryShare {
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub product_count: usize,
    /// Bar width; the shares of a non-empty catalog add up to 100.
    pub percent: u8,
}

/// Everything the admin dashboard shows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    pub product_count: usize,
    pub category_count: usize,
    pub collection_count: usize,
    pub customer_count: usize,
    pub unread_messages: usize,
    /// Sum of price * stock.
    pub inventory_value: Money,
    /// Products with stock at or below the low-stock threshold.
    pub low_stock: Vec<Product>,
    pub by_category: Vec<CategoryShare>,
}

impl DashboardStats {
    pub fn compute(
        products: &[Product],
        categories: &[Category],
        collections: &[Collection],
        customers: &[Customer],
        messages: &[ContactMessage],
    ) -> Result<Self, CommerceError> {
        let mut inventory_value = Money::zero(Currency::CLP);
        for product in products {
            let value = product.inventory_value().ok_or(CommerceError::Overflow)?;
            inventory_value = inventory_value
                .try_add(&value)
                .ok_or(CommerceError::Overflow)?;
        }

        let mut low_stock: Vec<Product> =
            products.iter().filter(|p| p.is_low_stock()).cloned().collect();
        low_stock.sort_by_key(|p| p.stock);

        Ok(Self {
            product_count: products.len(),
            category_count: categories.len(),
            collection_count: collections.len(),
            customer_count: customers.len(),
            unread_messages: unread_count(messages),
            inventory_value,
            low_stock,
            by_category: category_distribution(products, categories),
        })
    }
}

/// Product count per category with integer percentages.
///
/// Percentages use the largest remainder method so that they add up to
/// exactly 100 whenever there is at least one product. Categories without
/// products are listed with 0; a category id listed twice is counted once.
pub fn category_distribution(products: &[Product], categories: &[Category]) -> Vec<CategoryShare> {
    let mut seen = HashSet::new();
    let mut shares: Vec<CategoryShare> = categories
        .iter()
        .filter(|c| seen.insert(&c.id))
        .map(|c| CategoryShare {
            category_id: Some(c.id.clone()),
            name: c.name.clone(),
            product_count: products.iter().filter(|p| p.in_category(&c.id)).count(),
            percent: 0,
        })
        .collect();

    let orphans = products
        .iter()
        .filter(|p| match &p.category_id {
            None => true,
            Some(id) => !categories.iter().any(|c| &c.id == id),
        })
        .count();
    if orphans > 0 {
        shares.push(CategoryShare {
            category_id: None,
            name: UNCATEGORIZED.to_string(),
            product_count: orphans,
            percent: 0,
        });
    }

    let total: usize = shares.iter().map(|s| s.product_count).sum();
    if total == 0 {
        return shares;
    }

    let mut remainders: Vec<(usize, usize)> = Vec::with_capacity(shares.len());
    let mut assigned = 0usize;
    for (i, share) in shares.iter_mut().enumerate() {
        let scaled = share.product_count * 100;
        share.percent = (scaled / total) as u8;
        assigned += share.percent as usize;
        remainders.push((i, scaled % total));
    }

    // Hand out the leftover points to the largest remainders, first come first.
    remainders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    for (i, _) in remainders.into_iter().take(100usize.saturating_sub(assigned)) {
        shares[i].percent += 1;
    }

    shares
}
