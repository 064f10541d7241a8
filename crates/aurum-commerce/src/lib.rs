//! Storefront domain types and logic for Aurum.
//!
//! - **Catalog**: products, categories, collections and admin drafts
//! - **Cart**: line items keyed by product, pricing
//! - **Checkout**: address/payment/summary flow, shipping policy, orders
//! - **Search**: text search, filters, sorting, pagination
//! - **Customers & contact**: accounts, roles, registration, contact messages
//! - **Stats**: back-office dashboard figures
//!
//! # Example
//!
//! ```rust,ignore
//! use aurum_commerce::prelude::*;
//!
//! let ring = Product::new("1", "Anillo Luna", Money::clp(45990));
//!
//! let mut cart = Cart::new();
//! cart.add(&ring, 2)?;
//!
//! let pricing = cart.calculate_pricing(&ShippingPolicy::default())?;
//! println!("Total: {}", pricing.total); // $91.980
//! ```

pub mod error;
pub mod ids;
pub mod money;
pub mod validation;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod contact;
pub mod customer;
pub mod search;
pub mod stats;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};
pub use validation::{FieldError, FieldErrors};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};
    pub use crate::validation::FieldErrors;

    // Catalog
    pub use crate::catalog::{Category, Collection, Product, ProductDraft, TaxonomyDraft};

    // Cart
    pub use crate::cart::{Cart, CartItem, CartPricing, LinePricing};

    // Checkout
    pub use crate::checkout::{
        Address, CheckoutFlow, CheckoutStep, NewOrder, Order, OrderConfirmation, OrderItem,
        OrderStatus, PaymentDetails, PaymentMethod, PaymentSummary, ShippingAddress,
        ShippingPolicy,
    };

    // Search
    pub use crate::search::{Page, Pagination, SearchQuery, SortOption};

    // Accounts
    pub use crate::contact::{ContactForm, ContactMessage};
    pub use crate::customer::{Customer, CustomerUpdate, RegistrationForm, Role};

    pub use crate::stats::{CategoryShare, DashboardStats};
}
