//! Product catalog module.
//!
//! Contains types for products, categories and collections.

mod category;
mod collection;
mod product;

pub use category::{Category, TaxonomyDraft};
pub use collection::Collection;
pub use product::{Product, ProductDraft, LOW_STOCK_THRESHOLD};
