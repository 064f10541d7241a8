//! Local and session storage for the Aurum storefront client.
//!
//! A [`Cache`] wraps a [`KeyValueStore`] and (de)serializes values as JSON.
//! Two stores are provided: [`MemoryStore`] for session-scoped data such as
//! the product listing cache, and [`FileStore`] for data that must survive
//! restarts such as the guest cart and the auth session.
//!
//! # Example
//!
//! ```rust,ignore
//! use aurum_cache::{cache_key, Cache};
//!
//! let local = Cache::open_file("/home/ana/.aurum/local.json")?;
//!
//! // Store a value
//! local.set("cart:guest", &cart)?;
//!
//! // Retrieve a value
//! let cart: Option<Cart> = local.get("cart:guest")?;
//!
//! // Namespaced keys
//! let key = cache_key!("catalog", "category", category_id);
//! ```

mod error;
mod expiring;
mod kv;
mod store;

pub use error::CacheError;
pub use expiring::Expiring;
pub use kv::Cache;
pub use store::{FileStore, KeyValueStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{cache_key, Cache, CacheError, Expiring, KeyValueStore};
}
