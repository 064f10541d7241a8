//! Client-side state: session, cart, catalog cache and search.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod search;

pub use auth::{AuthStore, GUEST_ID_KEY, SESSION_KEY};
pub use cart::{CartMode, CartStore, ReconcileReport, GUEST_CART_KEY, PENDING_CART_KEY};
pub use catalog::{CatalogSnapshot, CatalogStore, CATALOG_KEY, DEFAULT_CATALOG_TTL_SECS};
pub use search::{Debouncer, SearchBox, SearchOutcome, SearchResults, SEARCH_DEBOUNCE};
