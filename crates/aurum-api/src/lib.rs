//! REST client for the Aurum store backend.
//!
//! [`ApiClient`] wraps `reqwest` with the store's conventions: a base URL,
//! an optional bearer token shared across clones, retries for idempotent
//! reads, and Spanish error messages naming the failed action.
//!
//! # Example
//!
//! ```rust,ignore
//! use aurum_api::{ApiClient, ApiConfig};
//!
//! let client = ApiClient::new(ApiConfig::new("http://localhost:3000/api"))?;
//! let products = client.products().list().await?;
//! ```

mod client;
mod error;
pub mod resources;
mod retry;

pub use client::{ApiClient, ApiConfig, DEFAULT_TIMEOUT};
pub use error::ApiError;
pub use resources::CartLine;
pub use retry::{BackoffStrategy, RetryPolicy};
