//! Payload shaping and validation in front of the API client.
//!
//! Services never send a payload the API would reject on form grounds:
//! drafts are normalized and validated first, and the resulting
//! [`FieldErrors`](aurum_commerce::FieldErrors) reach the caller as
//! [`StorefrontError::Validation`](crate::StorefrontError::Validation).

mod addresses;
mod contacts;
mod customers;
mod dashboard;
mod orders;
mod products;
mod taxonomy;

pub use addresses::AddressService;
pub use contacts::ContactService;
pub use customers::CustomerService;
pub use dashboard::DashboardService;
pub use orders::{filter_by_status, OrderService};
pub use products::{prepare_product, ProductService};
pub use taxonomy::{prepare_taxonomy, CategoryService, CollectionService};

use crate::error::Result;
use aurum_auth::{AuthError, User};
use aurum_commerce::customer::Role;

/// Back-office operations need an admin.
pub(crate) fn require_admin(acting: &User) -> Result<()> {
    if !acting.is_authenticated() {
        return Err(AuthError::NotAuthenticated.into());
    }
    if !acting.has_permission(Role::Admin) {
        return Err(AuthError::InsufficientPermissions.into());
    }
    Ok(())
}
