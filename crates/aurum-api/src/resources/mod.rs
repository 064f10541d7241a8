//! One handle per REST resource.
//!
//! Handles borrow the [`ApiClient`](crate::ApiClient) and are created
//! through its accessor methods, e.g. `client.products().list()`.

mod addresses;
mod auth;
mod carts;
mod categories;
mod collections;
mod contacts;
mod customers;
mod orders;
mod products;

pub use addresses::Addresses;
pub use auth::AuthApi;
pub use carts::{CartLine, Carts};
pub use categories::Categories;
pub use collections::Collections;
pub use contacts::Contacts;
pub use customers::Customers;
pub use orders::Orders;
pub use products::Products;

use crate::ApiClient;

impl ApiClient {
    pub fn products(&self) -> Products<'_> {
        Products::new(self)
    }

    pub fn categories(&self) -> Categories<'_> {
        Categories::new(self)
    }

    pub fn collections(&self) -> Collections<'_> {
        Collections::new(self)
    }

    pub fn orders(&self) -> Orders<'_> {
        Orders::new(self)
    }

    pub fn addresses(&self) -> Addresses<'_> {
        Addresses::new(self)
    }

    pub fn customers(&self) -> Customers<'_> {
        Customers::new(self)
    }

    pub fn contacts(&self) -> Contacts<'_> {
        Contacts::new(self)
    }

    pub fn carts(&self) -> Carts<'_> {
        Carts::new(self)
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }
}
