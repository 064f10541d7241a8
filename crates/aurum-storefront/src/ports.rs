//! Backend seams used by the state stores.
//!
//! The stores talk to these traits rather than to [`ApiClient`] directly so
//! they can run against in-memory fakes in tests.

use async_trait::async_trait;
use aurum_api::{ApiClient, ApiError, CartLine};
use aurum_auth::{AuthToken, Credentials, LoginResponse};
use aurum_commerce::cart::{Cart, CartItem};
use aurum_commerce::catalog::{Category, Collection, Product};
use aurum_commerce::customer::{Customer, RegistrationForm};
use aurum_commerce::{CustomerId, ProductId};

/// Server-side cart of a signed-in customer.
#[async_trait]
pub trait CartBackend: Send + Sync {
    async fn fetch_cart(&self, customer: &CustomerId) -> Result<Cart, ApiError>;

    /// Add `item.quantity` units of the item's product.
    async fn add_item(&self, customer: &CustomerId, item: &CartItem) -> Result<(), ApiError>;

    async fn update_quantity(
        &self,
        customer: &CustomerId,
        product: &ProductId,
        quantity: i64,
    ) -> Result<(), ApiError>;

    async fn remove_item(&self, customer: &CustomerId, product: &ProductId) -> Result<(), ApiError>;

    async fn clear_cart(&self, customer: &CustomerId) -> Result<(), ApiError>;
}

/// Account endpoints plus the client's bearer token.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;

    async fn register(&self, form: &RegistrationForm) -> Result<LoginResponse, ApiError>;

    async fn current_customer(&self) -> Result<Customer, ApiError>;

    /// Install or remove the token sent with later requests.
    fn install_token(&self, token: Option<AuthToken>);
}

/// Read side of the catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn products(&self) -> Result<Vec<Product>, ApiError>;

    async fn categories(&self) -> Result<Vec<Category>, ApiError>;

    async fn collections(&self) -> Result<Vec<Collection>, ApiError>;
}

#[async_trait]
impl CartBackend for ApiClient {
    async fn fetch_cart(&self, customer: &CustomerId) -> Result<Cart, ApiError> {
        self.carts().get(customer).await
    }

    async fn add_item(&self, customer: &CustomerId, item: &CartItem) -> Result<(), ApiError> {
        self.carts().add_item(customer, &CartLine::from(item)).await
    }

    async fn update_quantity(
        &self,
        customer: &CustomerId,
        product: &ProductId,
        quantity: i64,
    ) -> Result<(), ApiError> {
        self.carts().update_item(customer, product, quantity).await
    }

    async fn remove_item(&self, customer: &CustomerId, product: &ProductId) -> Result<(), ApiError> {
        self.carts().remove_item(customer, product).await
    }

    async fn clear_cart(&self, customer: &CustomerId) -> Result<(), ApiError> {
        self.carts().clear(customer).await
    }
}

#[async_trait]
impl AuthBackend for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.auth().login(credentials).await
    }

    async fn register(&self, form: &RegistrationForm) -> Result<LoginResponse, ApiError> {
        self.auth().register(form).await
    }

    async fn current_customer(&self) -> Result<Customer, ApiError> {
        self.auth().me().await
    }

    fn install_token(&self, token: Option<AuthToken>) {
        self.set_token(token);
    }
}

#[async_trait]
impl CatalogSource for ApiClient {
    async fn products(&self) -> Result<Vec<Product>, ApiError> {
        ApiClient::products(self).list().await
    }

    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        ApiClient::categories(self).list().await
    }

    async fn collections(&self) -> Result<Vec<Collection>, ApiError> {
        ApiClient::collections(self).list().await
    }
}
