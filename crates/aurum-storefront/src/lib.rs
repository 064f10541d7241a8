//! Aurum storefront application layer.
//!
//! Sits between the presentation layer (the `aurum` CLI) and the REST API:
//!
//! - [`services`]: form shaping and validation in front of each resource
//! - [`state`]: session, cart (with guest reconciliation), catalog cache and
//!   debounced search
//! - [`checkout`]: the three-step checkout wizard
//! - [`routes`]: page table and access guards
//!
//! [`Storefront`] wires all of them together from an [`AurumConfig`].

pub mod checkout;
pub mod config;
mod error;
pub mod logging;
pub mod ports;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use checkout::CheckoutWizard;
pub use config::AurumConfig;
pub use error::{Result, StorefrontError};
pub use routes::{resolve, Access, AdminSection, Resolution, Route};

use aurum_api::ApiClient;
use aurum_auth::{AuthError, Credentials, User};
use aurum_cache::Cache;
use aurum_commerce::customer::RegistrationForm;
use services::{
    AddressService, CategoryService, CollectionService, ContactService, CustomerService,
    DashboardService, OrderService, ProductService,
};
use state::{AuthStore, CartStore, CatalogStore, ReconcileReport, SearchBox};
use std::sync::Arc;

/// The storefront with its stores, built from configuration.
pub struct Storefront {
    pub config: AurumConfig,
    pub api: ApiClient,
    pub auth: AuthStore,
    pub cart: CartStore,
    pub catalog: CatalogStore,
    pub search: SearchBox,
}

impl Storefront {
    /// Open the storefront with file-backed local and session storage under
    /// the configured storage directory.
    pub fn open(config: AurumConfig) -> Result<Self> {
        let api = ApiClient::new(config.api_config())?;
        let dir = config.storage_dir();
        let local = Cache::open_file(config.local_store_path())?;
        let session = Cache::open_file(dir.join("session.json"))?;
        Ok(Self::with_storage(config, api, local, session))
    }

    /// Build over explicit storage, e.g. in-memory caches.
    pub fn with_storage(config: AurumConfig, api: ApiClient, local: Cache, session: Cache) -> Self {
        let backend = Arc::new(api.clone());
        let auth = AuthStore::new(backend.clone(), local.clone());
        let cart = CartStore::new(backend.clone(), local, config.shipping_policy());
        let catalog = CatalogStore::new(backend, session, config.catalog_ttl());
        let search = SearchBox::new(config.search_debounce(), config.shop.page_size);
        Self {
            config,
            api,
            auth,
            cart,
            catalog,
            search,
        }
    }

    /// Restore a saved session and, when there is one, switch the cart to
    /// the backend, replaying changes queued by an earlier offline run.
    pub async fn start(&mut self) -> Result<Option<ReconcileReport>> {
        let customer = self
            .auth
            .restore()
            .and_then(|s| s.user.customer_id().cloned());
        match customer {
            Some(customer) => Ok(Some(self.cart.resume(&customer).await?)),
            None => Ok(None),
        }
    }

    pub async fn login(&mut self, credentials: Credentials) -> Result<ReconcileReport> {
        let customer = self.auth.login(credentials).await?.user.customer_id().cloned();
        self.after_sign_in(customer).await
    }

    pub async fn register(&mut self, form: RegistrationForm) -> Result<ReconcileReport> {
        let customer = self.auth.register(form).await?.user.customer_id().cloned();
        self.after_sign_in(customer).await
    }

    async fn after_sign_in(
        &mut self,
        customer: Option<aurum_commerce::CustomerId>,
    ) -> Result<ReconcileReport> {
        let customer = customer.ok_or(AuthError::NotAuthenticated)?;
        self.cart.on_login(&customer).await
    }

    /// Sign out, keeping the cart in local storage.
    pub fn logout(&mut self) -> Result<()> {
        self.cart.on_logout()?;
        self.auth.logout();
        Ok(())
    }

    pub fn user(&self) -> User {
        self.auth.user()
    }

    /// Resolve a page path for the current user.
    pub fn navigate(&self, path: &str) -> Resolution {
        resolve(path, &self.auth.user())
    }

    /// Start checkout; requires a signed-in user and a non-empty cart.
    pub fn begin_checkout(&self) -> Result<CheckoutWizard> {
        if !self.auth.is_authenticated() {
            return Err(AuthError::NotAuthenticated.into());
        }
        CheckoutWizard::start(self.cart.cart(), self.config.shipping_policy())
    }

    /// Forget the cached listing after a back-office change.
    pub fn catalog_changed(&mut self) -> Result<()> {
        self.catalog.invalidate()
    }

    pub fn products(&self) -> ProductService {
        ProductService::new(self.api.clone())
    }

    pub fn categories(&self) -> CategoryService {
        CategoryService::new(self.api.clone())
    }

    pub fn collections(&self) -> CollectionService {
        CollectionService::new(self.api.clone())
    }

    pub fn customers(&self) -> CustomerService {
        CustomerService::new(self.api.clone())
    }

    pub fn contacts(&self) -> ContactService {
        ContactService::new(self.api.clone())
    }

    pub fn addresses(&self) -> AddressService {
        AddressService::new(self.api.clone())
    }

    pub fn orders(&self) -> OrderService {
        OrderService::new(self.api.clone())
    }

    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(self.api.clone())
    }
}
