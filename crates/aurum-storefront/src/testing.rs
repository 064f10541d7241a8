//! In-memory backends for unit tests.

use crate::ports::{AuthBackend, CartBackend, CatalogSource};
use async_trait::async_trait;
use aurum_api::ApiError;
use aurum_auth::{AuthToken, Credentials, LoginResponse};
use aurum_commerce::cart::{Cart, CartItem};
use aurum_commerce::catalog::{Category, Collection, Product};
use aurum_commerce::customer::{Customer, RegistrationForm, Role};
use aurum_commerce::{CustomerId, ProductId};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

fn unavailable(action: &str) -> ApiError {
    ApiError::Status {
        status: 503,
        action: action.to_string(),
        detail: None,
    }
}

fn rejected(action: &str) -> ApiError {
    ApiError::Status {
        status: 422,
        action: action.to_string(),
        detail: None,
    }
}

#[derive(Default)]
struct CartState {
    carts: HashMap<CustomerId, Cart>,
    submitted: Vec<String>,
    rejected: HashSet<ProductId>,
    down: bool,
    calls: usize,
}

#[derive(Default)]
pub(crate) struct FakeCart {
    state: Mutex<CartState>,
}

impl FakeCart {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut CartState) -> T) -> T {
        let mut guard = self.state.lock().unwrap();
        f(&mut guard)
    }

    pub fn seed(&self, customer: &CustomerId, items: Vec<CartItem>) {
        self.with_state(|s| s.carts.insert(customer.clone(), Cart::from_items(items)));
    }

    pub fn reject_product(&self, id: &str) {
        self.with_state(|s| s.rejected.insert(ProductId::new(id)));
    }

    pub fn set_down(&self, down: bool) {
        self.with_state(|s| s.down = down);
    }

    pub fn calls(&self) -> usize {
        self.with_state(|s| s.calls)
    }

    pub fn submitted(&self) -> Vec<String> {
        self.with_state(|s| s.submitted.clone())
    }

    pub fn remote_quantity(&self, customer: &CustomerId, product: &ProductId) -> i64 {
        self.with_state(|s| s.carts.get(customer).map_or(0, |c| c.quantity_of(product)))
    }

    fn call<T>(
        &self,
        action: &str,
        f: impl FnOnce(&mut CartState) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        self.with_state(|s| {
            s.calls += 1;
            if s.down {
                return Err(unavailable(action));
            }
            f(s)
        })
    }
}

#[async_trait]
impl CartBackend for FakeCart {
    async fn fetch_cart(&self, customer: &CustomerId) -> Result<Cart, ApiError> {
        self.call("obtener el carrito", |s| {
            Ok(s.carts.get(customer).cloned().unwrap_or_default())
        })
    }

    async fn add_item(&self, customer: &CustomerId, item: &CartItem) -> Result<(), ApiError> {
        self.call("agregar al carrito", |s| {
            if s.rejected.contains(&item.product_id) {
                return Err(rejected("agregar al carrito"));
            }
            s.carts
                .entry(customer.clone())
                .or_default()
                .add_item(item.clone())
                .map_err(|_| rejected("agregar al carrito"))?;
            s.submitted.push(item.product_id.to_string());
            Ok(())
        })
    }

    async fn update_quantity(
        &self,
        customer: &CustomerId,
        product: &ProductId,
        quantity: i64,
    ) -> Result<(), ApiError> {
        self.call("actualizar el carrito", |s| {
            s.carts
                .entry(customer.clone())
                .or_default()
                .set_quantity(product, quantity)
                .map(|_| ())
                .map_err(|_| rejected("actualizar el carrito"))
        })
    }

    async fn remove_item(&self, customer: &CustomerId, product: &ProductId) -> Result<(), ApiError> {
        self.call("quitar del carrito", |s| {
            s.carts.entry(customer.clone()).or_default().remove(product);
            Ok(())
        })
    }

    async fn clear_cart(&self, customer: &CustomerId) -> Result<(), ApiError> {
        self.call("vaciar el carrito", |s| {
            s.carts.remove(customer);
            Ok(())
        })
    }
}

#[derive(Default)]
struct AuthState {
    token: Option<String>,
    customer: Option<Customer>,
    revoked: bool,
}

/// Accepts any email with the password `secreto`; emails starting with
/// `admin` get the admin role.
#[derive(Default)]
pub(crate) struct FakeAuth {
    state: Mutex<AuthState>,
    calls: AtomicUsize,
}

impl FakeAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<String> {
        self.state.lock().unwrap().token.clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn revoke(&self) {
        self.state.lock().unwrap().revoked = true;
    }

    fn respond(&self, name: &str, email: &str) -> LoginResponse {
        let customer = Customer {
            id: CustomerId::new("1"),
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            role: if email.starts_with("admin") {
                Role::Admin
            } else {
                Role::Customer
            },
            created_at: None,
        };
        self.state.lock().unwrap().customer = Some(customer.clone());
        LoginResponse {
            token: format!("token-{email}"),
            customer,
        }
    }
}

#[async_trait]
impl AuthBackend for FakeAuth {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if credentials.password != "secreto" {
            return Err(ApiError::Unauthorized {
                action: "iniciar sesión".to_string(),
            });
        }
        let name = credentials.email.split('@').next().unwrap_or_default().to_string();
        Ok(self.respond(&name, &credentials.email))
    }

    async fn register(&self, form: &RegistrationForm) -> Result<LoginResponse, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.respond(&form.name, &form.email))
    }

    async fn current_customer(&self) -> Result<Customer, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        match (&state.customer, state.revoked) {
            (Some(customer), false) => Ok(customer.clone()),
            _ => Err(ApiError::Unauthorized {
                action: "obtener la sesión".to_string(),
            }),
        }
    }

    fn install_token(&self, token: Option<AuthToken>) {
        self.state.lock().unwrap().token = token.map(|t| t.value);
    }
}

/// Serves a fixed catalog and counts fetches.
#[derive(Default)]
pub(crate) struct FakeCatalog {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub collections: Vec<Collection>,
    fetches: AtomicUsize,
    down: std::sync::atomic::AtomicBool,
}

impl FakeCatalog {
    pub fn new(products: Vec<Product>, categories: Vec<Category>, collections: Vec<Collection>) -> Self {
        Self {
            products,
            categories,
            collections,
            ..Default::default()
        }
    }

    /// Number of full catalog loads (product list requests).
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn check(&self, action: &str) -> Result<(), ApiError> {
        if self.down.load(Ordering::SeqCst) {
            Err(unavailable(action))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn products(&self) -> Result<Vec<Product>, ApiError> {
        self.check("obtener productos")?;
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.products.clone())
    }

    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.check("obtener categorías")?;
        Ok(self.categories.clone())
    }

    async fn collections(&self) -> Result<Vec<Collection>, ApiError> {
        self.check("obtener colecciones")?;
        Ok(self.collections.clone())
    }
}
