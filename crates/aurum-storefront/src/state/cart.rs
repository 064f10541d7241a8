//! Cart state with guest storage and backend reconciliation.
//!
//! Guests keep their cart in local storage under [`GUEST_CART_KEY`]. Once a
//! customer signs in the backend cart becomes the source of truth and the
//! guest items are pushed into it. Any backend failure is absorbed: the
//! change is applied locally and queued under [`PENDING_CART_KEY`], then
//! replayed in order the next time the backend answers.

use crate::error::Result;
use crate::ports::CartBackend;
use aurum_api::ApiError;
use aurum_cache::Cache;
use aurum_commerce::cart::{Cart, CartItem, CartPricing};
use aurum_commerce::catalog::Product;
use aurum_commerce::checkout::ShippingPolicy;
use aurum_commerce::{CustomerId, ProductId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Local storage key of the guest cart.
pub const GUEST_CART_KEY: &str = "cart:guest";

/// Where the cart currently lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartMode {
    Guest,
    Backend(CustomerId),
}

/// Outcome of pushing the guest cart to the backend on sign-in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Guest lines accepted by the backend.
    pub submitted: usize,
    /// Guest lines the backend rejected or never answered for.
    pub failed: usize,
    /// Offline changes from an earlier run sent to the backend.
    pub replayed: usize,
    /// Whether the backend cart was fetched afterwards.
    pub reloaded: bool,
}

/// Local storage key of backend changes that have not reached the API yet.
pub const PENDING_CART_KEY: &str = "cart:pending";

/// A single cart change as the backend receives it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum CartChange {
    Add { item: CartItem },
    Update { product_id: ProductId, quantity: i64 },
    Remove { product_id: ProductId },
    Clear,
}

/// Changes queued while the backend was unreachable, replayed in order.
///
/// `cart` is the local view after the last queued change, shown again when
/// the store is reopened before the backend is back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PendingChanges {
    customer: CustomerId,
    changes: Vec<CartChange>,
    cart: Cart,
}

impl PendingChanges {
    fn new(customer: &CustomerId) -> Self {
        Self {
            customer: customer.clone(),
            changes: Vec::new(),
            cart: Cart::new(),
        }
    }
}

pub struct CartStore {
    backend: Arc<dyn CartBackend>,
    local: Cache,
    policy: ShippingPolicy,
    cart: Cart,
    mode: CartMode,
    offline: bool,
}

impl CartStore {
    /// Start in guest mode with whatever local storage holds.
    pub fn new(backend: Arc<dyn CartBackend>, local: Cache, policy: ShippingPolicy) -> Self {
        let cart = read_guest_cart(&local);
        Self {
            backend,
            local,
            policy,
            cart,
            mode: CartMode::Guest,
            offline: false,
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn mode(&self) -> &CartMode {
        &self.mode
    }

    pub fn policy(&self) -> &ShippingPolicy {
        &self.policy
    }

    /// The backend could not be reached and the cart shown may differ from
    /// the remote one.
    pub fn is_offline(&self) -> bool {
        self.offline
    }

    /// Number of changes waiting to be sent to the backend.
    pub fn pending_changes(&self) -> usize {
        match &self.mode {
            CartMode::Guest => 0,
            CartMode::Backend(customer) => self.pending_for(customer).changes.len(),
        }
    }

    pub fn item_count(&self) -> i64 {
        self.cart.item_count()
    }

    pub fn pricing(&self) -> Result<CartPricing> {
        Ok(self.cart.calculate_pricing(&self.policy)?)
    }

    /// Add units of a product. Returns the resulting quantity.
    pub async fn add(&mut self, product: &Product, quantity: i64) -> Result<i64> {
        let mut next = self.cart.clone();
        let total = next.add(product, quantity)?;
        let change = CartChange::Add {
            item: CartItem::from_product(product, quantity),
        };
        self.commit(next, change).await?;
        Ok(total)
    }

    /// Remove one unit. Returns the remaining quantity, `None` once the line
    /// is gone.
    pub async fn decrease(&mut self, product_id: &ProductId) -> Result<Option<i64>> {
        let mut next = self.cart.clone();
        let remaining = next.decrease(product_id)?;
        let product_id = product_id.clone();
        let change = match remaining {
            Some(quantity) => CartChange::Update { product_id, quantity },
            None => CartChange::Remove { product_id },
        };
        self.commit(next, change).await?;
        Ok(remaining)
    }

    /// Set a line's quantity; zero or less removes it. Returns whether the
    /// product was in the cart.
    pub async fn set_quantity(&mut self, product_id: &ProductId, quantity: i64) -> Result<bool> {
        let mut next = self.cart.clone();
        if !next.set_quantity(product_id, quantity)? {
            return Ok(false);
        }
        let product_id = product_id.clone();
        let change = if quantity <= 0 {
            CartChange::Remove { product_id }
        } else {
            CartChange::Update { product_id, quantity }
        };
        self.commit(next, change).await?;
        Ok(true)
    }

    pub async fn remove(&mut self, product_id: &ProductId) -> Result<bool> {
        let mut next = self.cart.clone();
        if !next.remove(product_id) {
            return Ok(false);
        }
        let change = CartChange::Remove {
            product_id: product_id.clone(),
        };
        self.commit(next, change).await?;
        Ok(true)
    }

    pub async fn clear(&mut self) -> Result<()> {
        let mut next = self.cart.clone();
        next.clear();
        self.commit(next, CartChange::Clear).await
    }

    async fn commit(&mut self, next: Cart, change: CartChange) -> Result<()> {
        self.cart = next;
        let customer = match &self.mode {
            CartMode::Guest => return self.persist_guest(),
            CartMode::Backend(customer) => customer.clone(),
        };

        let was_offline = self.offline;
        let mut pending = self.pending_for(&customer);
        pending.changes.push(change);

        match self.flush(&customer, &mut pending).await {
            Ok(()) if was_offline => self.refresh(&customer).await,
            Ok(()) => {}
            Err(e) => {
                tracing::warn!(
                    customer = %customer,
                    queued = pending.changes.len(),
                    error = %e,
                    "cart backend unavailable, keeping change locally"
                );
                self.offline = true;
            }
        }
        self.save_pending(pending)
    }

    /// Send queued changes in order. A change the backend answers for,
    /// accepted or rejected, leaves the queue; the first unreachable call
    /// stops the flush and keeps the rest queued.
    async fn flush(
        &self,
        customer: &CustomerId,
        pending: &mut PendingChanges,
    ) -> std::result::Result<(), ApiError> {
        while let Some(change) = pending.changes.first() {
            match self.push(customer, change).await {
                Ok(()) => {}
                Err(e) if e.is_unavailable() => return Err(e),
                Err(e) => {
                    tracing::warn!(customer = %customer, change = ?change, error = %e, "backend rejected cart change");
                }
            }
            pending.changes.remove(0);
        }
        Ok(())
    }

    async fn push(&self, customer: &CustomerId, change: &CartChange) -> std::result::Result<(), ApiError> {
        match change {
            CartChange::Add { item } => self.backend.add_item(customer, item).await,
            CartChange::Update {
                product_id,
                quantity,
            } => {
                self.backend
                    .update_quantity(customer, product_id, *quantity)
                    .await
            }
            CartChange::Remove { product_id } => self.backend.remove_item(customer, product_id).await,
            CartChange::Clear => self.backend.clear_cart(customer).await,
        }
    }

    /// Replace the local view with the backend cart, staying offline when
    /// it cannot be read.
    async fn refresh(&mut self, customer: &CustomerId) {
        match self.backend.fetch_cart(customer).await {
            Ok(cart) => {
                self.cart = cart;
                self.offline = false;
            }
            Err(e) => {
                tracing::warn!(customer = %customer, error = %e, "could not load backend cart");
                self.offline = true;
            }
        }
    }

    fn persist_guest(&self) -> Result<()> {
        self.local.set(GUEST_CART_KEY, &self.cart)?;
        Ok(())
    }

    fn pending_for(&self, customer: &CustomerId) -> PendingChanges {
        match self.local.get::<PendingChanges>(PENDING_CART_KEY) {
            Ok(Some(pending)) if &pending.customer == customer => pending,
            Ok(Some(pending)) => {
                tracing::warn!(
                    customer = %pending.customer,
                    dropped = pending.changes.len(),
                    "discarding cart changes queued for another customer"
                );
                PendingChanges::new(customer)
            }
            Ok(None) => PendingChanges::new(customer),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable queued cart changes");
                PendingChanges::new(customer)
            }
        }
    }

    fn save_pending(&self, mut pending: PendingChanges) -> Result<()> {
        if pending.changes.is_empty() {
            self.local.delete(PENDING_CART_KEY)?;
        } else {
            pending.cart = self.cart.clone();
            self.local.set(PENDING_CART_KEY, &pending)?;
        }
        Ok(())
    }

    /// Switch to the customer's backend cart after signing in.
    ///
    /// Every line held in local storage is submitted one by one. Local
    /// storage is cleared once all of them have been attempted, whatever the
    /// outcome, and the cart is then reloaded from the backend.
    pub async fn on_login(&mut self, customer: &CustomerId) -> Result<ReconcileReport> {
        let guest = read_guest_cart(&self.local);
        let mut report = ReconcileReport::default();

        for item in &guest.items {
            match self.backend.add_item(customer, item).await {
                Ok(()) => report.submitted += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        customer = %customer,
                        product = %item.product_id,
                        error = %e,
                        "could not submit guest cart item"
                    );
                }
            }
        }
        self.local.delete(GUEST_CART_KEY)?;

        self.attach(customer, &mut report).await?;
        tracing::info!(
            customer = %customer,
            submitted = report.submitted,
            failed = report.failed,
            replayed = report.replayed,
            reloaded = report.reloaded,
            "cart reconciled"
        );
        Ok(report)
    }

    /// Switch to the backend cart for a restored session. The guest cart is
    /// left alone: it was already merged when the session was opened.
    pub async fn resume(&mut self, customer: &CustomerId) -> Result<ReconcileReport> {
        let mut report = ReconcileReport::default();
        self.attach(customer, &mut report).await?;
        tracing::debug!(
            customer = %customer,
            replayed = report.replayed,
            reloaded = report.reloaded,
            "cart resumed"
        );
        Ok(report)
    }

    /// Replay queued changes, then load the backend cart. While changes
    /// remain queued the last local view is kept instead.
    async fn attach(&mut self, customer: &CustomerId, report: &mut ReconcileReport) -> Result<()> {
        self.mode = CartMode::Backend(customer.clone());
        let mut pending = self.pending_for(customer);
        let queued = pending.changes.len();

        if let Err(e) = self.flush(customer, &mut pending).await {
            tracing::warn!(customer = %customer, error = %e, "could not replay queued cart changes");
        }
        report.replayed = queued - pending.changes.len();

        if pending.changes.is_empty() {
            self.refresh(customer).await;
            report.reloaded = !self.offline;
        } else {
            self.cart = pending.cart.clone();
            self.offline = true;
        }
        self.save_pending(pending)
    }

    /// Return to guest mode, keeping the current cart in local storage.
    pub fn on_logout(&mut self) -> Result<()> {
        if matches!(self.mode, CartMode::Backend(_)) {
            self.persist_guest()?;
            self.local.delete(PENDING_CART_KEY)?;
            tracing::debug!(items = self.cart.item_count(), "backend cart saved locally");
        }
        self.mode = CartMode::Guest;
        self.offline = false;
        Ok(())
    }

    /// Re-read the cart from its current home, sending queued changes first.
    pub async fn reload(&mut self) -> Result<()> {
        let customer = match &self.mode {
            CartMode::Guest => {
                self.cart = read_guest_cart(&self.local);
                return Ok(());
            }
            CartMode::Backend(customer) => customer.clone(),
        };

        let mut pending = self.pending_for(&customer);
        if let Err(e) = self.flush(&customer, &mut pending).await {
            tracing::warn!(customer = %customer, error = %e, "could not replay queued cart changes");
            self.offline = true;
            self.save_pending(pending)?;
            return Err(e.into());
        }
        self.save_pending(pending)?;

        match self.backend.fetch_cart(&customer).await {
            Ok(cart) => {
                self.cart = cart;
                self.offline = false;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(customer = %customer, error = %e, "could not reload backend cart");
                self.offline = true;
                Err(e.into())
            }
        }
    }
}

fn read_guest_cart(local: &Cache) -> Cart {
    match local.get::<Cart>(GUEST_CART_KEY) {
        Ok(Some(cart)) => cart,
        Ok(None) => Cart::new(),
        Err(e) => {
            tracing::warn!(error = %e, "discarding unreadable guest cart");
            Cart::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeCart;
    use aurum_commerce::Money;

    fn product(id: &str, price: i64) -> Product {
        let mut p = Product::new(id, format!("Producto {id}"), Money::clp(price));
        p.stock = 10;
        p
    }

    fn store(local: &Cache, backend: &Arc<FakeCart>) -> CartStore {
        CartStore::new(backend.clone(), local.clone(), ShippingPolicy::default())
    }

    fn customer() -> CustomerId {
        CustomerId::new("7")
    }

    #[tokio::test]
    async fn test_guest_changes_are_persisted() {
        let local = Cache::memory();
        let backend = Arc::new(FakeCart::new());
        let mut cart = store(&local, &backend);

        cart.add(&product("1", 10_000), 2).await.unwrap();
        cart.add(&product("1", 10_000), 1).await.unwrap();
        assert_eq!(cart.cart().unique_item_count(), 1);

        let reopened = store(&local, &backend);
        assert_eq!(reopened.cart().quantity_of(&ProductId::new("1")), 3);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_decrease_past_zero_removes_line() {
        let local = Cache::memory();
        let backend = Arc::new(FakeCart::new());
        let mut cart = store(&local, &backend);
        let id = ProductId::new("1");

        cart.add(&product("1", 10_000), 1).await.unwrap();
        assert_eq!(cart.decrease(&id).await.unwrap(), None);
        assert!(cart.cart().is_empty());
        assert!(cart.decrease(&id).await.is_err());
    }

    #[tokio::test]
    async fn test_login_submits_each_guest_item_then_reloads() {
        let local = Cache::memory();
        let backend = Arc::new(FakeCart::new());
        backend.seed(&customer(), vec![CartItem::new("9", "Collar", 1, Money::clp(30_000))]);

        let mut cart = store(&local, &backend);
        cart.add(&product("1", 10_000), 2).await.unwrap();
        cart.add(&product("2", 5_000), 1).await.unwrap();

        let report = cart.on_login(&customer()).await.unwrap();

        assert_eq!(
            report,
            ReconcileReport {
                submitted: 2,
                failed: 0,
                replayed: 0,
                reloaded: true
            }
        );
        assert_eq!(backend.submitted(), vec!["1".to_string(), "2".to_string()]);
        assert!(!local.exists(GUEST_CART_KEY).unwrap());
        assert_eq!(cart.cart().unique_item_count(), 3);
        assert_eq!(cart.mode(), &CartMode::Backend(customer()));
    }

    #[tokio::test]
    async fn test_login_clears_local_even_when_submissions_fail() {
        let local = Cache::memory();
        let backend = Arc::new(FakeCart::new());
        let mut cart = store(&local, &backend);
        cart.add(&product("1", 10_000), 1).await.unwrap();
        cart.add(&product("2", 10_000), 1).await.unwrap();

        backend.reject_product("1");
        let report = cart.on_login(&customer()).await.unwrap();

        assert_eq!(report.submitted, 1);
        assert_eq!(report.failed, 1);
        assert!(!local.exists(GUEST_CART_KEY).unwrap());
        assert_eq!(cart.cart().quantity_of(&ProductId::new("2")), 1);
    }

    #[tokio::test]
    async fn test_backend_failure_falls_back_to_local() {
        let local = Cache::memory();
        let backend = Arc::new(FakeCart::new());
        let mut cart = store(&local, &backend);
        cart.on_login(&customer()).await.unwrap();

        backend.set_down(true);
        cart.add(&product("3", 20_000), 2).await.unwrap();

        assert!(cart.is_offline());
        assert_eq!(cart.cart().quantity_of(&ProductId::new("3")), 2);
        assert_eq!(cart.pending_changes(), 1);
        assert!(!local.exists(GUEST_CART_KEY).unwrap());
        assert!(local.exists(PENDING_CART_KEY).unwrap());
    }

    #[tokio::test]
    async fn test_offline_change_is_sent_once_backend_recovers() {
        let local = Cache::memory();
        let backend = Arc::new(FakeCart::new());
        let mut cart = store(&local, &backend);
        cart.on_login(&customer()).await.unwrap();
        let id = ProductId::new("3");

        backend.set_down(true);
        cart.add(&product("3", 20_000), 3).await.unwrap();
        backend.set_down(false);
        cart.decrease(&id).await.unwrap();

        assert_eq!(cart.cart().quantity_of(&id), 2);
        assert_eq!(backend.remote_quantity(&customer(), &id), 2);
        assert!(!cart.is_offline());
        assert_eq!(cart.pending_changes(), 0);
        assert!(!local.exists(PENDING_CART_KEY).unwrap());
    }

    #[tokio::test]
    async fn test_offline_change_survives_reload() {
        let local = Cache::memory();
        let backend = Arc::new(FakeCart::new());
        let mut cart = store(&local, &backend);
        cart.on_login(&customer()).await.unwrap();
        let id = ProductId::new("3");

        backend.set_down(true);
        cart.add(&product("3", 20_000), 2).await.unwrap();
        assert!(cart.reload().await.is_err());
        assert_eq!(cart.cart().quantity_of(&id), 2);

        backend.set_down(false);
        cart.reload().await.unwrap();

        assert_eq!(cart.cart().quantity_of(&id), 2);
        assert_eq!(backend.remote_quantity(&customer(), &id), 2);
        assert!(!cart.is_offline());
    }

    #[tokio::test]
    async fn test_rejected_change_does_not_block_the_queue() {
        let local = Cache::memory();
        let backend = Arc::new(FakeCart::new());
        let mut cart = store(&local, &backend);
        cart.on_login(&customer()).await.unwrap();
        backend.reject_product("3");

        cart.add(&product("3", 20_000), 1).await.unwrap();
        cart.add(&product("4", 20_000), 1).await.unwrap();

        assert!(!cart.is_offline());
        assert_eq!(cart.pending_changes(), 0);
        assert_eq!(backend.submitted(), vec!["4".to_string()]);
    }

    #[tokio::test]
    async fn test_resume_after_offline_run_keeps_backend_quantities() {
        let local = Cache::memory();
        let backend = Arc::new(FakeCart::new());
        backend.seed(&customer(), vec![CartItem::new("9", "Collar", 1, Money::clp(30_000))]);
        {
            let mut cart = store(&local, &backend);
            cart.on_login(&customer()).await.unwrap();
            backend.set_down(true);
            cart.add(&product("3", 20_000), 2).await.unwrap();
        }
        backend.set_down(false);

        let mut cart = store(&local, &backend);
        let report = cart.resume(&customer()).await.unwrap();

        assert_eq!(report.submitted, 0);
        assert_eq!(report.replayed, 1);
        assert!(report.reloaded);
        assert_eq!(backend.remote_quantity(&customer(), &ProductId::new("9")), 1);
        assert_eq!(backend.remote_quantity(&customer(), &ProductId::new("3")), 2);
        assert_eq!(cart.cart().unique_item_count(), 2);

        // A second run has nothing left to send.
        let mut again = store(&local, &backend);
        let report = again.resume(&customer()).await.unwrap();
        assert_eq!(report.replayed, 0);
        assert_eq!(backend.remote_quantity(&customer(), &ProductId::new("9")), 1);
    }

    #[tokio::test]
    async fn test_reopened_while_offline_shows_queued_cart() {
        let local = Cache::memory();
        let backend = Arc::new(FakeCart::new());
        {
            let mut cart = store(&local, &backend);
            cart.on_login(&customer()).await.unwrap();
            backend.set_down(true);
            cart.add(&product("3", 20_000), 2).await.unwrap();
        }

        let mut cart = store(&local, &backend);
        let report = cart.resume(&customer()).await.unwrap();

        assert!(!report.reloaded);
        assert!(cart.is_offline());
        assert_eq!(cart.cart().quantity_of(&ProductId::new("3")), 2);
        assert_eq!(cart.pending_changes(), 1);
    }

    #[tokio::test]
    async fn test_failed_reload_on_login_leaves_guest_key_empty() {
        let local = Cache::memory();
        let backend = Arc::new(FakeCart::new());
        backend.seed(&customer(), vec![CartItem::new("9", "Collar", 1, Money::clp(30_000))]);
        let mut cart = store(&local, &backend);
        cart.add(&product("1", 10_000), 1).await.unwrap();

        backend.set_down(true);
        let report = cart.on_login(&customer()).await.unwrap();

        assert!(!report.reloaded);
        assert!(cart.is_offline());
        assert_eq!(cart.cart().quantity_of(&ProductId::new("1")), 1);
        assert!(!local.exists(GUEST_CART_KEY).unwrap());

        backend.set_down(false);
        let mut next_run = store(&local, &backend);
        next_run.resume(&customer()).await.unwrap();
        assert_eq!(backend.remote_quantity(&customer(), &ProductId::new("9")), 1);
    }

    #[tokio::test]
    async fn test_queued_changes_of_another_customer_are_dropped() {
        let local = Cache::memory();
        let backend = Arc::new(FakeCart::new());
        {
            let mut cart = store(&local, &backend);
            cart.on_login(&customer()).await.unwrap();
            backend.set_down(true);
            cart.add(&product("3", 20_000), 2).await.unwrap();
        }
        backend.set_down(false);

        let other = CustomerId::new("8");
        let mut cart = store(&local, &backend);
        let report = cart.resume(&other).await.unwrap();

        assert_eq!(report.replayed, 0);
        assert_eq!(backend.remote_quantity(&other, &ProductId::new("3")), 0);
        assert!(!local.exists(PENDING_CART_KEY).unwrap());
    }

    #[tokio::test]
    async fn test_backend_mode_mirrors_operations() {
        let local = Cache::memory();
        let backend = Arc::new(FakeCart::new());
        let mut cart = store(&local, &backend);
        cart.on_login(&customer()).await.unwrap();
        let id = ProductId::new("4");

        cart.add(&product("4", 12_000), 3).await.unwrap();
        cart.decrease(&id).await.unwrap();
        assert_eq!(backend.remote_quantity(&customer(), &id), 2);

        cart.set_quantity(&id, 5).await.unwrap();
        assert_eq!(backend.remote_quantity(&customer(), &id), 5);

        cart.remove(&id).await.unwrap();
        assert_eq!(backend.remote_quantity(&customer(), &id), 0);
        assert!(!cart.is_offline());
        assert!(!local.exists(GUEST_CART_KEY).unwrap());
    }

    #[tokio::test]
    async fn test_logout_keeps_backend_cart_locally() {
        let local = Cache::memory();
        let backend = Arc::new(FakeCart::new());
        let mut cart = store(&local, &backend);
        cart.on_login(&customer()).await.unwrap();
        cart.add(&product("5", 8_000), 2).await.unwrap();

        cart.on_logout().unwrap();

        assert_eq!(cart.mode(), &CartMode::Guest);
        let saved: Cart = local.get(GUEST_CART_KEY).unwrap().unwrap();
        assert_eq!(saved.quantity_of(&ProductId::new("5")), 2);
    }

    #[tokio::test]
    async fn test_pricing_uses_policy() {
        let local = Cache::memory();
        let backend = Arc::new(FakeCart::new());
        let mut cart = store(&local, &backend);

        cart.add(&product("1", 25_000), 2).await.unwrap();
        assert_eq!(cart.pricing().unwrap().shipping, Money::clp(5_000));

        cart.add(&product("2", 1), 1).await.unwrap();
        assert!(cart.pricing().unwrap().has_free_shipping());
    }
}
