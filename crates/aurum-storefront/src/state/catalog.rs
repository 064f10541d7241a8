//! Product listing cache.

use crate::error::Result;
use crate::ports::CatalogSource;
use aurum_cache::Cache;
use aurum_commerce::catalog::{Category, Collection, Product};
use aurum_commerce::search::{Page, SearchQuery};
use aurum_commerce::{CategoryId, CollectionId, ProductId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session storage key of the cached listing.
pub const CATALOG_KEY: &str = "catalog:listing";

/// Default lifetime of the cached listing.
pub const DEFAULT_CATALOG_TTL_SECS: i64 = 5 * 60;

/// Everything the storefront pages need to render the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub collections: Vec<Collection>,
}

impl CatalogSnapshot {
    /// Products shown to shoppers.
    pub fn visible_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.active)
    }

    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    pub fn collection(&self, id: &CollectionId) -> Option<&Collection> {
        self.collections.iter().find(|c| &c.id == id)
    }

    pub fn by_category(&self, id: &CategoryId) -> Vec<&Product> {
        self.visible_products().filter(|p| p.in_category(id)).collect()
    }

    pub fn by_collection(&self, id: &CollectionId) -> Vec<&Product> {
        self.visible_products().filter(|p| p.in_collection(id)).collect()
    }

    pub fn featured_collections(&self) -> Vec<&Collection> {
        self.collections.iter().filter(|c| c.featured).collect()
    }

    /// Other visible products of the same category, for the detail page.
    pub fn related(&self, product: &Product, limit: usize) -> Vec<&Product> {
        let Some(category) = &product.category_id else {
            return Vec::new();
        };
        self.visible_products()
            .filter(|p| p.id != product.id && p.in_category(category))
            .take(limit)
            .collect()
    }

    pub fn search(&self, query: &SearchQuery) -> Page<Product> {
        query.apply(&self.products)
    }
}

/// Loads the catalog and keeps it in session storage for a limited time.
pub struct CatalogStore {
    source: Arc<dyn CatalogSource>,
    session: Cache,
    ttl: Duration,
    snapshot: Option<CatalogSnapshot>,
}

impl CatalogStore {
    pub fn new(source: Arc<dyn CatalogSource>, session: Cache, ttl: Duration) -> Self {
        Self {
            source,
            session,
            ttl,
            snapshot: None,
        }
    }

    /// Serve the cached listing while fresh, otherwise fetch products,
    /// categories and collections concurrently.
    pub async fn load_at(&mut self, now: DateTime<Utc>) -> Result<&CatalogSnapshot> {
        if let Some(cached) = self.session.get_fresh::<CatalogSnapshot>(CATALOG_KEY, now)? {
            tracing::debug!(products = cached.products.len(), "catalog served from session cache");
            return Ok(&*self.snapshot.insert(cached));
        }

        let (products, categories, collections) = futures::try_join!(
            self.source.products(),
            self.source.categories(),
            self.source.collections()
        )?;
        let snapshot = CatalogSnapshot {
            products,
            categories,
            collections,
        };
        tracing::debug!(products = snapshot.products.len(), "catalog loaded");

        self.session.set_expiring(CATALOG_KEY, &snapshot, self.ttl, now)?;
        Ok(&*self.snapshot.insert(snapshot))
    }

    pub async fn load(&mut self) -> Result<&CatalogSnapshot> {
        self.load_at(Utc::now()).await
    }

    /// Drop the cached listing; the next load hits the API. Called after
    /// admin mutations.
    pub fn invalidate(&mut self) -> Result<()> {
        self.snapshot = None;
        self.session.delete(CATALOG_KEY)?;
        Ok(())
    }

    pub async fn refresh_at(&mut self, now: DateTime<Utc>) -> Result<&CatalogSnapshot> {
        self.invalidate()?;
        self.load_at(now).await
    }

    /// Last loaded snapshot, if any.
    pub fn snapshot(&self) -> Option<&CatalogSnapshot> {
        self.snapshot.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeCatalog;
    use aurum_commerce::Money;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_760_000_000, 0).unwrap()
    }

    fn fixture() -> FakeCatalog {
        let mut ring = Product::new("1", "Anillo Luna", Money::clp(45_990));
        ring.category_id = Some(CategoryId::new("anillos"));
        ring.collection_ids = vec![CollectionId::new("noche")];
        let mut ring2 = Product::new("2", "Anillo Sol", Money::clp(29_990));
        ring2.category_id = Some(CategoryId::new("anillos"));
        let mut hidden = Product::new("3", "Anillo Oculto", Money::clp(9_990));
        hidden.category_id = Some(CategoryId::new("anillos"));
        hidden.active = false;

        let mut noche = Collection::new("noche", "Noche");
        noche.featured = true;

        FakeCatalog::new(
            vec![ring, ring2, hidden],
            vec![Category::new("anillos", "Anillos")],
            vec![noche, Collection::new("verano", "Verano")],
        )
    }

    #[tokio::test]
    async fn test_listing_is_cached_until_ttl() {
        let source = Arc::new(fixture());
        let mut store = CatalogStore::new(source.clone(), Cache::memory(), Duration::minutes(5));

        store.load_at(now()).await.unwrap();
        store.load_at(now() + Duration::minutes(4)).await.unwrap();
        assert_eq!(source.fetches(), 1);

        store.load_at(now() + Duration::minutes(5)).await.unwrap();
        assert_eq!(source.fetches(), 2);
    }

    #[tokio::test]
    async fn test_cache_shared_through_session_storage() {
        let source = Arc::new(fixture());
        let session = Cache::memory();
        let mut first = CatalogStore::new(source.clone(), session.clone(), Duration::minutes(5));
        first.load_at(now()).await.unwrap();

        let mut second = CatalogStore::new(source.clone(), session, Duration::minutes(5));
        let snapshot = second.load_at(now()).await.unwrap();
        assert_eq!(snapshot.products.len(), 3);
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let source = Arc::new(fixture());
        let mut store = CatalogStore::new(source.clone(), Cache::memory(), Duration::minutes(5));
        store.load_at(now()).await.unwrap();

        store.invalidate().unwrap();
        assert!(store.snapshot().is_none());
        store.load_at(now()).await.unwrap();
        assert_eq!(source.fetches(), 2);
    }

    #[tokio::test]
    async fn test_failed_load_is_error() {
        let source = Arc::new(fixture());
        source.set_down(true);
        let mut store = CatalogStore::new(source, Cache::memory(), Duration::minutes(5));
        assert!(store.load_at(now()).await.is_err());
        assert!(store.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_filtered_views_hide_inactive() {
        let source = Arc::new(fixture());
        let mut store = CatalogStore::new(source, Cache::memory(), Duration::minutes(5));
        let snapshot = store.load_at(now()).await.unwrap();

        assert_eq!(snapshot.by_category(&CategoryId::new("anillos")).len(), 2);
        assert_eq!(snapshot.by_collection(&CollectionId::new("noche")).len(), 1);
        assert_eq!(snapshot.featured_collections().len(), 1);

        let ring = snapshot.product(&ProductId::new("1")).unwrap();
        let related = snapshot.related(ring, 4);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].id, ProductId::new("2"));

        let page = snapshot.search(&SearchQuery::new().with_text("anillo"));
        assert_eq!(page.pagination.total, 2);
    }
}
