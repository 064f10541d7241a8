use crate::error::Result;
use aurum_api::ApiClient;
use aurum_commerce::catalog::{Product, ProductDraft};
use aurum_commerce::{CategoryId, CollectionId, FieldErrors, ProductId};

/// Normalize and validate a product form.
pub fn prepare_product(draft: ProductDraft) -> std::result::Result<ProductDraft, FieldErrors> {
    let draft = draft.normalized();
    draft.validate()?;
    Ok(draft)
}

#[derive(Debug, Clone)]
pub struct ProductService {
    api: ApiClient,
}

impl ProductService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Product>> {
        Ok(self.api.products().list().await?)
    }

    pub async fn get(&self, id: &ProductId) -> Result<Product> {
        Ok(self.api.products().get(id).await?)
    }

    pub async fn by_category(&self, id: &CategoryId) -> Result<Vec<Product>> {
        Ok(self.api.products().by_category(id).await?)
    }

    pub async fn by_collection(&self, id: &CollectionId) -> Result<Vec<Product>> {
        Ok(self.api.products().by_collection(id).await?)
    }

    pub async fn create(&self, draft: ProductDraft) -> Result<Product> {
        let draft = prepare_product(draft)?;
        let product = self.api.products().create(&draft).await?;
        tracing::info!(product = %product.id, name = %product.name, "product created");
        Ok(product)
    }

    pub async fn update(&self, id: &ProductId, draft: ProductDraft) -> Result<Product> {
        let draft = prepare_product(draft)?;
        Ok(self.api.products().update(id, &draft).await?)
    }

    /// Show or hide a product in the storefront.
    pub async fn set_active(&self, product: &Product, active: bool) -> Result<Product> {
        let mut draft = ProductDraft::from_product(product);
        draft.active = active;
        self.update(&product.id, draft).await
    }

    pub async fn delete(&self, id: &ProductId) -> Result<()> {
        self.api.products().delete(id).await?;
        tracing::info!(product = %id, "product deleted");
        Ok(())
    }
}
