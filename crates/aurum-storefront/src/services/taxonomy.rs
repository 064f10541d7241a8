//! Categories and collections share one form shape.

use crate::error::Result;
use aurum_api::ApiClient;
use aurum_commerce::catalog::{Category, Collection, TaxonomyDraft};
use aurum_commerce::{CategoryId, CollectionId, FieldErrors};

/// Normalize and validate a category or collection form.
pub fn prepare_taxonomy(draft: TaxonomyDraft) -> std::result::Result<TaxonomyDraft, FieldErrors> {
    let draft = draft.normalized();
    draft.validate()?;
    Ok(draft)
}

#[derive(Debug, Clone)]
pub struct CategoryService {
    api: ApiClient,
}

impl CategoryService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        Ok(self.api.categories().list().await?)
    }

    pub async fn get(&self, id: &CategoryId) -> Result<Category> {
        Ok(self.api.categories().get(id).await?)
    }

    pub async fn create(&self, draft: TaxonomyDraft) -> Result<Category> {
        let draft = prepare_category(draft)?;
        Ok(self.api.categories().create(&draft).await?)
    }

    pub async fn update(&self, id: &CategoryId, draft: TaxonomyDraft) -> Result<Category> {
        let draft = prepare_category(draft)?;
        Ok(self.api.categories().update(id, &draft).await?)
    }

    pub async fn delete(&self, id: &CategoryId) -> Result<()> {
        Ok(self.api.categories().delete(id).await?)
    }
}

// Categories have no featured flag.
fn prepare_category(draft: TaxonomyDraft) -> std::result::Result<TaxonomyDraft, FieldErrors> {
    let mut draft = prepare_taxonomy(draft)?;
    draft.featured = false;
    Ok(draft)
}

#[derive(Debug, Clone)]
pub struct CollectionService {
    api: ApiClient,
}

impl CollectionService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Collection>> {
        Ok(self.api.collections().list().await?)
    }

    pub async fn get(&self, id: &CollectionId) -> Result<Collection> {
        Ok(self.api.collections().get(id).await?)
    }

    pub async fn create(&self, draft: TaxonomyDraft) -> Result<Collection> {
        let draft = prepare_taxonomy(draft)?;
        Ok(self.api.collections().create(&draft).await?)
    }

    pub async fn update(&self, id: &CollectionId, draft: TaxonomyDraft) -> Result<Collection> {
        let draft = prepare_taxonomy(draft)?;
        Ok(self.api.collections().update(id, &draft).await?)
    }

    pub async fn delete(&self, id: &CollectionId) -> Result<()> {
        Ok(self.api.collections().delete(id).await?)
    }
}
