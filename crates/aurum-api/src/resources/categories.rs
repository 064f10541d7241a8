use crate::{ApiClient, ApiError};
use aurum_commerce::catalog::{Category, TaxonomyDraft};
use aurum_commerce::CategoryId;

/// `/categories`
#[derive(Debug, Clone, Copy)]
pub struct Categories<'a> {
    client: &'a ApiClient,
}

impl<'a> Categories<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Category>, ApiError> {
        self.client.get("categories", "obtener categorías").await
    }

    pub async fn get(&self, id: &CategoryId) -> Result<Category, ApiError> {
        self.client
            .get(&format!("categories/{id}"), "obtener la categoría")
            .await
    }

    pub async fn create(&self, draft: &TaxonomyDraft) -> Result<Category, ApiError> {
        self.client
            .post("categories", draft, "crear la categoría")
            .await
    }

    pub async fn update(&self, id: &CategoryId, draft: &TaxonomyDraft) -> Result<Category, ApiError> {
        self.client
            .put(&format!("categories/{id}"), draft, "actualizar la categoría")
            .await
    }

    pub async fn delete(&self, id: &CategoryId) -> Result<(), ApiError> {
        self.client
            .delete(&format!("categories/{id}"), "eliminar la categoría")
            .await
    }
}
