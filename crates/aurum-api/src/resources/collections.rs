use crate::{ApiClient, ApiError};
use aurum_commerce::catalog::{Collection, TaxonomyDraft};
use aurum_commerce::CollectionId;

/// `/collections`
#[derive(Debug, Clone, Copy)]
pub struct Collections<'a> {
    client: &'a ApiClient,
}

impl<'a> Collections<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Collection>, ApiError> {
        self.client.get("collections", "obtener colecciones").await
    }

    pub async fn get(&self, id: &CollectionId) -> Result<Collection, ApiError> {
        self.client
            .get(&format!("collections/{id}"), "obtener la colección")
            .await
    }

    pub async fn create(&self, draft: &TaxonomyDraft) -> Result<Collection, ApiError> {
        self.client
            .post("collections", draft, "crear la colección")
            .await
    }

    pub async fn update(
        &self,
        id: &CollectionId,
        draft: &TaxonomyDraft,
    ) -> Result<Collection, ApiError> {
        self.client
            .put(&format!("collections/{id}"), draft, "actualizar la colección")
            .await
    }

    pub async fn delete(&self, id: &CollectionId) -> Result<(), ApiError> {
        self.client
            .delete(&format!("collections/{id}"), "eliminar la colección")
            .await
    }
}
