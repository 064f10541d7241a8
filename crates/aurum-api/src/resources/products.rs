use crate::{ApiClient, ApiError};
use aurum_commerce::catalog::{Product, ProductDraft};
use aurum_commerce::{CategoryId, CollectionId, ProductId};

/// `/products`
#[derive(Debug, Clone, Copy)]
pub struct Products<'a> {
    client: &'a ApiClient,
}

impl<'a> Products<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Product>, ApiError> {
        self.client.get("products", "obtener productos").await
    }

    pub async fn get(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.client
            .get(&format!("products/{id}"), "obtener el producto")
            .await
    }

    pub async fn by_category(&self, id: &CategoryId) -> Result<Vec<Product>, ApiError> {
        self.client
            .get(
                &format!("categories/{id}/products"),
                "obtener productos de la categoría",
            )
            .await
    }

    pub async fn by_collection(&self, id: &CollectionId) -> Result<Vec<Product>, ApiError> {
        self.client
            .get(
                &format!("collections/{id}/products"),
                "obtener productos de la colección",
            )
            .await
    }

    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, ApiError> {
        self.client
            .post("products", draft, "crear el producto")
            .await
    }

    pub async fn update(&self, id: &ProductId, draft: &ProductDraft) -> Result<Product, ApiError> {
        self.client
            .put(&format!("products/{id}"), draft, "actualizar el producto")
            .await
    }

    pub async fn delete(&self, id: &ProductId) -> Result<(), ApiError> {
        self.client
            .delete(&format!("products/{id}"), "eliminar el producto")
            .await
    }
}
