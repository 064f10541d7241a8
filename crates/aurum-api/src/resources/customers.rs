use crate::{ApiClient, ApiError};
use aurum_commerce::customer::{Customer, CustomerUpdate, Role};
use aurum_commerce::CustomerId;
use serde::Serialize;

/// `/customers`
#[derive(Debug, Clone, Copy)]
pub struct Customers<'a> {
    client: &'a ApiClient,
}

#[derive(Serialize)]
struct RoleChange {
    role: Role,
}

impl<'a> Customers<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Customer>, ApiError> {
        self.client.get("customers", "obtener usuarios").await
    }

    pub async fn get(&self, id: &CustomerId) -> Result<Customer, ApiError> {
        self.client
            .get(&format!("customers/{id}"), "obtener el usuario")
            .await
    }

    pub async fn update(&self, id: &CustomerId, update: &CustomerUpdate) -> Result<Customer, ApiError> {
        self.client
            .put(&format!("customers/{id}"), update, "actualizar el perfil")
            .await
    }

    pub async fn update_role(&self, id: &CustomerId, role: Role) -> Result<Customer, ApiError> {
        self.client
            .patch(
                &format!("customers/{id}/role"),
                &RoleChange { role },
                "cambiar el rol del usuario",
            )
            .await
    }

    pub async fn delete(&self, id: &CustomerId) -> Result<(), ApiError> {
        self.client
            .delete(&format!("customers/{id}"), "eliminar el usuario")
            .await
    }
}
