use crate::{ApiClient, ApiError};
use aurum_commerce::checkout::{NewOrder, Order, OrderStatus};
use aurum_commerce::{CustomerId, OrderId};
use serde::Serialize;

/// `/orders`
#[derive(Debug, Clone, Copy)]
pub struct Orders<'a> {
    client: &'a ApiClient,
}

#[derive(Serialize)]
struct StatusChange {
    status: OrderStatus,
}

impl<'a> Orders<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Order>, ApiError> {
        self.client.get("orders", "obtener pedidos").await
    }

    pub async fn for_customer(&self, customer_id: &CustomerId) -> Result<Vec<Order>, ApiError> {
        self.client
            .get(
                &format!("customers/{customer_id}/orders"),
                "obtener pedidos del cliente",
            )
            .await
    }

    pub async fn get(&self, id: &OrderId) -> Result<Order, ApiError> {
        self.client
            .get(&format!("orders/{id}"), "obtener el pedido")
            .await
    }

    pub async fn create(&self, order: &NewOrder) -> Result<Order, ApiError> {
        self.client.post("orders", order, "crear el pedido").await
    }

    pub async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order, ApiError> {
        self.client
            .patch(
                &format!("orders/{id}"),
                &StatusChange { status },
                "actualizar el estado del pedido",
            )
            .await
    }
}
