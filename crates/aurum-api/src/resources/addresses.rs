use crate::{ApiClient, ApiError};
use aurum_commerce::checkout::{Address, ShippingAddress};
use aurum_commerce::{AddressId, CustomerId};
use serde::Serialize;

/// `/addresses`
#[derive(Debug, Clone, Copy)]
pub struct Addresses<'a> {
    client: &'a ApiClient,
}

#[derive(Serialize)]
struct AddressPayload<'b> {
    customer_id: &'b CustomerId,
    #[serde(flatten)]
    address: &'b ShippingAddress,
    is_default: bool,
}

impl<'a> Addresses<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn for_customer(&self, customer_id: &CustomerId) -> Result<Vec<Address>, ApiError> {
        self.client
            .get(
                &format!("customers/{customer_id}/addresses"),
                "obtener direcciones",
            )
            .await
    }

    pub async fn create(
        &self,
        customer_id: &CustomerId,
        address: &ShippingAddress,
        is_default: bool,
    ) -> Result<Address, ApiError> {
        let payload = AddressPayload {
            customer_id,
            address,
            is_default,
        };
        self.client
            .post("addresses", &payload, "crear la dirección")
            .await
    }

    pub async fn update(&self, address: &Address) -> Result<Address, ApiError> {
        self.client
            .put(
                &format!("addresses/{}", address.id),
                address,
                "actualizar la dirección",
            )
            .await
    }

    pub async fn delete(&self, id: &AddressId) -> Result<(), ApiError> {
        self.client
            .delete(&format!("addresses/{id}"), "eliminar la dirección")
            .await
    }
}
