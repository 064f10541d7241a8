use crate::{ApiClient, ApiError};
use aurum_commerce::cart::{Cart, CartItem};
use aurum_commerce::{CustomerId, ProductId};
use serde::{Deserialize, Serialize};

/// `/carts/{customer_id}`: the server-side cart of a signed-in customer.
#[derive(Debug, Clone, Copy)]
pub struct Carts<'a> {
    client: &'a ApiClient,
}

/// Body of an item submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl From<&CartItem> for CartLine {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            quantity: item.quantity,
        }
    }
}

#[derive(Serialize)]
struct QuantityChange {
    quantity: i64,
}

/// The API returns either a bare item list or `{"items": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CartBody {
    Items(Vec<CartItem>),
    Cart { items: Vec<CartItem> },
}

impl CartBody {
    fn into_cart(self) -> Cart {
        match self {
            CartBody::Items(items) | CartBody::Cart { items } => Cart::from_items(items),
        }
    }
}

impl<'a> Carts<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, customer_id: &CustomerId) -> Result<Cart, ApiError> {
        let body: CartBody = self
            .client
            .get(&format!("carts/{customer_id}"), "obtener el carrito")
            .await?;
        Ok(body.into_cart())
    }

    pub async fn add_item(&self, customer_id: &CustomerId, line: &CartLine) -> Result<(), ApiError> {
        self.client
            .post::<serde_json::Value, _>(
                &format!("carts/{customer_id}/items"),
                line,
                "agregar al carrito",
            )
            .await
            .map(|_| ())
    }

    pub async fn update_item(
        &self,
        customer_id: &CustomerId,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<(), ApiError> {
        self.client
            .put::<serde_json::Value, _>(
                &format!("carts/{customer_id}/items/{product_id}"),
                &QuantityChange { quantity },
                "actualizar el carrito",
            )
            .await
            .map(|_| ())
    }

    pub async fn remove_item(
        &self,
        customer_id: &CustomerId,
        product_id: &ProductId,
    ) -> Result<(), ApiError> {
        self.client
            .delete(
                &format!("carts/{customer_id}/items/{product_id}"),
                "quitar del carrito",
            )
            .await
    }

    pub async fn clear(&self, customer_id: &CustomerId) -> Result<(), ApiError> {
        self.client
            .delete(&format!("carts/{customer_id}"), "vaciar el carrito")
            .await
    }
}
