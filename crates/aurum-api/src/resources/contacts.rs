use crate::{ApiClient, ApiError};
use aurum_commerce::contact::{ContactForm, ContactMessage};
use aurum_commerce::ContactId;
use serde_json::json;

/// `/contacts`
#[derive(Debug, Clone, Copy)]
pub struct Contacts<'a> {
    client: &'a ApiClient,
}

impl<'a> Contacts<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<ContactMessage>, ApiError> {
        self.client.get("contacts", "obtener mensajes").await
    }

    pub async fn create(&self, form: &ContactForm) -> Result<ContactMessage, ApiError> {
        self.client
            .post("contacts", form, "enviar el mensaje")
            .await
    }

    pub async fn mark_read(&self, id: &ContactId) -> Result<ContactMessage, ApiError> {
        self.client
            .patch(
                &format!("contacts/{id}"),
                &json!({ "read": true }),
                "marcar el mensaje como leído",
            )
            .await
    }

    pub async fn delete(&self, id: &ContactId) -> Result<(), ApiError> {
        self.client
            .delete(&format!("contacts/{id}"), "eliminar el mensaje")
            .await
    }
}
