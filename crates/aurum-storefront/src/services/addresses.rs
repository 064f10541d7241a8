use crate::error::Result;
use aurum_api::ApiClient;
use aurum_commerce::checkout::{Address, ShippingAddress};
use aurum_commerce::{AddressId, CustomerId};

#[derive(Debug, Clone)]
pub struct AddressService {
    api: ApiClient,
}

impl AddressService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, customer: &CustomerId) -> Result<Vec<Address>> {
        Ok(self.api.addresses().for_customer(customer).await?)
    }

    /// The address to pre-fill at checkout.
    pub async fn default_for(&self, customer: &CustomerId) -> Result<Option<Address>> {
        Ok(pick_default(self.list(customer).await?))
    }

    pub async fn create(
        &self,
        customer: &CustomerId,
        address: ShippingAddress,
        is_default: bool,
    ) -> Result<Address> {
        let address = address.normalized();
        address.validate()?;
        Ok(self.api.addresses().create(customer, &address, is_default).await?)
    }

    pub async fn update(&self, mut address: Address) -> Result<Address> {
        address.address = address.address.normalized();
        address.address.validate()?;
        Ok(self.api.addresses().update(&address).await?)
    }

    pub async fn delete(&self, id: &AddressId) -> Result<()> {
        Ok(self.api.addresses().delete(id).await?)
    }
}

fn pick_default(addresses: Vec<Address>) -> Option<Address> {
    let fallback = addresses.first().cloned();
    addresses.into_iter().find(|a| a.is_default).or(fallback)
}
