//! Shipping address types.

use crate::ids::{AddressId, CustomerId};
use crate::validation::{self, FieldErrors};
use serde::{Deserialize, Serialize};

/// Address form used in the first checkout step and in the profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShippingAddress {
    pub full_name: String,
    pub street: String,
    /// Street number.
    pub number: String,
    /// Apartment, office or block.
    #[serde(default)]
    pub apartment: Option<String>,
    pub commune: String,
    pub city: String,
    pub region: String,
    pub phone: String,
    /// Delivery notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl ShippingAddress {
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.full_name,
            &mut self.street,
            &mut self.number,
            &mut self.commune,
            &mut self.city,
            &mut self.region,
            &mut self.phone,
        ] {
            *field = field.trim().to_string();
        }
        self.apartment = self
            .apartment
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        self.notes = self
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        self
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("full_name", validation::required(&self.full_name, "El nombre"));
        errors.check("street", validation::required(&self.street, "La calle"));
        errors.check("number", validation::required(&self.number, "El número"));
        errors.check("commune", validation::required(&self.commune, "La comuna"));
        errors.check("city", validation::required(&self.city, "La ciudad"));
        errors.check("region", validation::required(&self.region, "La región"));
        if self.phone.trim().is_empty() {
            errors.add("phone", "El teléfono es obligatorio");
        } else {
            errors.check("phone", validation::phone_cl(&self.phone));
        }
        errors.into_result()
    }

    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }

    /// "Av. Providencia 1234, Depto 56, Providencia, Santiago"
    pub fn one_line(&self) -> String {
        let mut parts = vec![format!("{} {}", self.street, self.number)];
        if let Some(apartment) = &self.apartment {
            parts.push(apartment.clone());
        }
        parts.push(self.commune.clone());
        parts.push(self.city.clone());
        parts.join(", ")
    }

    pub fn multi_line(&self) -> String {
        [
            self.full_name.clone(),
            self.one_line(),
            self.region.clone(),
            self.phone.clone(),
        ]
        .join("\n")
    }
}

/// An address saved in a customer's profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Address {
    pub id: AddressId,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(flatten)]
    pub address: ShippingAddress,
    /// Pre-selected in checkout.
    #[serde(default)]
    pub is_default: bool,
}
