//! Customers and their roles.

use crate::ids::CustomerId;
use crate::validation::{self, FieldErrors};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Role of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular customer.
    #[default]
    Customer,
    /// Store administrator.
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Customer => "Cliente",
            Role::Admin => "Administrador",
        }
    }

    /// Permission level (higher = more permissions).
    pub fn level(&self) -> u8 {
        match self {
            Role::Customer => 0,
            Role::Admin => 1,
        }
    }

    /// Check if this role has at least the given permission level.
    pub fn has_permission(&self, required: Role) -> bool {
        self.level() >= required.level()
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "customer" | "cliente" | "user" => Ok(Role::Customer),
            "admin" | "administrador" => Ok(Role::Admin),
            _ => Err(format!("Rol desconocido: {s}")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered customer account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Customer {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Profile changes a customer can make.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl CustomerUpdate {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.name {
            errors.check("name", validation::required(name, "El nombre"));
        }
        if let Some(phone) = self.phone.as_deref().filter(|p| !p.trim().is_empty()) {
            errors.check("phone", validation::phone_cl(phone));
        }
        errors.into_result()
    }
}

/// Sign-up form.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Not sent to the API.
    #[serde(skip)]
    pub password_confirmation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .finish_non_exhaustive()
    }
}

impl RegistrationForm {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self.phone = self
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        self
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("name", validation::required(&self.name, "El nombre"));
        if self.email.trim().is_empty() {
            errors.add("email", "El email es obligatorio");
        } else {
            errors.check("email", validation::email(&self.email));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "password",
                format!("La contraseña debe tener al menos {MIN_PASSWORD_LEN} caracteres"),
            );
        }
        if self.password != self.password_confirmation {
            errors.add("password_confirmation", "Las contraseñas no coinciden");
        }
        if let Some(phone) = &self.phone {
            errors.check("phone", validation::phone_cl(phone));
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RegistrationForm {
        RegistrationForm {
            name: "Ignacia Soto".to_string(),
            email: "ignacia@correo.cl".to_string(),
            password: "secreta1".to_string(),
            password_confirmation: "secreta1".to_string(),
            phone: None,
        }
    }

    #[test]
    fn test_role_levels() {
        assert!(Role::Admin.has_permission(Role::Customer));
        assert!(!Role::Customer.has_permission(Role::Admin));
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_customer_defaults_to_customer_role() {
        let c: Customer =
            serde_json::from_str(r#"{"id": 5, "name": "Ana", "email": "ana@correo.cl"}"#).unwrap();
        assert_eq!(c.role, Role::Customer);
        assert!(!c.is_admin());
    }

    #[test]
    fn test_registration_valid() {
        assert!(form().validate().is_ok());
    }

    #[test]
    fn test_registration_password_rules() {
        let mut f = form();
        f.password = "abc".to_string();
        f.password_confirmation = "abc".to_string();
        assert!(f.validate().unwrap_err().has("password"));

        let mut f = form();
        f.password_confirmation = "otra-clave".to_string();
        let errors = f.validate().unwrap_err();
        assert!(errors.has("password_confirmation"));
        assert!(!errors.has("password"));
    }

    #[test]
    fn test_registration_payload_omits_confirmation() {
        let json = serde_json::to_value(form()).unwrap();
        assert!(json.get("password_confirmation").is_none());
        assert!(json.get("phone").is_none());
        assert_eq!(json["email"], "ignacia@correo.cl");
    }

    #[test]
    fn test_debug_hides_password() {
        assert!(!format!("{:?}", form()).contains("secreta1"));
    }

    #[test]
    fn test_customer_update_validation() {
        let update = CustomerUpdate {
            name: Some(" ".to_string()),
            phone: Some("123".to_string()),
        };
        let errors = update.validate().unwrap_err();
        assert!(errors.has("name"));
        assert!(errors.has("phone"));
        assert!(CustomerUpdate::default().validate().is_ok());
    }
}
