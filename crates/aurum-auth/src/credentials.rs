//! Login credentials and the API's answer to them.

use crate::{AuthError, AuthToken};
use aurum_commerce::customer::Customer;
use aurum_commerce::validation::{self, FieldErrors};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Login form.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_lowercase(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), AuthError> {
        let mut errors = FieldErrors::new();
        if self.email.is_empty() {
            errors.add("email", "El email es obligatorio");
        } else {
            errors.check("email", validation::email(&self.email));
        }
        if self.password.is_empty() {
            errors.add("password", "La contraseña es obligatoria");
        }
        errors.into_result().map_err(AuthError::from)
    }
}

/// Body returned by the login and register endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub token: String,
    #[serde(alias = "user")]
    pub customer: Customer,
}

impl LoginResponse {
    pub fn auth_token(&self) -> Result<AuthToken, AuthError> {
        AuthToken::new(self.token.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_normalize_email() {
        let creds = Credentials::new("  Ana@Correo.CL ", "secreto");
        assert_eq!(creds.email, "ana@correo.cl");
        assert!(creds.validate().is_ok());
    }

    #[test]
    fn test_credentials_validation() {
        let err = Credentials::new("", "").validate().unwrap_err();
        match err {
            AuthError::Validation(errors) => {
                assert!(errors.has("email"));
                assert!(errors.has("password"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_debug_hides_password() {
        let creds = Credentials::new("ana@correo.cl", "hunter22");
        assert!(!format!("{creds:?}").contains("hunter22"));
    }

    #[test]
    fn test_login_response_accepts_user_alias() {
        let json = r#"{"token": "abc", "user": {"id": 1, "name": "Ana", "email": "ana@correo.cl", "role": "admin"}}"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert!(response.customer.is_admin());
        assert_eq!(response.auth_token().unwrap().as_str(), "abc");
    }
}
