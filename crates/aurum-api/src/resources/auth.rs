use crate::{ApiClient, ApiError};
use aurum_auth::{Credentials, LoginResponse};
use aurum_commerce::customer::{Customer, RegistrationForm};

/// `/auth`
///
/// These calls do not store the returned token; callers decide whether to
/// install it with [`ApiClient::set_token`].
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.client
            .post("auth/login", credentials, "iniciar sesión")
            .await
    }

    pub async fn register(&self, form: &RegistrationForm) -> Result<LoginResponse, ApiError> {
        self.client
            .post("auth/register", form, "registrar la cuenta")
            .await
    }

    /// The account behind the current token.
    pub async fn me(&self) -> Result<Customer, ApiError> {
        self.client.get("auth/me", "obtener la sesión").await
    }
}
