//! Authentication state.

use crate::error::{Result, StorefrontError};
use crate::ports::AuthBackend;
use aurum_api::ApiError;
use aurum_auth::{AuthError, AuthSession, Credentials, LoginResponse, SessionId, User};
use aurum_cache::Cache;
use aurum_commerce::customer::{Customer, RegistrationForm, Role};
use aurum_commerce::CustomerId;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Local storage key of the persisted session.
pub const SESSION_KEY: &str = "auth:session";
/// Local storage key of the guest session id.
pub const GUEST_ID_KEY: &str = "auth:guest_id";

/// Holds the current session and keeps it in local storage.
pub struct AuthStore {
    backend: Arc<dyn AuthBackend>,
    local: Cache,
    guest_id: SessionId,
    session: Option<AuthSession>,
}

impl AuthStore {
    pub fn new(backend: Arc<dyn AuthBackend>, local: Cache) -> Self {
        let guest_id = match local.get::<SessionId>(GUEST_ID_KEY) {
            Ok(Some(id)) => id,
            _ => {
                let id = SessionId::generate();
                if let Err(e) = local.set(GUEST_ID_KEY, &id) {
                    tracing::warn!(error = %e, "could not persist guest id");
                }
                id
            }
        };
        Self {
            backend,
            local,
            guest_id,
            session: None,
        }
    }

    /// Reload the persisted session. Expired or unreadable sessions are
    /// discarded.
    pub fn restore_at(&mut self, now: DateTime<Utc>) -> Option<&AuthSession> {
        let stored = match self.local.get::<AuthSession>(SESSION_KEY) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable session");
                None
            }
        };

        match stored {
            Some(session) if !session.is_expired_at(now) => {
                tracing::debug!(user = session.user.display_name(), "session restored");
                self.backend.install_token(Some(session.token.clone()));
                self.session = Some(session);
            }
            Some(_) => {
                tracing::info!("stored session expired");
                self.forget();
            }
            None => self.forget(),
        }
        self.session.as_ref()
    }

    pub fn restore(&mut self) -> Option<&AuthSession> {
        self.restore_at(Utc::now())
    }

    pub async fn login_at(
        &mut self,
        credentials: Credentials,
        now: DateTime<Utc>,
    ) -> Result<&AuthSession> {
        credentials.validate()?;
        let response = self
            .backend
            .login(&credentials)
            .await
            .map_err(|e| match e {
                ApiError::Unauthorized { .. } => StorefrontError::Auth(AuthError::InvalidCredentials),
                other => StorefrontError::Api(other),
            })?;
        self.begin(response, now)
    }

    pub async fn login(&mut self, credentials: Credentials) -> Result<&AuthSession> {
        self.login_at(credentials, Utc::now()).await
    }

    /// Create an account and sign in with it.
    pub async fn register_at(
        &mut self,
        form: RegistrationForm,
        now: DateTime<Utc>,
    ) -> Result<&AuthSession> {
        let form = form.normalized();
        form.validate()?;
        let response = self.backend.register(&form).await?;
        self.begin(response, now)
    }

    pub async fn register(&mut self, form: RegistrationForm) -> Result<&AuthSession> {
        self.register_at(form, Utc::now()).await
    }

    fn begin(&mut self, response: LoginResponse, now: DateTime<Utc>) -> Result<&AuthSession> {
        let token = response.auth_token()?;
        let session = AuthSession::start(token, &response.customer, now);
        self.backend.install_token(Some(session.token.clone()));
        self.local.set(SESSION_KEY, &session)?;
        tracing::info!(user = %response.customer.email, role = %response.customer.role, "signed in");
        Ok(&*self.session.insert(session))
    }

    pub fn logout(&mut self) {
        if let Some(session) = &self.session {
            tracing::info!(user = session.user.display_name(), "signed out");
        }
        self.forget();
    }

    fn forget(&mut self) {
        self.session = None;
        self.backend.install_token(None);
        if let Err(e) = self.local.delete(SESSION_KEY) {
            tracing::warn!(error = %e, "could not remove stored session");
        }
    }

    /// Fetch the account again and update the cached user. A rejected token
    /// ends the session.
    pub async fn refresh_profile(&mut self) -> Result<Customer> {
        if self.session.is_none() {
            return Err(AuthError::NotAuthenticated.into());
        }
        match self.backend.current_customer().await {
            Ok(customer) => {
                self.apply_profile(&customer)?;
                Ok(customer)
            }
            Err(e) if e.is_unauthorized() => {
                self.forget();
                Err(AuthError::SessionExpired.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Update the cached user after a profile edit.
    pub fn apply_profile(&mut self, customer: &Customer) -> Result<()> {
        if let Some(session) = self.session.as_mut() {
            session.update_user(customer);
            self.local.set(SESSION_KEY, session)?;
        }
        Ok(())
    }

    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    /// The current user; guests share the persisted guest id.
    pub fn user(&self) -> User {
        match &self.session {
            Some(session) => session.user.clone(),
            None => User::Anonymous {
                session_id: self.guest_id.clone(),
            },
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.user.is_admin())
    }

    pub fn customer_id(&self) -> Option<&CustomerId> {
        self.session.as_ref().and_then(|s| s.user.customer_id())
    }

    /// Check the session is live and carries `role`.
    pub fn require_at(&self, role: Role, now: DateTime<Utc>) -> Result<&AuthSession> {
        let session = self.session.as_ref().ok_or(AuthError::NotAuthenticated)?;
        session.require(role, now)?;
        Ok(session)
    }
}
