//! Session management.

use crate::token::AuthToken;
use crate::user::User;
use crate::AuthError;
use aurum_commerce::customer::{Customer, Role};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a guest session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Create a new session ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random session ID.
    pub fn generate() -> Self {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let bytes: [u8; 18] = rand::thread_rng().gen();
        Self(format!("guest_{}", URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A logged-in session as persisted between runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthSession {
    pub token: AuthToken,
    pub user: User,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    /// Default session duration: 7 days.
    pub const DEFAULT_DURATION_SECS: i64 = 7 * 24 * 60 * 60;

    /// Start a session for a customer.
    ///
    /// The session ends with the token when the token has an expiry, and
    /// after [`Self::DEFAULT_DURATION_SECS`] otherwise.
    pub fn start(token: AuthToken, customer: &Customer, now: DateTime<Utc>) -> Self {
        let default_end = now + Duration::seconds(Self::DEFAULT_DURATION_SECS);
        let expires_at = token.expires_at.map_or(default_end, |exp| exp.min(default_end));
        Self {
            token,
            user: User::from_customer(customer),
            created_at: now,
            expires_at,
        }
    }

    /// Check if session is expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at || self.token.is_expired_at(now)
    }

    /// Validate the session, returning error if expired.
    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<(), AuthError> {
        if self.is_expired_at(now) {
            Err(AuthError::SessionExpired)
        } else {
            Ok(())
        }
    }

    /// Require a role, e.g. before entering the back-office.
    pub fn require(&self, role: Role, now: DateTime<Utc>) -> Result<(), AuthError> {
        self.validate_at(now)?;
        if self.user.has_permission(role) {
            Ok(())
        } else {
            Err(AuthError::InsufficientPermissions)
        }
    }

    /// Get time until expiration.
    pub fn time_to_expiry(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }

    /// Refresh the cached user after a profile change.
    pub fn update_user(&mut self, customer: &Customer) {
        self.user = User::from_customer(customer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurum_commerce::ids::CustomerId;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_760_000_000, 0).unwrap()
    }

    fn customer(role: Role) -> Customer {
        Customer {
            id: CustomerId::new("3"),
            name: "Tomás".to_string(),
            email: "tomas@correo.cl".to_string(),
            phone: None,
            role,
            created_at: None,
        }
    }

    #[test]
    fn test_session_default_duration() {
        let session = AuthSession::start(AuthToken::new("tok").unwrap(), &customer(Role::Customer), now());
        assert_eq!(session.expires_at, now() + Duration::days(7));
        assert!(!session.is_expired_at(now() + Duration::days(6)));
        assert!(session.is_expired_at(now() + Duration::days(7)));
        assert!(matches!(
            session.validate_at(now() + Duration::days(8)),
            Err(AuthError::SessionExpired)
        ));
    }

    #[test]
    fn test_session_ends_with_token() {
        let token = AuthToken::new("tok").unwrap().with_expiry(now() + Duration::hours(2));
        let session = AuthSession::start(token, &customer(Role::Customer), now());
        assert_eq!(session.expires_at, now() + Duration::hours(2));
        assert_eq!(session.time_to_expiry(now() + Duration::hours(1)), Duration::hours(1));
    }

    #[test]
    fn test_require_role() {
        let token = AuthToken::new("tok").unwrap();
        let customer_session = AuthSession::start(token.clone(), &customer(Role::Customer), now());
        assert!(customer_session.require(Role::Customer, now()).is_ok());
        assert!(matches!(
            customer_session.require(Role::Admin, now()),
            Err(AuthError::InsufficientPermissions)
        ));

        let admin_session = AuthSession::start(token, &customer(Role::Admin), now());
        assert!(admin_session.require(Role::Admin, now()).is_ok());
    }

    #[test]
    fn test_session_round_trips_through_json() {
        let session = AuthSession::start(AuthToken::new("tok").unwrap(), &customer(Role::Admin), now());
        let json = serde_json::to_string(&session).unwrap();
        let restored: AuthSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn test_session_id_generation() {
        let id1 = SessionId::generate();
        let id2 = SessionId::generate();
        assert_ne!(id1, id2);
        assert!(id1.as_str().starts_with("guest_"));
        assert!(id1.as_str()[6..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
