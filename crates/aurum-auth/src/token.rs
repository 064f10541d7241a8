//! Bearer tokens issued by the API.

use crate::AuthError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A bearer token and, when known, its expiry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    /// The token value.
    pub value: String,
    /// When the API stops accepting the token.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("value", &self.masked())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl AuthToken {
    /// Wrap a token. JWTs carry their own `exp` claim, which becomes the
    /// expiry; opaque tokens have none.
    pub fn new(value: impl Into<String>) -> Result<Self, AuthError> {
        let value = value.into();
        let value = value.trim();
        if value.is_empty() || value.contains(char::is_whitespace) {
            return Err(AuthError::InvalidToken);
        }
        Ok(Self {
            expires_at: jwt_expiry(value),
            value: value.to_string(),
        })
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Check if token is expired at `now`. Tokens without expiry never are.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }

    /// Value for the `Authorization` header.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.value)
    }

    /// First characters only, for logs.
    pub fn masked(&self) -> String {
        let head: String = self.value.chars().take(6).collect();
        format!("{head}…")
    }
}

#[derive(Deserialize)]
struct JwtClaims {
    exp: Option<i64>,
}

/// Read the `exp` claim of a JWT without verifying it.
fn jwt_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: JwtClaims = serde_json::from_slice(&bytes).ok()?;
    DateTime::from_timestamp(claims.exp?, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn jwt(payload: &str) -> String {
        format!(
            "{}.{}.signature",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_opaque_token_never_expires() {
        let token = AuthToken::new("abc123").unwrap();
        assert_eq!(token.expires_at, None);
        assert!(!token.is_expired_at(Utc::now()));
        assert_eq!(token.bearer_header(), "Bearer abc123");
    }

    #[test]
    fn test_jwt_expiry_is_read() {
        let token = AuthToken::new(jwt(r#"{"sub":"7","exp":1700000000}"#)).unwrap();
        let exp = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(token.expires_at, Some(exp));
        assert!(!token.is_expired_at(exp - Duration::seconds(1)));
        assert!(token.is_expired_at(exp));
    }

    #[test]
    fn test_jwt_without_exp() {
        let token = AuthToken::new(jwt(r#"{"sub":"7"}"#)).unwrap();
        assert_eq!(token.expires_at, None);
    }

    #[test]
    fn test_invalid_tokens_rejected() {
        assert!(matches!(AuthToken::new("  "), Err(AuthError::InvalidToken)));
        assert!(AuthToken::new("two words").is_err());
    }

    #[test]
    fn test_debug_masks_value() {
        let token = AuthToken::new("supersecrettoken").unwrap();
        let debug = format!("{token:?}");
        assert!(debug.contains("supers…"));
        assert!(!debug.contains("supersecrettoken"));
    }
}
