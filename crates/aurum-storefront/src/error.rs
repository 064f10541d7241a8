//! Storefront error types.

use aurum_api::ApiError;
use aurum_auth::AuthError;
use aurum_cache::CacheError;
use aurum_commerce::{CommerceError, FieldErrors};
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to the presentation layer.
#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Commerce(#[from] CommerceError),

    /// Form validation failed.
    #[error("{0}")]
    Validation(#[from] FieldErrors),

    /// An administrator tried to remove their own admin role or account.
    #[error("No puedes modificar tu propia cuenta de administrador")]
    SelfModification,

    #[error("Configuración inválida: {0}")]
    Config(String),

    #[error("No se pudo leer {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorefrontError {
    /// Field errors to show next to a form, if this is a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            StorefrontError::Validation(errors) => Some(errors),
            StorefrontError::Commerce(CommerceError::Validation(errors)) => Some(errors),
            StorefrontError::Auth(AuthError::Validation(errors)) => Some(errors),
            _ => None,
        }
    }

    /// The session is gone and the user must sign in again.
    pub fn requires_login(&self) -> bool {
        match self {
            StorefrontError::Api(e) => e.is_unauthorized(),
            StorefrontError::Auth(e) => matches!(
                e,
                AuthError::NotAuthenticated | AuthError::SessionExpired | AuthError::InvalidToken
            ),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
