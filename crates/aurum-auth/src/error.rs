//! Authentication errors.

use aurum_commerce::FieldErrors;
use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Invalid credentials provided.
    #[error("Email o contraseña incorrectos")]
    InvalidCredentials,

    /// Operation needs a logged-in user.
    #[error("Debes iniciar sesión")]
    NotAuthenticated,

    /// Session expired.
    #[error("La sesión expiró, vuelve a iniciar sesión")]
    SessionExpired,

    /// Token malformed.
    #[error("Token inválido")]
    InvalidToken,

    /// Insufficient permissions.
    #[error("No tienes permisos para esta acción")]
    InsufficientPermissions,

    /// Form validation failed.
    #[error("Error de validación: {0}")]
    Validation(#[from] FieldErrors),
}

impl AuthError {
    /// Check if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials
                | AuthError::NotAuthenticated
                | AuthError::SessionExpired
                | AuthError::InvalidToken
        )
    }

    /// Check if this is a permission error.
    pub fn is_permission_error(&self) -> bool {
        matches!(self, AuthError::InsufficientPermissions)
    }
}
