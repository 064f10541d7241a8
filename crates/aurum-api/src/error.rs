//! API client error types.

use thiserror::Error;

/// Errors that can occur when calling the store API.
///
/// `action` is the Spanish infinitive phrase shown to the user, e.g.
/// "obtener productos".
#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-success HTTP response.
    #[error("Error al {action} (HTTP {status})")]
    Status {
        status: u16,
        action: String,
        /// Response body, when the API sent one.
        detail: Option<String>,
    },

    /// 401: missing, expired or rejected token.
    #[error("No autorizado al {action}: inicia sesión nuevamente")]
    Unauthorized { action: String },

    /// 404.
    #[error("No encontrado al {action}")]
    NotFound { action: String },

    /// The request never got a response.
    #[error("Error de conexión al {action}: {source}")]
    Network {
        action: String,
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out.
    #[error("Tiempo de espera agotado al {action}")]
    Timeout { action: String },

    /// Response body did not match the expected shape.
    #[error("Respuesta inválida al {action}: {source}")]
    Decode {
        action: String,
        #[source]
        source: serde_json::Error,
    },

    /// Base URL or path could not be parsed.
    #[error("URL inválida: {0}")]
    InvalidUrl(String),

    /// HTTP client could not be built.
    #[error("No se pudo crear el cliente HTTP: {0}")]
    Client(#[source] reqwest::Error),
}

impl ApiError {
    pub(crate) fn from_status(status: u16, action: &str, detail: Option<String>) -> Self {
        match status {
            401 => ApiError::Unauthorized {
                action: action.to_string(),
            },
            404 => ApiError::NotFound {
                action: action.to_string(),
            },
            _ => ApiError::Status {
                status,
                action: action.to_string(),
                detail,
            },
        }
    }

    pub(crate) fn from_reqwest(action: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            ApiError::Timeout {
                action: action.to_string(),
            }
        } else {
            ApiError::Network {
                action: action.to_string(),
                source,
            }
        }
    }

    /// HTTP status, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// No usable answer from the server: connection failure, timeout or 5xx.
    pub fn is_unavailable(&self) -> bool {
        match self {
            ApiError::Network { .. } | ApiError::Timeout { .. } => true,
            ApiError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(e: url::ParseError) -> Self {
        ApiError::InvalidUrl(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        let err = ApiError::from_status(500, "obtener productos", None);
        assert_eq!(err.to_string(), "Error al obtener productos (HTTP 500)");
        assert!(err.is_unavailable());
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_special_statuses() {
        assert!(ApiError::from_status(401, "obtener el perfil", None).is_unauthorized());
        assert!(ApiError::from_status(404, "obtener el producto", None).is_not_found());
        let bad_request = ApiError::from_status(422, "crear el producto", Some("precio".into()));
        assert!(!bad_request.is_unavailable());
        assert_eq!(bad_request.to_string(), "Error al crear el producto (HTTP 422)");
    }
}
