//! Newtype IDs for type-safe identifiers.
//!
//! The REST backend hands out opaque identifiers; wrapping them keeps a
//! `CategoryId` from being passed where a `CollectionId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A unique identifier.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        // Backends disagree on whether ids are strings or integers; accept both.
        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                match RawId::deserialize(deserializer)? {
                    RawId::Text(s) => Ok(Self(s)),
                    RawId::Number(n) => Ok(Self(n.to_string())),
                }
            }
        }

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

define_id!(ProductId);
define_id!(CategoryId);
define_id!(CollectionId);
define_id!(CustomerId);
define_id!(AddressId);
define_id!(OrderId);
define_id!(ContactId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new("anillo-01");
        assert_eq!(id.as_str(), "anillo-01");
    }

    #[test]
    fn test_id_from_string() {
        let id: CategoryId = "aros".into();
        assert_eq!(id.as_str(), "aros");
    }

    #[test]
    fn test_id_display() {
        let id = OrderId::new("AUR-123456");
        assert_eq!(format!("{}", id), "AUR-123456");
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = CustomerId::new("42");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""42""#);
        let back: CustomerId = serde_json::from_str(r#""42""#).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_accepts_numeric_json() {
        let id: ProductId = serde_json::from_str("17").unwrap();
        assert_eq!(id.as_str(), "17");
    }
}
