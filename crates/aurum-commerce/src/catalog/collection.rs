//! Collections: editorial groupings that cut across categories.

use crate::ids::CollectionId;
use serde::{Deserialize, Serialize};

/// A collection ("Primavera", "Novias", "Minimal"...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Shown on the home page.
    #[serde(default)]
    pub featured: bool,
}

impl Collection {
    pub fn new(id: impl Into<CollectionId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            image_url: None,
            featured: false,
        }
    }
}
