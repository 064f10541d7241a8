//! Category types for product organization.

use crate::ids::CategoryId;
use crate::validation::{self, FieldErrors};
use serde::{Deserialize, Serialize};

/// A product category (anillos, collares, aros, pulseras...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Category name.
    pub name: String,
    /// Category description.
    #[serde(default)]
    pub description: Option<String>,
    /// Category image URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Category {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            image_url: None,
        }
    }
}

/// Admin form payload shared by categories and collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaxonomyDraft {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Only meaningful for collections.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub featured: bool,
}

impl TaxonomyDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self.image_url = self
            .image_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        self
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("name", validation::required(&self.name, "El nombre"));
        if let Some(url) = self.image_url.as_deref() {
            errors.check("image_url", validation::url(url));
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_deserialize_minimal() {
        let c: Category = serde_json::from_str(r#"{"id": 1, "name": "Anillos"}"#).unwrap();
        assert_eq!(c.id.as_str(), "1");
        assert_eq!(c.description, None);
    }

    #[test]
    fn test_taxonomy_draft_requires_name() {
        assert!(TaxonomyDraft::named("  ").validate().is_err());
        assert!(TaxonomyDraft::named("Pulseras").validate().is_ok());
    }

    #[test]
    fn test_taxonomy_draft_normalized() {
        let draft = TaxonomyDraft {
            name: " Aros ".to_string(),
            description: Some("  ".to_string()),
            image_url: None,
            featured: false,
        }
        .normalized();
        assert_eq!(draft.name, "Aros");
        assert_eq!(draft.description, None);
    }

    #[test]
    fn test_featured_flag_omitted_when_false() {
        let json = serde_json::to_string(&TaxonomyDraft::named("Aros")).unwrap();
        assert!(!json.contains("featured"));
    }
}
