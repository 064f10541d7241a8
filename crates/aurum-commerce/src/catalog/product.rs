//! Product types.

use crate::ids::{CategoryId, CollectionId, ProductId};
use crate::money::{self, Money};
use crate::validation::{self, FieldErrors};
use serde::{Deserialize, Serialize};

/// Stock level at or below which a product is flagged in the back-office.
pub const LOW_STOCK_THRESHOLD: i64 = 3;

/// A piece of jewelry in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Full description.
    #[serde(default)]
    pub description: String,
    /// Unit price in pesos.
    #[serde(with = "money::as_clp")]
    pub price: Money,
    /// Units available.
    #[serde(default)]
    pub stock: i64,
    /// Main image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Category this product belongs to.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Collections this product is tagged with.
    #[serde(default)]
    pub collection_ids: Vec<CollectionId>,
    /// Main material (e.g., "Plata 925", "Oro 18k").
    #[serde(default)]
    pub material: Option<String>,
    /// Whether the product is shown in the storefront.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Creation time, if the backend reports it.
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn default_active() -> bool {
    true
}

impl Product {
    /// Create an active product with the minimum fields set.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            stock: 0,
            image_url: None,
            category_id: None,
            collection_ids: Vec::new(),
            material: None,
            active: true,
            created_at: None,
        }
    }

    /// Check if the product can be added to a cart.
    pub fn is_available(&self) -> bool {
        self.active && self.stock > 0
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock <= LOW_STOCK_THRESHOLD
    }

    pub fn in_category(&self, category_id: &CategoryId) -> bool {
        self.category_id.as_ref() == Some(category_id)
    }

    pub fn in_collection(&self, collection_id: &CollectionId) -> bool {
        self.collection_ids.contains(collection_id)
    }

    /// Case-insensitive match against name, description and material.
    pub fn matches_text(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
            || self
                .material
                .as_deref()
                .is_some_and(|m| m.to_lowercase().contains(&needle))
    }

    /// Value of the units in stock.
    pub fn inventory_value(&self) -> Option<Money> {
        self.price.try_multiply(self.stock.max(0))
    }
}

/// Admin form payload for creating or editing a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    /// Price in pesos.
    pub price: i64,
    pub stock: i64,
    pub image_url: Option<String>,
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub collection_ids: Vec<CollectionId>,
    pub material: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl ProductDraft {
    /// Pre-fill a draft from an existing product (edit form).
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.amount,
            stock: product.stock,
            image_url: product.image_url.clone(),
            category_id: product.category_id.clone(),
            collection_ids: product.collection_ids.clone(),
            material: product.material.clone(),
            active: product.active,
        }
    }

    /// Trim text fields and drop empty optionals.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.description = self.description.trim().to_string();
        self.image_url = non_blank(self.image_url);
        self.material = non_blank(self.material);
        self.collection_ids.sort();
        self.collection_ids.dedup();
        self
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("name", validation::required(&self.name, "El nombre"));
        errors.check(
            "description",
            validation::required(&self.description, "La descripción"),
        );
        errors.check("price", validation::positive_price(self.price));
        errors.check("stock", validation::non_negative(self.stock, "El stock"));
        if self.category_id.is_none() {
            errors.add("category_id", "La categoría es obligatoria");
        }
        if let Some(url) = self.image_url.as_deref() {
            errors.check("image_url", validation::url(url));
        }
        errors.into_result()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring() -> Product {
        let mut p = Product::new("1", "Anillo Luna", Money::clp(45990));
        p.description = "Anillo de plata con piedra lunar".to_string();
        p.material = Some("Plata 925".to_string());
        p.stock = 5;
        p.category_id = Some(CategoryId::new("anillos"));
        p.collection_ids = vec![CollectionId::new("noche")];
        p
    }

    fn valid_draft() -> ProductDraft {
        ProductDraft {
            name: "Collar Sol".to_string(),
            description: "Collar bañado en oro".to_string(),
            price: 39990,
            stock: 4,
            category_id: Some(CategoryId::new("collares")),
            active: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_availability() {
        let mut p = ring();
        assert!(p.is_available());
        p.stock = 0;
        assert!(!p.is_available());
        p.stock = 2;
        p.active = false;
        assert!(!p.is_available());
    }

    #[test]
    fn test_matches_text_is_case_insensitive() {
        let p = ring();
        assert!(p.matches_text("LUNA"));
        assert!(p.matches_text("piedra"));
        assert!(p.matches_text("plata 925"));
        assert!(p.matches_text("  "));
        assert!(!p.matches_text("oro"));
    }

    #[test]
    fn test_category_and_collection_membership() {
        let p = ring();
        assert!(p.in_category(&CategoryId::new("anillos")));
        assert!(!p.in_category(&CategoryId::new("aros")));
        assert!(p.in_collection(&CollectionId::new("noche")));
    }

    #[test]
    fn test_deserialize_backend_payload() {
        let json = r#"{
            "id": 7,
            "name": "Aros Perla",
            "description": "Aros con perla cultivada",
            "price": 24990,
            "stock": 2,
            "category_id": 3,
            "collection_ids": [1, "verano"]
        }"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert_eq!(p.id.as_str(), "7");
        assert_eq!(p.price, Money::clp(24990));
        assert!(p.active);
        assert!(p.is_low_stock());
        assert_eq!(p.collection_ids.len(), 2);
    }

    #[test]
    fn test_draft_validation_passes() {
        assert!(valid_draft().validate().is_ok());
    }

    #[test]
    fn test_draft_validation_reports_each_field() {
        let draft = ProductDraft {
            price: 0,
            stock: -1,
            image_url: Some("not a url".to_string()),
            ..Default::default()
        };
        let errors = draft.validate().unwrap_err();
        for field in ["name", "description", "price", "stock", "category_id", "image_url"] {
            assert!(errors.has(field), "missing error for {field}");
        }
    }

    #[test]
    fn test_draft_normalized_trims_and_drops_blank() {
        let mut draft = valid_draft();
        draft.name = "  Collar Sol ".to_string();
        draft.image_url = Some("   ".to_string());
        draft.collection_ids = vec![CollectionId::new("b"), CollectionId::new("a"), CollectionId::new("b")];
        let draft = draft.normalized();
        assert_eq!(draft.name, "Collar Sol");
        assert_eq!(draft.image_url, None);
        assert_eq!(draft.collection_ids, vec![CollectionId::new("a"), CollectionId::new("b")]);
    }

    #[test]
    fn test_draft_from_product_round_trips_fields() {
        let p = ring();
        let draft = ProductDraft::from_product(&p);
        assert_eq!(draft.price, 45990);
        assert_eq!(draft.category_id, p.category_id);
    }
}
