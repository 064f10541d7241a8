//! Search query builder.

use crate::catalog::Product;
use crate::ids::{CategoryId, CollectionId};
use crate::search::{Page, Pagination};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Default page size of product listings.
pub const DEFAULT_PER_PAGE: usize = 12;

/// Sort options for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    /// Catalog order as returned by the API.
    #[default]
    Featured,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
    /// Sort by name A-Z.
    NameAsc,
    /// Sort by newest first.
    Newest,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Featured => "featured",
            SortOption::PriceAsc => "price_asc",
            SortOption::PriceDesc => "price_desc",
            SortOption::NameAsc => "name_asc",
            SortOption::Newest => "newest",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Featured => "Destacados",
            SortOption::PriceAsc => "Precio: menor a mayor",
            SortOption::PriceDesc => "Precio: mayor a menor",
            SortOption::NameAsc => "Nombre: A-Z",
            SortOption::Newest => "Más recientes",
        }
    }

    pub fn all() -> &'static [SortOption] {
        &[
            SortOption::Featured,
            SortOption::PriceAsc,
            SortOption::PriceDesc,
            SortOption::NameAsc,
            SortOption::Newest,
        ]
    }

    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortOption::Featured => Ordering::Equal,
            SortOption::PriceAsc => a.price.amount.cmp(&b.price.amount),
            SortOption::PriceDesc => b.price.amount.cmp(&a.price.amount),
            SortOption::NameAsc => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            // Products without a creation date go last.
            SortOption::Newest => match (&a.created_at, &b.created_at) {
                (Some(a), Some(b)) => b.cmp(a),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

impl std::str::FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOption::all()
            .iter()
            .copied()
            .find(|o| o.as_str() == s.replace('-', "_"))
            .ok_or_else(|| format!("Orden desconocido: {s}"))
    }
}

/// A product listing query: text, taxonomy filters, sort and page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchQuery {
    /// Free text, matched against name, description and material.
    pub text: Option<String>,
    pub category_id: Option<CategoryId>,
    pub collection_id: Option<CollectionId>,
    /// Minimum price in pesos (inclusive).
    pub min_price: Option<i64>,
    /// Maximum price in pesos (inclusive).
    pub max_price: Option<i64>,
    /// Hide products without stock.
    pub only_available: bool,
    /// Show inactive products (back-office listings).
    pub include_inactive: bool,
    pub sort: SortOption,
    /// Current page (1-indexed).
    pub page: usize,
    pub per_page: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            text: None,
            category_id: None,
            collection_id: None,
            min_price: None,
            max_price: None,
            only_available: false,
            include_inactive: false,
            sort: SortOption::Featured,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text query. Blank text is ignored.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        let text = text.trim();
        self.text = (!text.is_empty()).then(|| text.to_string());
        self
    }

    pub fn with_category(mut self, id: impl Into<CategoryId>) -> Self {
        self.category_id = Some(id.into());
        self
    }

    pub fn with_collection(mut self, id: impl Into<CollectionId>) -> Self {
        self.collection_id = Some(id.into());
        self
    }

    pub fn with_price_range(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn only_available(mut self) -> Self {
        self.only_available = true;
        self
    }

    pub fn include_inactive(mut self) -> Self {
        self.include_inactive = true;
        self
    }

    /// Set sort option.
    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Set pagination.
    pub fn with_pagination(mut self, page: usize, per_page: usize) -> Self {
        self.page = page.max(1);
        self.per_page = per_page.clamp(1, 100);
        self
    }

    /// Whether a product passes every filter of this query.
    pub fn matches(&self, product: &Product) -> bool {
        if !self.include_inactive && !product.active {
            return false;
        }
        if self.only_available && !product.is_available() {
            return false;
        }
        if let Some(text) = &self.text {
            if !product.matches_text(text) {
                return false;
            }
        }
        if let Some(category_id) = &self.category_id {
            if !product.in_category(category_id) {
                return false;
            }
        }
        if let Some(collection_id) = &self.collection_id {
            if !product.in_collection(collection_id) {
                return false;
            }
        }
        if self.min_price.is_some_and(|min| product.price.amount < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price.amount > max) {
            return false;
        }
        true
    }

    /// Filter, sort and slice a product list.
    pub fn apply(&self, products: &[Product]) -> Page<Product> {
        let mut matched: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();
        // Stable: ties keep catalog order.
        matched.sort_by(|a, b| self.sort.compare(a, b));

        let pagination = Pagination::new(self.page, self.per_page, matched.len());
        let items = matched
            .into_iter()
            .skip(pagination.offset())
            .take(pagination.per_page)
            .cloned()
            .collect();

        Page::new(items, pagination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::{TimeZone, Utc};

    fn catalog() -> Vec<Product> {
        let mut products = Vec::new();
        for (i, (name, price, category)) in [
            ("Anillo Luna", 45990, "anillos"),
            ("Collar Sol", 39990, "collares"),
            ("anillo Estrella", 29990, "anillos"),
            ("Aros Perla", 24990, "aros"),
            ("Pulsera Mar", 19990, "pulseras"),
        ]
        .into_iter()
        .enumerate()
        {
            let mut p = Product::new((i + 1).to_string(), name, Money::clp(price));
            p.stock = 5;
            p.category_id = Some(CategoryId::new(category));
            p.created_at = Some(Utc.with_ymd_and_hms(2026, 1, 1 + i as u32, 0, 0, 0).unwrap());
            products.push(p);
        }
        products[3].collection_ids = vec![CollectionId::new("novias")];
        products[1].collection_ids = vec![CollectionId::new("novias")];
        products
    }

    fn names(page: &Page<Product>) -> Vec<&str> {
        page.items.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_query_builder() {
        let query = SearchQuery::new()
            .with_text("  luna ")
            .with_sort(SortOption::PriceAsc)
            .with_pagination(0, 500);

        assert_eq!(query.text.as_deref(), Some("luna"));
        assert_eq!(query.page, 1);
        assert_eq!(query.per_page, 100);
        assert!(SearchQuery::new().with_text("   ").text.is_none());
    }

    #[test]
    fn test_text_search() {
        let page = SearchQuery::new().with_text("ANILLO").apply(&catalog());
        assert_eq!(names(&page), vec!["Anillo Luna", "anillo Estrella"]);
    }

    #[test]
    fn test_category_and_collection_filters() {
        let page = SearchQuery::new().with_category("anillos").apply(&catalog());
        assert_eq!(page.pagination.total, 2);

        let page = SearchQuery::new()
            .with_collection("novias")
            .with_sort(SortOption::PriceAsc)
            .apply(&catalog());
        assert_eq!(names(&page), vec!["Aros Perla", "Collar Sol"]);
    }

    #[test]
    fn test_sorting() {
        let products = catalog();
        let by = |sort| names(&SearchQuery::new().with_sort(sort).apply(&products))
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        assert_eq!(by(SortOption::PriceDesc)[0], "Anillo Luna");
        assert_eq!(by(SortOption::PriceAsc)[0], "Pulsera Mar");
        assert_eq!(by(SortOption::NameAsc)[0], "anillo Estrella");
        assert_eq!(by(SortOption::Newest)[0], "Pulsera Mar");
        assert_eq!(by(SortOption::Featured)[0], "Anillo Luna");
    }

    #[test]
    fn test_inactive_and_unavailable_hidden() {
        let mut products = catalog();
        products[0].active = false;
        products[1].stock = 0;

        assert_eq!(SearchQuery::new().apply(&products).pagination.total, 4);
        assert_eq!(
            SearchQuery::new().only_available().apply(&products).pagination.total,
            3
        );
        assert_eq!(
            SearchQuery::new().include_inactive().apply(&products).pagination.total,
            5
        );
    }

    #[test]
    fn test_price_range() {
        let page = SearchQuery::new()
            .with_price_range(Some(20000), Some(40000))
            .apply(&catalog());
        assert_eq!(page.pagination.total, 3);
    }

    #[test]
    fn test_pagination_slices() {
        let page = SearchQuery::new().with_pagination(2, 2).apply(&catalog());
        assert_eq!(names(&page), vec!["anillo Estrella", "Aros Perla"]);
        assert_eq!(page.pagination.total_pages, 3);

        let last = SearchQuery::new().with_pagination(9, 2).apply(&catalog());
        assert_eq!(last.pagination.page, 3);
        assert_eq!(names(&last), vec!["Pulsera Mar"]);
    }

    #[test]
    fn test_sort_option_from_str() {
        assert_eq!("price-desc".parse::<SortOption>().unwrap(), SortOption::PriceDesc);
        assert!("rating".parse::<SortOption>().is_err());
    }
}
