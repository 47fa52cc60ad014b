//! Listable catalog entries.

use crate::ids::{CategoryId, ProductId, SubcategoryId};
use crate::money::Price;
use serde::{Deserialize, Serialize};

/// Product status in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// Product is in draft mode, not visible to customers.
    Draft,
    /// Product is active and visible.
    #[default]
    Active,
    /// Product is archived, not visible but data preserved.
    Archived,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "draft",
            ProductStatus::Active => "active",
            ProductStatus::Archived => "archived",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(ProductStatus::Draft),
            "active" => Some(ProductStatus::Active),
            "archived" => Some(ProductStatus::Archived),
            _ => None,
        }
    }
}

/// Product type classification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    /// Sold on its own.
    #[default]
    Standalone,
    /// Sold with optional add-on products.
    WithAddons,
    /// Assembled from configurable options.
    Configurable,
}

impl ProductType {
    /// All types, in facet display order.
    pub const ALL: [ProductType; 3] = [
        ProductType::Standalone,
        ProductType::WithAddons,
        ProductType::Configurable,
    ];

    /// Token used in URLs and store discriminator columns.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Standalone => "STANDALONE",
            ProductType::WithAddons => "WITH_ADDONS",
            ProductType::Configurable => "CONFIGURABLE",
        }
    }

    /// Parse a type token. Case and `-`/`_` are not significant.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "STANDALONE" => Some(ProductType::Standalone),
            "WITH_ADDONS" => Some(ProductType::WithAddons),
            "CONFIGURABLE" => Some(ProductType::Configurable),
            _ => None,
        }
    }

    /// Human-readable label for facet lists and filter chips.
    pub fn label(&self) -> &'static str {
        match self {
            ProductType::Standalone => "Standalone",
            ProductType::WithAddons => "With add-ons",
            ProductType::Configurable => "Configurable",
        }
    }
}

/// A product as seen by the listing engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// URL-friendly slug (unique).
    pub slug: String,
    /// Short description used by text search.
    #[serde(default)]
    pub description: Option<String>,
    /// Product visibility status.
    #[serde(default)]
    pub status: ProductStatus,
    /// Type of product.
    #[serde(default)]
    pub product_type: ProductType,
    /// Owning category.
    pub category_id: CategoryId,
    /// Slug of the owning category.
    pub category_slug: String,
    /// Owning subcategory, if any.
    #[serde(default)]
    pub subcategory_id: Option<SubcategoryId>,
    /// Slug of the owning subcategory.
    #[serde(default)]
    pub subcategory_slug: Option<String>,
    /// Current selling price.
    pub price: Price,
    /// Units in stock.
    #[serde(default)]
    pub stock: i64,
    /// Whether the product is flagged as featured.
    #[serde(default)]
    pub featured: bool,
    /// Average review rating, 0.0 to 5.0.
    #[serde(default)]
    pub rating: f64,
    /// Number of product page views.
    #[serde(default)]
    pub view_count: i64,
    /// Unix timestamp of creation.
    #[serde(default)]
    pub created_at: i64,
}

impl CatalogEntry {
    /// Create an active standalone entry with zeroed metrics.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        category_id: impl Into<CategoryId>,
        category_slug: impl Into<String>,
        price: Price,
    ) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            slug: slugify(&name),
            name,
            description: None,
            status: ProductStatus::Active,
            product_type: ProductType::Standalone,
            category_id: category_id.into(),
            category_slug: category_slug.into(),
            subcategory_id: None,
            subcategory_slug: None,
            price,
            stock: 0,
            featured: false,
            rating: 0.0,
            view_count: 0,
            created_at: 0,
        }
    }

    /// Place the entry in a subcategory.
    pub fn with_subcategory(
        mut self,
        id: impl Into<SubcategoryId>,
        slug: impl Into<String>,
    ) -> Self {
        self.subcategory_id = Some(id.into());
        self.subcategory_slug = Some(slug.into());
        self
    }

    /// Check if the product is visible in listings.
    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }

    /// Check if at least one unit is in stock.
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }
}

fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CatalogEntry::new(
            "p-1",
            "Managed Switch 24 Port",
            "c-net",
            "networking",
            Price::from_cents(19900),
        );
        assert_eq!(entry.slug, "managed-switch-24-port");
        assert!(entry.is_active());
        assert!(!entry.is_in_stock());
        assert_eq!(entry.product_type, ProductType::Standalone);
    }

    #[test]
    fn test_product_type_tokens() {
        assert_eq!(ProductType::from_str("STANDALONE"), Some(ProductType::Standalone));
        assert_eq!(ProductType::from_str("with-addons"), Some(ProductType::WithAddons));
        assert_eq!(ProductType::from_str("Configurable"), Some(ProductType::Configurable));
        assert_eq!(ProductType::from_str("bundle"), None);
        for t in ProductType::ALL {
            assert_eq!(ProductType::from_str(t.as_str()), Some(t));
        }
    }

    #[test]
    fn test_entry_deserializes_with_defaults() {
        let json = r#"{
            "id": "p-9",
            "name": "Patch Cable",
            "slug": "patch-cable",
            "category_id": "c-net",
            "category_slug": "networking",
            "price": 499,
            "product_type": "WITH_ADDONS"
        }"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.price.cents(), 499);
        assert_eq!(entry.product_type, ProductType::WithAddons);
        assert_eq!(entry.status, ProductStatus::Active);
        assert!(entry.subcategory_id.is_none());
    }
}
