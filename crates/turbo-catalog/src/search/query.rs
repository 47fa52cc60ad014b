//! Query planning for listing pages.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogEntry, ProductStatus, ProductType};
use crate::ids::{CategoryId, SubcategoryId};
use crate::money::Price;
use crate::search::FilterSpec;

/// Sort options for listing pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Most viewed first.
    #[default]
    Popularity,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
    /// Sort by highest rated.
    Rating,
    /// Sort by newest first.
    Newest,
}

impl SortKey {
    /// Parse a `sortBy` token. Unknown tokens fall back to popularity.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "price-asc" => SortKey::PriceAsc,
            "price-desc" => SortKey::PriceDesc,
            "rating" => SortKey::Rating,
            "newest" => SortKey::Newest,
            _ => SortKey::Popularity,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Popularity => "popularity",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::Rating => "rating",
            SortKey::Newest => "newest",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortKey::Popularity => "Most Popular",
            SortKey::PriceAsc => "Price: Low to High",
            SortKey::PriceDesc => "Price: High to Low",
            SortKey::Rating => "Highest Rated",
            SortKey::Newest => "Newest",
        }
    }

    /// Primary sort term for this key.
    pub fn primary_term(&self) -> SortTerm {
        match self {
            SortKey::Popularity => SortTerm::desc(SortField::ViewCount),
            SortKey::PriceAsc => SortTerm::asc(SortField::Price),
            SortKey::PriceDesc => SortTerm::desc(SortField::Price),
            SortKey::Rating => SortTerm::desc(SortField::Rating),
            SortKey::Newest => SortTerm::desc(SortField::CreatedAt),
        }
    }
}

/// Which slice of the catalog a listing covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Scope {
    /// The whole catalog.
    #[default]
    All,
    /// One category.
    Category(CategoryId),
    /// One subcategory of a category.
    Subcategory {
        category: CategoryId,
        subcategory: SubcategoryId,
    },
}

impl Scope {
    /// Base predicates every query in this scope carries.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = vec![Predicate::Status(ProductStatus::Active)];
        match self {
            Scope::All => {}
            Scope::Category(category) => {
                predicates.push(Predicate::InCategory(category.clone()));
            }
            Scope::Subcategory {
                category,
                subcategory,
            } => {
                predicates.push(Predicate::InCategory(category.clone()));
                predicates.push(Predicate::InSubcategory(subcategory.clone()));
            }
        }
        predicates
    }

    /// The enclosing scope whose children are this scope's siblings.
    pub fn parent(&self) -> Scope {
        match self {
            Scope::Subcategory { category, .. } => Scope::Category(category.clone()),
            other => other.clone(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::All => write!(f, "all"),
            Scope::Category(id) => write!(f, "category:{}", id),
            Scope::Subcategory {
                category,
                subcategory,
            } => write!(f, "subcategory:{}/{}", category, subcategory),
        }
    }
}

/// A single condition of a query. A plan matches entries satisfying all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Predicate {
    /// Entry has the given status.
    Status(ProductStatus),
    /// Entry belongs to the category (scope).
    InCategory(CategoryId),
    /// Entry belongs to the subcategory (scope).
    InSubcategory(SubcategoryId),
    /// Name or description contains the text, case-insensitively.
    TextMatch(String),
    /// Category slug is one of the values.
    CategorySlugIn(Vec<String>),
    /// Subcategory slug equals the value.
    SubcategorySlug(String),
    /// Product type is one of the values.
    ProductTypeIn(Vec<ProductType>),
    /// `price >= min`.
    PriceAtLeast(Price),
    /// `price <= max`.
    PriceAtMost(Price),
    /// At least one unit in stock.
    InStock,
    /// Flagged as featured.
    Featured,
}

impl Predicate {
    /// Evaluate against an in-memory entry.
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        match self {
            Predicate::Status(status) => entry.status == *status,
            Predicate::InCategory(id) => entry.category_id == *id,
            Predicate::InSubcategory(id) => entry.subcategory_id.as_ref() == Some(id),
            Predicate::TextMatch(text) => {
                let needle = text.to_lowercase();
                entry.name.to_lowercase().contains(&needle)
                    || entry
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            }
            Predicate::CategorySlugIn(slugs) => slugs.contains(&entry.category_slug),
            Predicate::SubcategorySlug(slug) => {
                entry.subcategory_slug.as_deref() == Some(slug.as_str())
            }
            Predicate::ProductTypeIn(types) => types.contains(&entry.product_type),
            Predicate::PriceAtLeast(min) => entry.price >= *min,
            Predicate::PriceAtMost(max) => entry.price <= *max,
            Predicate::InStock => entry.is_in_stock(),
            Predicate::Featured => entry.featured,
        }
    }
}

/// Sortable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    ViewCount,
    Price,
    Rating,
    CreatedAt,
    Id,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One `ORDER BY` term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortTerm {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortTerm {
    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

/// A store-agnostic description of one listing page query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPlan {
    /// Conditions, AND-ed together.
    pub predicates: Vec<Predicate>,
    /// Sort terms in priority order. The last term is always `id ASC`.
    pub sort: Vec<SortTerm>,
    /// Entries to skip.
    pub offset: u64,
    /// Maximum entries to return.
    pub limit: u32,
}

/// Turns a [`FilterSpec`] and a [`Scope`] into a [`QueryPlan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPlanner {
    page_size: u32,
}

impl QueryPlanner {
    /// Create a planner. A zero page size is raised to 1.
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Scope predicates followed by one predicate per active filter.
    pub fn predicates(&self, spec: &FilterSpec, scope: &Scope) -> Vec<Predicate> {
        let mut predicates = scope.predicates();

        if let Some(text) = spec.search() {
            predicates.push(Predicate::TextMatch(text.to_string()));
        }
        if !spec.categories().is_empty() {
            predicates.push(Predicate::CategorySlugIn(
                spec.categories().iter().cloned().collect(),
            ));
        }
        if let Some(slug) = spec.subcategory() {
            predicates.push(Predicate::SubcategorySlug(slug.to_string()));
        }
        if !spec.product_types().is_empty() {
            predicates.push(Predicate::ProductTypeIn(
                spec.product_types().iter().copied().collect(),
            ));
        }
        if let Some(min) = spec.price_min() {
            predicates.push(Predicate::PriceAtLeast(min));
        }
        if let Some(max) = spec.price_max() {
            predicates.push(Predicate::PriceAtMost(max));
        }
        if spec.in_stock_only() {
            predicates.push(Predicate::InStock);
        }
        if spec.featured_only() {
            predicates.push(Predicate::Featured);
        }

        predicates
    }

    /// Sort terms for a key, ending with the `id ASC` tie-breaker.
    pub fn sort_terms(&self, sort: SortKey) -> Vec<SortTerm> {
        vec![sort.primary_term(), SortTerm::asc(SortField::Id)]
    }

    /// Offset of the first entry on `page`.
    pub fn offset(&self, page: u32) -> u64 {
        u64::from(page.max(1) - 1) * u64::from(self.page_size)
    }

    /// Full plan for the page the spec asks for.
    pub fn plan(&self, spec: &FilterSpec, scope: &Scope) -> QueryPlan {
        QueryPlan {
            predicates: self.predicates(spec, scope),
            sort: self.sort_terms(spec.sort()),
            offset: self.offset(spec.page()),
            limit: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_tokens() {
        assert_eq!(SortKey::from_str("price-asc"), SortKey::PriceAsc);
        assert_eq!(SortKey::from_str("price-desc"), SortKey::PriceDesc);
        assert_eq!(SortKey::from_str("rating"), SortKey::Rating);
        assert_eq!(SortKey::from_str("newest"), SortKey::Newest);
        assert_eq!(SortKey::from_str("popularity"), SortKey::Popularity);
        assert_eq!(SortKey::from_str("cheapest"), SortKey::Popularity);
        assert_eq!(SortKey::from_str(""), SortKey::Popularity);
    }

    #[test]
    fn test_sort_table() {
        let planner = QueryPlanner::new(12);
        let expected = [
            (SortKey::Popularity, SortTerm::desc(SortField::ViewCount)),
            (SortKey::PriceAsc, SortTerm::asc(SortField::Price)),
            (SortKey::PriceDesc, SortTerm::desc(SortField::Price)),
            (SortKey::Rating, SortTerm::desc(SortField::Rating)),
            (SortKey::Newest, SortTerm::desc(SortField::CreatedAt)),
        ];
        for (key, primary) in expected {
            let terms = planner.sort_terms(key);
            assert_eq!(terms, vec![primary, SortTerm::asc(SortField::Id)]);
        }
    }

    #[test]
    fn test_empty_spec_plans_active_only() {
        let plan = QueryPlanner::new(12).plan(&FilterSpec::new(), &Scope::All);
        assert_eq!(plan.predicates, vec![Predicate::Status(ProductStatus::Active)]);
        assert_eq!(plan.offset, 0);
        assert_eq!(plan.limit, 12);
    }

    #[test]
    fn test_scope_predicates() {
        let planner = QueryPlanner::new(12);
        let category = Scope::Category(CategoryId::new("c-1"));
        let plan = planner.plan(&FilterSpec::new(), &category);
        assert_eq!(
            plan.predicates,
            vec![
                Predicate::Status(ProductStatus::Active),
                Predicate::InCategory(CategoryId::new("c-1")),
            ]
        );

        let sub = Scope::Subcategory {
            category: CategoryId::new("c-1"),
            subcategory: SubcategoryId::new("s-2"),
        };
        let plan = planner.plan(&FilterSpec::new(), &sub);
        assert!(plan
            .predicates
            .contains(&Predicate::InSubcategory(SubcategoryId::new("s-2"))));
        assert_eq!(sub.parent(), category);
    }

    #[test]
    fn test_filters_are_anded_in() {
        let spec = FilterSpec::new()
            .with_search("router")
            .with_category("storage")
            .with_category("networking")
            .with_product_type(ProductType::Configurable)
            .with_price_min(Price::parse("10"))
            .with_in_stock_only(true);
        let plan = QueryPlanner::new(12).plan(&spec, &Scope::All);

        assert_eq!(
            plan.predicates,
            vec![
                Predicate::Status(ProductStatus::Active),
                Predicate::TextMatch("router".to_string()),
                Predicate::CategorySlugIn(vec!["networking".to_string(), "storage".to_string()]),
                Predicate::ProductTypeIn(vec![ProductType::Configurable]),
                Predicate::PriceAtLeast(Price::from_cents(1000)),
                Predicate::InStock,
            ]
        );
    }

    #[test]
    fn test_offset_and_limit() {
        let planner = QueryPlanner::new(12);
        let plan = planner.plan(&FilterSpec::new().with_page(3), &Scope::All);
        assert_eq!(plan.offset, 24);
        assert_eq!(plan.limit, 12);
        assert_eq!(planner.offset(0), 0);
        assert_eq!(planner.offset(u32::MAX), u64::from(u32::MAX - 1) * 12);
        assert_eq!(QueryPlanner::new(0).page_size(), 1);
    }

    #[test]
    fn test_predicate_matching() {
        let mut entry = CatalogEntry::new("p-1", "Edge Router", "c-1", "networking", Price::from_cents(5000));
        entry.description = Some("Dual WAN".to_string());
        entry.stock = 3;

        assert!(Predicate::TextMatch("router".into()).matches(&entry));
        assert!(Predicate::TextMatch("wan".into()).matches(&entry));
        assert!(!Predicate::TextMatch("switch".into()).matches(&entry));
        assert!(Predicate::PriceAtLeast(Price::from_cents(5000)).matches(&entry));
        assert!(Predicate::PriceAtMost(Price::from_cents(5000)).matches(&entry));
        assert!(!Predicate::PriceAtMost(Price::from_cents(4999)).matches(&entry));
        assert!(Predicate::InStock.matches(&entry));
        assert!(!Predicate::Featured.matches(&entry));
        assert!(!Predicate::SubcategorySlug("routers".into()).matches(&entry));
    }
}
