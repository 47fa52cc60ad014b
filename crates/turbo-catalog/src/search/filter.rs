//! Normalized listing filters.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::ProductType;
use crate::money::{Price, Rounding};
use crate::search::SortKey;

/// Layout requested for a listing. Has no effect on the query itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    Compact,
    List,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::Compact => "compact",
            ViewMode::List => "list",
        }
    }

    /// Parse a view token, falling back to the grid layout.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "compact" => ViewMode::Compact,
            "list" => ViewMode::List,
            _ => ViewMode::Grid,
        }
    }
}

/// Query-string keys understood by the listing pages, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterKey {
    Search,
    Category,
    Subcategory,
    Type,
    MinPrice,
    MaxPrice,
    InStock,
    Featured,
    SortBy,
    View,
    Page,
}

impl FilterKey {
    /// All keys in the order they are encoded.
    pub const ALL: [FilterKey; 11] = [
        FilterKey::Search,
        FilterKey::Category,
        FilterKey::Subcategory,
        FilterKey::Type,
        FilterKey::MinPrice,
        FilterKey::MaxPrice,
        FilterKey::InStock,
        FilterKey::Featured,
        FilterKey::SortBy,
        FilterKey::View,
        FilterKey::Page,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::Search => "search",
            FilterKey::Category => "category",
            FilterKey::Subcategory => "subcategory",
            FilterKey::Type => "type",
            FilterKey::MinPrice => "minPrice",
            FilterKey::MaxPrice => "maxPrice",
            FilterKey::InStock => "inStock",
            FilterKey::Featured => "featured",
            FilterKey::SortBy => "sortBy",
            FilterKey::View => "view",
            FilterKey::Page => "page",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        FilterKey::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// Whether the key may repeat in a query string.
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, FilterKey::Category | FilterKey::Type)
    }
}

/// One filterable dimension of a [`FilterSpec`].
///
/// Facets drop exactly their own dimension before aggregating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterDimension {
    Search,
    Categories,
    Subcategory,
    ProductTypes,
    Price,
    InStock,
    Featured,
}

/// All filter, sort and page state for one listing request.
///
/// Built once per request and never changed afterwards; every transform
/// returns a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    search: Option<String>,
    categories: BTreeSet<String>,
    subcategory: Option<String>,
    product_types: BTreeSet<ProductType>,
    price_min: Option<Price>,
    price_max: Option<Price>,
    in_stock_only: bool,
    featured_only: bool,
    sort: SortKey,
    view: ViewMode,
    page: u32,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            search: None,
            categories: BTreeSet::new(),
            subcategory: None,
            product_types: BTreeSet::new(),
            price_min: None,
            price_max: None,
            in_stock_only: false,
            featured_only: false,
            sort: SortKey::default(),
            view: ViewMode::default(),
            page: 1,
        }
    }
}

impl FilterSpec {
    /// Create an empty spec (no filters, default sort, page 1).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a spec from raw request parameters.
    ///
    /// Keys may repeat. Unknown keys are skipped and malformed values
    /// degrade to "not set"; this never fails. For scalar keys the last
    /// occurrence wins.
    pub fn from_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut spec = Self::default();
        for (key, value) in params {
            if let Some(key) = FilterKey::from_str(key.as_ref()) {
                spec.apply_param(key, value.as_ref());
            }
        }
        spec
    }

    /// Copy of this spec with one raw parameter applied, as if it had
    /// appeared last in the query string.
    pub(crate) fn with_param(&self, key: FilterKey, value: &str) -> Self {
        let mut spec = self.clone();
        spec.apply_param(key, value);
        spec
    }

    fn apply_param(&mut self, key: FilterKey, value: &str) {
        match key {
            FilterKey::Search => self.search = non_blank(value),
            FilterKey::Category => {
                if let Some(slug) = non_blank(value) {
                    self.categories.insert(slug);
                }
            }
            FilterKey::Subcategory => self.subcategory = non_blank(value),
            FilterKey::Type => {
                if let Some(t) = ProductType::from_str(value) {
                    self.product_types.insert(t);
                }
            }
            // Bounds round inward so whole-cent prices compare exactly.
            FilterKey::MinPrice => self.price_min = Price::parse_rounded(value, Rounding::Up),
            FilterKey::MaxPrice => self.price_max = Price::parse_rounded(value, Rounding::Down),
            FilterKey::InStock => self.in_stock_only = parse_flag(value),
            FilterKey::Featured => self.featured_only = parse_flag(value),
            FilterKey::SortBy => self.sort = SortKey::from_str(value),
            FilterKey::View => self.view = ViewMode::from_str(value),
            FilterKey::Page => self.page = parse_page(value),
        }
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    pub fn subcategory(&self) -> Option<&str> {
        self.subcategory.as_deref()
    }

    pub fn product_types(&self) -> &BTreeSet<ProductType> {
        &self.product_types
    }

    pub fn price_min(&self) -> Option<Price> {
        self.price_min
    }

    pub fn price_max(&self) -> Option<Price> {
        self.price_max
    }

    pub fn in_stock_only(&self) -> bool {
        self.in_stock_only
    }

    pub fn featured_only(&self) -> bool {
        self.featured_only
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    /// Current page, always at least 1.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Whether any filter dimension is set. Sort, view and page don't count.
    pub fn has_active_filters(&self) -> bool {
        self.search.is_some()
            || !self.categories.is_empty()
            || self.subcategory.is_some()
            || !self.product_types.is_empty()
            || self.price_min.is_some()
            || self.price_max.is_some()
            || self.in_stock_only
            || self.featured_only
    }

    /// Set the free-text search. Blank text clears it.
    pub fn with_search(mut self, text: impl AsRef<str>) -> Self {
        self.search = non_blank(text.as_ref());
        self
    }

    /// Add a category slug.
    pub fn with_category(mut self, slug: impl AsRef<str>) -> Self {
        if let Some(slug) = non_blank(slug.as_ref()) {
            self.categories.insert(slug);
        }
        self
    }

    /// Set the subcategory slug.
    pub fn with_subcategory(mut self, slug: impl AsRef<str>) -> Self {
        self.subcategory = non_blank(slug.as_ref());
        self
    }

    /// Add a product type.
    pub fn with_product_type(mut self, product_type: ProductType) -> Self {
        self.product_types.insert(product_type);
        self
    }

    pub fn with_price_min(mut self, price: Option<Price>) -> Self {
        self.price_min = price;
        self
    }

    pub fn with_price_max(mut self, price: Option<Price>) -> Self {
        self.price_max = price;
        self
    }

    pub fn with_in_stock_only(mut self, enabled: bool) -> Self {
        self.in_stock_only = enabled;
        self
    }

    pub fn with_featured_only(mut self, enabled: bool) -> Self {
        self.featured_only = enabled;
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_view(mut self, view: ViewMode) -> Self {
        self.view = view;
        self
    }

    /// Set the page. Zero is clamped to 1.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Remove one category slug, keeping the others.
    pub fn without_category(&self, slug: &str) -> Self {
        let mut spec = self.clone();
        spec.categories.remove(slug);
        spec
    }

    /// Remove one product type, keeping the others.
    pub fn without_product_type(&self, product_type: ProductType) -> Self {
        let mut spec = self.clone();
        spec.product_types.remove(&product_type);
        spec
    }

    /// Copy of this spec with exactly one dimension cleared.
    pub fn without(&self, dimension: FilterDimension) -> Self {
        let mut spec = self.clone();
        match dimension {
            FilterDimension::Search => spec.search = None,
            FilterDimension::Categories => spec.categories.clear(),
            FilterDimension::Subcategory => spec.subcategory = None,
            FilterDimension::ProductTypes => spec.product_types.clear(),
            FilterDimension::Price => {
                spec.price_min = None;
                spec.price_max = None;
            }
            FilterDimension::InStock => spec.in_stock_only = false,
            FilterDimension::Featured => spec.featured_only = false,
        }
        spec
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn parse_page(value: &str) -> u32 {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|page| *page >= 1)
        .map(|page| u32::try_from(page).unwrap_or(u32::MAX))
        .unwrap_or(1)
}
