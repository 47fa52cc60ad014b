//! Query-string encoding of listing filters.
//!
//! Encoding is canonical: keys appear in [`FilterKey::ALL`] order, set
//! values once each in sorted order, and defaults are left out. A spec
//! with nothing set encodes to the empty string.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::catalog::ProductType;
use crate::search::{FilterDimension, FilterKey, FilterSpec, SortKey, ViewMode};

/// What happens to the page number when a link changes the filters.
///
/// Encoding never applies this on its own; the page building the link
/// picks the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageReset {
    /// Keep the current page.
    Keep,
    /// Jump back to page 1.
    #[default]
    FirstPage,
}

impl PageReset {
    pub fn apply(&self, spec: FilterSpec) -> FilterSpec {
        match self {
            PageReset::Keep => spec,
            PageReset::FirstPage => spec.with_page(1),
        }
    }
}

/// One removable "active filter" chip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveFilter {
    pub key: FilterKey,
    /// Canonical encoded value.
    pub value: String,
    pub label: String,
    /// Query string of the listing with this value removed.
    pub remove_query: String,
}

/// Converts [`FilterSpec`]s to and from query strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterUrlCodec;

impl FilterUrlCodec {
    /// Decode a query string (with or without the leading `?`).
    pub fn decode(query: &str) -> FilterSpec {
        let query = query.strip_prefix('?').unwrap_or(query);
        FilterSpec::from_params(form_urlencoded::parse(query.as_bytes()))
    }

    /// Canonical key/value pairs for a spec.
    pub fn pairs(spec: &FilterSpec) -> Vec<(FilterKey, String)> {
        let mut pairs = Vec::new();

        if let Some(text) = spec.search() {
            pairs.push((FilterKey::Search, text.to_string()));
        }
        for slug in spec.categories() {
            pairs.push((FilterKey::Category, slug.clone()));
        }
        if let Some(slug) = spec.subcategory() {
            pairs.push((FilterKey::Subcategory, slug.to_string()));
        }
        for product_type in spec.product_types() {
            pairs.push((FilterKey::Type, product_type.as_str().to_string()));
        }
        if let Some(min) = spec.price_min() {
            pairs.push((FilterKey::MinPrice, min.to_query_value()));
        }
        if let Some(max) = spec.price_max() {
            pairs.push((FilterKey::MaxPrice, max.to_query_value()));
        }
        if spec.in_stock_only() {
            pairs.push((FilterKey::InStock, "true".to_string()));
        }
        if spec.featured_only() {
            pairs.push((FilterKey::Featured, "true".to_string()));
        }
        if spec.sort() != SortKey::default() {
            pairs.push((FilterKey::SortBy, spec.sort().as_str().to_string()));
        }
        if spec.view() != ViewMode::default() {
            pairs.push((FilterKey::View, spec.view().as_str().to_string()));
        }
        if spec.page() != 1 {
            pairs.push((FilterKey::Page, spec.page().to_string()));
        }

        pairs
    }

    /// Encode a spec as a canonical query string (no leading `?`).
    pub fn encode(spec: &FilterSpec) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in Self::pairs(spec) {
            serializer.append_pair(key.as_str(), &value);
        }
        serializer.finish()
    }

    /// Encoded values currently set for `key`.
    pub fn values(spec: &FilterSpec, key: FilterKey) -> Vec<String> {
        Self::pairs(spec)
            .into_iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v)
            .collect()
    }

    /// Whether `value` (in any accepted spelling) is currently set for `key`.
    pub fn is_selected(spec: &FilterSpec, key: FilterKey, value: &str) -> bool {
        normalize(key, value).is_some_and(|value| Self::values(spec, key).contains(&value))
    }

    /// Add one value. Scalar keys are overwritten.
    pub fn add_filter(spec: &FilterSpec, key: FilterKey, value: &str) -> FilterSpec {
        spec.with_param(key, value)
    }

    /// Remove one value of `key`, or the whole key when `value` is `None`.
    ///
    /// Removing a value that isn't set leaves the spec unchanged. The page
    /// is not touched.
    pub fn remove_filter(spec: &FilterSpec, key: FilterKey, value: Option<&str>) -> FilterSpec {
        let Some(value) = value else {
            return clear_key(spec, key);
        };
        if !Self::is_selected(spec, key, value) {
            return spec.clone();
        }
        match key {
            FilterKey::Category => spec.without_category(value.trim()),
            FilterKey::Type => match ProductType::from_str(value) {
                Some(product_type) => spec.without_product_type(product_type),
                None => spec.clone(),
            },
            _ => clear_key(spec, key),
        }
    }

    /// Remove `value` if it is set, add it otherwise.
    pub fn toggle_filter(spec: &FilterSpec, key: FilterKey, value: &str) -> FilterSpec {
        if Self::is_selected(spec, key, value) {
            Self::remove_filter(spec, key, Some(value))
        } else {
            Self::add_filter(spec, key, value)
        }
    }

    /// Query string after removing a value, with a page policy applied.
    pub fn remove_filter_query(
        spec: &FilterSpec,
        key: FilterKey,
        value: Option<&str>,
        reset: PageReset,
    ) -> String {
        Self::encode(&reset.apply(Self::remove_filter(spec, key, value)))
    }

    /// Query string after toggling a value, with a page policy applied.
    pub fn toggle_filter_query(
        spec: &FilterSpec,
        key: FilterKey,
        value: &str,
        reset: PageReset,
    ) -> String {
        Self::encode(&reset.apply(Self::toggle_filter(spec, key, value)))
    }

    /// Same listing, different sort.
    pub fn change_sort(spec: &FilterSpec, sort: SortKey) -> String {
        Self::encode(&spec.clone().with_sort(sort))
    }

    /// Same listing, different layout.
    pub fn change_view(spec: &FilterSpec, view: ViewMode) -> String {
        Self::encode(&spec.clone().with_view(view))
    }

    /// Same listing, different page.
    pub fn change_page(spec: &FilterSpec, page: u32) -> String {
        Self::encode(&spec.clone().with_page(page))
    }

    /// Chips for every active filter value, each linking to the listing
    /// without that value and back on page 1.
    pub fn active_filters(spec: &FilterSpec) -> Vec<ActiveFilter> {
        Self::pairs(spec)
            .into_iter()
            .filter(|(key, _)| !matches!(key, FilterKey::SortBy | FilterKey::View | FilterKey::Page))
            .map(|(key, value)| ActiveFilter {
                label: chip_label(spec, key, &value),
                remove_query: Self::remove_filter_query(
                    spec,
                    key,
                    Some(&value),
                    PageReset::FirstPage,
                ),
                key,
                value,
            })
            .collect()
    }
}

/// Canonical encoding of a raw value, or `None` if it encodes to nothing.
fn normalize(key: FilterKey, value: &str) -> Option<String> {
    let single = FilterSpec::default().with_param(key, value);
    FilterUrlCodec::values(&single, key).into_iter().next()
}

fn clear_key(spec: &FilterSpec, key: FilterKey) -> FilterSpec {
    match key {
        FilterKey::Search => spec.without(FilterDimension::Search),
        FilterKey::Category => spec.without(FilterDimension::Categories),
        FilterKey::Subcategory => spec.without(FilterDimension::Subcategory),
        FilterKey::Type => spec.without(FilterDimension::ProductTypes),
        FilterKey::MinPrice => spec.clone().with_price_min(None),
        FilterKey::MaxPrice => spec.clone().with_price_max(None),
        FilterKey::InStock => spec.without(FilterDimension::InStock),
        FilterKey::Featured => spec.without(FilterDimension::Featured),
        FilterKey::SortBy => spec.clone().with_sort(SortKey::default()),
        FilterKey::View => spec.clone().with_view(ViewMode::default()),
        FilterKey::Page => spec.clone().with_page(1),
    }
}

fn chip_label(spec: &FilterSpec, key: FilterKey, value: &str) -> String {
    match key {
        FilterKey::Search => format!("Search: \"{}\"", value),
        FilterKey::Type => ProductType::from_str(value)
            .map(|t| t.label().to_string())
            .unwrap_or_else(|| value.to_string()),
        FilterKey::MinPrice => spec
            .price_min()
            .map(|p| format!("From {}", p.display()))
            .unwrap_or_default(),
        FilterKey::MaxPrice => spec
            .price_max()
            .map(|p| format!("Up to {}", p.display()))
            .unwrap_or_default(),
        FilterKey::InStock => "In stock".to_string(),
        FilterKey::Featured => "Featured".to_string(),
        _ => value.to_string(),
    }
}
