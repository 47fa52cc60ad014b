//! Facet aggregation for listing sidebars.
//!
//! Each facet is computed over the listing's filters with only that
//! facet's own dimension removed. The price slider therefore keeps its
//! bounds while a price range is selected, and the type list keeps every
//! type's count after one type is picked.

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::catalog::ProductType;
use crate::error::StoreError;
use crate::money::PriceRange;
use crate::search::{FilterDimension, FilterSpec, Predicate, QueryPlanner, Scope};
use crate::store::{gated, CatalogStore, GroupCounts, GroupField};

/// Count for one product type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    pub product_type: ProductType,
    pub label: String,
    pub count: u64,
    /// Whether the type is currently selected.
    pub selected: bool,
}

/// Count for one sibling category or subcategory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeCount {
    pub slug: String,
    pub count: u64,
    /// Whether the slug is currently selected as a filter.
    pub selected: bool,
}

/// All facets for one listing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FacetCounts {
    /// Price bounds ignoring the price filter; `None` when nothing matches.
    pub price_range: Option<PriceRange>,
    /// Non-zero counts per product type, ignoring the type filter.
    pub type_counts: Vec<TypeCount>,
    /// Non-zero counts per sibling scope, ignoring that scope's own filter.
    pub scope_counts: Vec<ScopeCount>,
}

/// Predicates and grouping for the sibling-scope facet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeFacetQuery {
    pub predicates: Vec<Predicate>,
    pub field: GroupField,
}

/// Computes [`FacetCounts`] against a [`CatalogStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacetAggregator {
    planner: QueryPlanner,
    include_scope_counts: bool,
}

impl FacetAggregator {
    pub fn new(planner: QueryPlanner) -> Self {
        Self {
            planner,
            include_scope_counts: true,
        }
    }

    /// Whether [`aggregate`](Self::aggregate) queries sibling-scope counts.
    pub fn with_scope_counts(mut self, enabled: bool) -> Self {
        self.include_scope_counts = enabled;
        self
    }

    /// Predicates for the price facet: everything but the price bounds.
    pub fn price_predicates(&self, spec: &FilterSpec, scope: &Scope) -> Vec<Predicate> {
        self.planner
            .predicates(&spec.without(FilterDimension::Price), scope)
    }

    /// Predicates for the type facet: everything but the type filter.
    pub fn type_predicates(&self, spec: &FilterSpec, scope: &Scope) -> Vec<Predicate> {
        self.planner
            .predicates(&spec.without(FilterDimension::ProductTypes), scope)
    }

    /// Query for the sibling-scope facet.
    ///
    /// The global listing counts per category, a category listing counts per
    /// subcategory, and a subcategory listing counts its siblings within the
    /// parent category.
    pub fn scope_query(&self, spec: &FilterSpec, scope: &Scope) -> ScopeFacetQuery {
        match scope {
            Scope::All => ScopeFacetQuery {
                predicates: self
                    .planner
                    .predicates(&spec.without(FilterDimension::Categories), scope),
                field: GroupField::CategorySlug,
            },
            Scope::Category(_) | Scope::Subcategory { .. } => ScopeFacetQuery {
                predicates: self
                    .planner
                    .predicates(&spec.without(FilterDimension::Subcategory), &scope.parent()),
                field: GroupField::SubcategorySlug,
            },
        }
    }

    pub async fn price_range<S: CatalogStore + ?Sized>(
        &self,
        store: &S,
        spec: &FilterSpec,
        scope: &Scope,
    ) -> Result<Option<PriceRange>, StoreError> {
        let predicates = self.price_predicates(spec, scope);
        tracing::debug!(predicates = predicates.len(), "price facet");
        store.price_bounds(&predicates).await
    }

    pub async fn type_counts<S: CatalogStore + ?Sized>(
        &self,
        store: &S,
        spec: &FilterSpec,
        scope: &Scope,
    ) -> Result<Vec<TypeCount>, StoreError> {
        let predicates = self.type_predicates(spec, scope);
        tracing::debug!(predicates = predicates.len(), "type facet");
        let counts = store.count_by(&predicates, GroupField::ProductType).await?;
        Ok(type_counts_from(&counts, spec))
    }

    pub async fn scope_counts<S: CatalogStore + ?Sized>(
        &self,
        store: &S,
        spec: &FilterSpec,
        scope: &Scope,
    ) -> Result<Vec<ScopeCount>, StoreError> {
        let query = self.scope_query(spec, scope);
        tracing::debug!(field = query.field.as_str(), "scope facet");
        let counts = store.count_by(&query.predicates, query.field).await?;
        Ok(scope_counts_from(counts, query.field, spec))
    }

    /// Compute every facet, issuing the aggregate queries concurrently.
    ///
    /// Each query holds a permit from `gate` while it runs. Sibling-scope
    /// counts come back empty, without a query, when they are switched off.
    pub async fn aggregate<S: CatalogStore + ?Sized>(
        &self,
        store: &S,
        spec: &FilterSpec,
        scope: &Scope,
        gate: &Semaphore,
    ) -> Result<FacetCounts, StoreError> {
        let scope_counts = async {
            if self.include_scope_counts {
                gated(gate, self.scope_counts(store, spec, scope)).await
            } else {
                Ok(Vec::new())
            }
        };
        let (price_range, type_counts, scope_counts) = futures::try_join!(
            gated(gate, self.price_range(store, spec, scope)),
            gated(gate, self.type_counts(store, spec, scope)),
            scope_counts,
        )?;
        Ok(FacetCounts {
            price_range,
            type_counts,
            scope_counts,
        })
    }
}

/// Non-zero type counts in display order. Unknown discriminators are skipped.
pub fn type_counts_from(counts: &GroupCounts, spec: &FilterSpec) -> Vec<TypeCount> {
    ProductType::ALL
        .into_iter()
        .filter_map(|product_type| {
            let count = counts.get(product_type.as_str()).copied().unwrap_or(0);
            (count > 0).then(|| TypeCount {
                product_type,
                label: product_type.label().to_string(),
                count,
                selected: spec.product_types().contains(&product_type),
            })
        })
        .collect()
}

fn scope_counts_from(counts: GroupCounts, field: GroupField, spec: &FilterSpec) -> Vec<ScopeCount> {
    counts
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(slug, count)| {
            let selected = match field {
                GroupField::CategorySlug => spec.categories().contains(&slug),
                _ => spec.subcategory() == Some(slug.as_str()),
            };
            ScopeCount {
                slug,
                count,
                selected,
            }
        })
        .collect()
}
