//! Listing engine.
//!
//! One engine serves the global, category and subcategory listings; the
//! [`Scope`] passed per call is the only difference between them.

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::catalog::CatalogEntry;
use crate::config::EngineConfig;
use crate::error::CatalogError;
use crate::search::{
    ActiveFilter, FacetAggregator, FacetCounts, FilterSpec, FilterUrlCodec, PageAssembler,
    PageLink, PageResult, PaginationDescriptor, QueryPlanner, Scope,
};
use crate::store::{gated, CatalogStore};

/// Everything a listing page renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// The filters the listing was built from.
    pub spec: FilterSpec,
    pub scope: Scope,
    pub page: PageResult<CatalogEntry>,
    pub pagination: PaginationDescriptor,
    pub page_links: Vec<PageLink>,
    pub facets: FacetCounts,
    pub active_filters: Vec<ActiveFilter>,
}

/// Runs listing requests against a [`CatalogStore`].
///
/// Holds no per-request state, so one engine can be shared by all requests.
pub struct CatalogEngine<S> {
    store: S,
    config: EngineConfig,
    planner: QueryPlanner,
    facets: FacetAggregator,
    assembler: PageAssembler,
}

impl<S: CatalogStore> CatalogEngine<S> {
    /// Create an engine with the default configuration.
    pub fn new(store: S) -> Self {
        Self::build(store, EngineConfig::default())
    }

    /// Create an engine with a validated configuration.
    pub fn with_config(store: S, config: EngineConfig) -> Result<Self, CatalogError> {
        config.validate()?;
        Ok(Self::build(store, config))
    }

    fn build(store: S, config: EngineConfig) -> Self {
        let planner = QueryPlanner::new(config.page_size);
        Self {
            store,
            planner,
            facets: FacetAggregator::new(planner).with_scope_counts(config.scope_counts),
            assembler: PageAssembler::new(config.page_size, config.page_window),
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn planner(&self) -> &QueryPlanner {
        &self.planner
    }

    /// Decode a raw query string and build its listing.
    pub async fn browse_query(&self, query: &str, scope: &Scope) -> Result<Listing, CatalogError> {
        let spec = FilterUrlCodec::decode(query);
        self.browse(&spec, scope).await
    }

    /// Build the listing for `spec` within `scope`.
    ///
    /// The page query and the facet queries run concurrently, at most
    /// `max_concurrent_queries` at a time. If any of them fails the whole
    /// listing fails. Dropping the returned future abandons every query
    /// still in flight.
    #[tracing::instrument(level = "debug", skip_all, fields(scope = %scope, page = spec.page()))]
    pub async fn browse(&self, spec: &FilterSpec, scope: &Scope) -> Result<Listing, CatalogError> {
        let plan = self.planner.plan(spec, scope);
        debug!(
            predicates = plan.predicates.len(),
            offset = plan.offset,
            limit = plan.limit,
            "planned listing query"
        );

        let gate = Semaphore::new(self.config.max_concurrent_queries);
        let (page, facets) = futures::try_join!(
            gated(&gate, self.store.fetch_page(&plan)),
            self.facets.aggregate(&self.store, spec, scope, &gate),
        )
        .map_err(|e| {
            warn!(error = %e, "listing query failed");
            CatalogError::from(e)
        })?;

        let pagination = self.assembler.assemble(&page, spec);
        debug!(
            total = pagination.total_matching,
            items = page.len(),
            "assembled listing"
        );

        Ok(Listing {
            spec: spec.clone(),
            scope: scope.clone(),
            page_links: self.assembler.page_links(&pagination),
            active_filters: FilterUrlCodec::active_filters(spec),
            page,
            pagination,
            facets,
        })
    }
}
