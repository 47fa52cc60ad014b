//! Faceted catalog listings for TurboCommerce.
//!
//! This crate turns a storefront query string into a complete listing page:
//!
//! - **Search**: filter specs, query planning, facets, pagination, and the
//!   query-string codec used to build filter links
//! - **Store**: the [`CatalogStore`] capability, with in-memory and SQL backends
//! - **Engine**: [`CatalogEngine`], which runs the page and facet queries
//!   concurrently for one listing request
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_catalog::prelude::*;
//!
//! let store = MemoryStore::from_json(&std::fs::read_to_string("catalog.json")?)?;
//! let engine = CatalogEngine::new(store);
//!
//! let listing = engine
//!     .browse_query("category=networking&sortBy=price-asc", &Scope::All)
//!     .await?;
//! println!("{} matching", listing.pagination.total_matching);
//!
//! // Link that drops the category filter and returns to page 1
//! let href = FilterUrlCodec::remove_filter_query(
//!     &listing.spec,
//!     FilterKey::Category,
//!     Some("networking"),
//!     PageReset::FirstPage,
//! );
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod catalog;
pub mod config;
pub mod engine;
pub mod search;
pub mod store;

pub use config::EngineConfig;
pub use engine::{CatalogEngine, Listing};
pub use error::{CatalogError, StoreError};
pub use ids::*;
pub use money::{Price, PriceRange, Rounding};
pub use store::CatalogStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::engine::{CatalogEngine, Listing};
    pub use crate::error::{CatalogError, StoreError};
    pub use crate::ids::*;
    pub use crate::money::{Price, PriceRange, Rounding};

    // Catalog
    pub use crate::catalog::{CatalogEntry, ProductStatus, ProductType};

    // Search
    pub use crate::search::{
        ActiveFilter, FacetAggregator, FacetCounts, FilterDimension, FilterKey, FilterSpec,
        FilterUrlCodec, PageAssembler, PageLink, PageReset, PageResult, PaginationDescriptor,
        QueryPlan, QueryPlanner, Scope, ScopeCount, SortKey, TypeCount, ViewMode,
    };

    // Store
    pub use crate::store::{CatalogStore, GroupCounts, GroupField, MemoryStore};
}
