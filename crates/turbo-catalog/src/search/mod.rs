//! Search module.
//!
//! Contains the listing filters, query planning, facets, pagination and
//! the query-string codec.

mod facets;
mod filter;
mod query;
mod results;
mod codec;

pub use facets::{type_counts_from, FacetAggregator, FacetCounts, ScopeCount, ScopeFacetQuery, TypeCount};
pub use filter::{FilterDimension, FilterKey, FilterSpec, ViewMode};
pub use query::{
    Predicate, QueryPlan, QueryPlanner, Scope, SortDirection, SortField, SortKey, SortTerm,
};
pub use results::{
    PageAssembler, PageLink, PageResult, PaginationDescriptor, DEFAULT_PAGE_SIZE,
    DEFAULT_PAGE_WINDOW,
};
pub use codec::{ActiveFilter, FilterUrlCodec, PageReset};
