//! Data store capability used by the listing engine.
//!
//! The engine needs two things from a store: a filtered, sorted,
//! offset/limit page with a total count, and aggregates (price bounds,
//! grouped counts) under an arbitrary predicate list.

mod memory;
mod sql;

use std::collections::BTreeMap;
use std::future::Future;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::catalog::CatalogEntry;
use crate::error::StoreError;
use crate::money::PriceRange;
use crate::search::{PageResult, Predicate, QueryPlan};

pub use memory::MemoryStore;
pub use sql::{SqlCatalogStore, SqlExecutor, SqlRow, SqlStatement, SqlValue};

/// Discriminator fields a store can group counts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupField {
    /// Product type token (e.g. `STANDALONE`).
    ProductType,
    /// Category slug.
    CategorySlug,
    /// Subcategory slug. Entries without a subcategory are not counted.
    SubcategorySlug,
}

impl GroupField {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupField::ProductType => "product_type",
            GroupField::CategorySlug => "category_slug",
            GroupField::SubcategorySlug => "subcategory_slug",
        }
    }
}

/// Counts keyed by discriminator value.
pub type GroupCounts = BTreeMap<String, u64>;

/// A catalog store the listing engine can query.
///
/// Implementations must honour every predicate and sort term of a plan,
/// including the trailing `id ASC` tie-breaker. Each call keeps at most one
/// backend query in flight, so the engine's concurrency limit counts calls.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fetch one page of entries plus the total number of matches.
    async fn fetch_page(&self, plan: &QueryPlan) -> Result<PageResult<CatalogEntry>, StoreError>;

    /// Lowest and highest price among matching entries, `None` if nothing matches.
    async fn price_bounds(&self, predicates: &[Predicate]) -> Result<Option<PriceRange>, StoreError>;

    /// Number of matching entries per value of `field`.
    async fn count_by(
        &self,
        predicates: &[Predicate],
        field: GroupField,
    ) -> Result<GroupCounts, StoreError>;
}

#[async_trait]
impl<S: CatalogStore + ?Sized> CatalogStore for std::sync::Arc<S> {
    async fn fetch_page(&self, plan: &QueryPlan) -> Result<PageResult<CatalogEntry>, StoreError> {
        (**self).fetch_page(plan).await
    }

    async fn price_bounds(&self, predicates: &[Predicate]) -> Result<Option<PriceRange>, StoreError> {
        (**self).price_bounds(predicates).await
    }

    async fn count_by(
        &self,
        predicates: &[Predicate],
        field: GroupField,
    ) -> Result<GroupCounts, StoreError> {
        (**self).count_by(predicates, field).await
    }
}

/// Run a store query once a permit from `gate` is available.
pub(crate) async fn gated<T>(
    gate: &Semaphore,
    query: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    let _permit = gate.acquire().await.map_err(|_| StoreError::Unavailable)?;
    query.await
}
