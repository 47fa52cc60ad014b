//! In-memory catalog store.

use std::cmp::Ordering;

use async_trait::async_trait;

use crate::catalog::CatalogEntry;
use crate::error::{CatalogError, StoreError};
use crate::money::PriceRange;
use crate::search::{PageResult, Predicate, QueryPlan, SortDirection, SortField, SortTerm};
use crate::store::{CatalogStore, GroupCounts, GroupField};

/// A [`CatalogStore`] over a fixed list of entries.
///
/// Evaluates plans the same way a relational store would: filter, sort by
/// every term, then slice.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Vec<CatalogEntry>,
}

impl MemoryStore {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Load entries from a JSON array.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
        Ok(Self::new(entries))
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn matching<'a>(
        &'a self,
        predicates: &'a [Predicate],
    ) -> impl Iterator<Item = &'a CatalogEntry> + 'a {
        self.entries
            .iter()
            .filter(move |entry| predicates.iter().all(|p| p.matches(entry)))
    }
}

fn compare(a: &CatalogEntry, b: &CatalogEntry, term: &SortTerm) -> Ordering {
    let ordering = match term.field {
        SortField::ViewCount => a.view_count.cmp(&b.view_count),
        SortField::Price => a.price.cmp(&b.price),
        SortField::Rating => a.rating.total_cmp(&b.rating),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::Id => a.id.cmp(&b.id),
    };
    match term.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn group_value(entry: &CatalogEntry, field: GroupField) -> Option<&str> {
    match field {
        GroupField::ProductType => Some(entry.product_type.as_str()),
        GroupField::CategorySlug => Some(entry.category_slug.as_str()),
        GroupField::SubcategorySlug => entry.subcategory_slug.as_deref(),
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn fetch_page(&self, plan: &QueryPlan) -> Result<PageResult<CatalogEntry>, StoreError> {
        let mut matching: Vec<&CatalogEntry> = self.matching(&plan.predicates).collect();
        matching.sort_by(|a, b| {
            plan.sort
                .iter()
                .map(|term| compare(a, b, term))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        });

        let total = matching.len() as u64;
        let offset = usize::try_from(plan.offset).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(plan.limit as usize)
            .cloned()
            .collect();

        Ok(PageResult::new(items, total))
    }

    async fn price_bounds(&self, predicates: &[Predicate]) -> Result<Option<PriceRange>, StoreError> {
        Ok(self.matching(predicates).fold(None, |range, entry| {
            Some(match range {
                None => PriceRange::new(entry.price, entry.price),
                Some(range) => range.include(entry.price),
            })
        }))
    }

    async fn count_by(
        &self,
        predicates: &[Predicate],
        field: GroupField,
    ) -> Result<GroupCounts, StoreError> {
        let mut counts = GroupCounts::new();
        for value in self.matching(predicates).filter_map(|e| group_value(e, field)) {
            *counts.entry(value.to_string()).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ProductStatus, ProductType};
    use crate::money::Price;
    use crate::search::{FilterSpec, QueryPlanner, Scope};

    fn entry(id: &str, cents: i64, views: i64) -> CatalogEntry {
        let mut e = CatalogEntry::new(id, format!("Item {id}"), "c-1", "networking", Price::from_cents(cents));
        e.view_count = views;
        e
    }

    fn store() -> MemoryStore {
        let mut archived = entry("p-9", 100, 999);
        archived.status = ProductStatus::Archived;
        let mut addon = entry("p-4", 700, 10).with_subcategory("s-1", "switches");
        addon.product_type = ProductType::WithAddons;
        MemoryStore::new(vec![
            entry("p-3", 500, 10),
            entry("p-1", 900, 30),
            entry("p-2", 500, 10),
            addon,
            archived,
        ])
    }

    #[tokio::test]
    async fn test_fetch_page_orders_with_tie_breaker() {
        let plan = QueryPlanner::new(12).plan(&FilterSpec::new(), &Scope::All);
        let page = store().fetch_page(&plan).await.unwrap();
        let ids: Vec<&str> = page.items.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["p-1", "p-2", "p-3", "p-4"]);
        assert_eq!(page.total_matching, 4);
    }

    #[tokio::test]
    async fn test_fetch_page_slices() {
        let planner = QueryPlanner::new(3);
        let spec = FilterSpec::new().with_page(2);
        let page = store().fetch_page(&planner.plan(&spec, &Scope::All)).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_matching, 4);

        let beyond = FilterSpec::new().with_page(9);
        let page = store().fetch_page(&planner.plan(&beyond, &Scope::All)).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_matching, 4);
    }

    #[tokio::test]
    async fn test_price_bounds() {
        let active = Scope::All.predicates();
        let bounds = store().price_bounds(&active).await.unwrap();
        assert_eq!(bounds, Some(PriceRange::new(Price::from_cents(500), Price::from_cents(900))));

        let none = store()
            .price_bounds(&[Predicate::CategorySlugIn(vec!["audio".into()])])
            .await
            .unwrap();
        assert_eq!(none, None);
    }

    #[tokio::test]
    async fn test_count_by() {
        let active = Scope::All.predicates();
        let counts = store().count_by(&active, GroupField::ProductType).await.unwrap();
        assert_eq!(counts.get("STANDALONE"), Some(&3));
        assert_eq!(counts.get("WITH_ADDONS"), Some(&1));

        let subs = store().count_by(&active, GroupField::SubcategorySlug).await.unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs.get("switches"), Some(&1));
    }

    #[test]
    fn test_from_json() {
        let store = MemoryStore::from_json(
            r#"[{"id":"p-1","name":"Hub","slug":"hub","category_id":"c-1","category_slug":"networking","price":1500}]"#,
        )
        .unwrap();
        assert_eq!(store.len(), 1);
        assert!(MemoryStore::from_json("{").is_err());
    }
}
