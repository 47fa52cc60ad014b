//! End-to-end listing tests over the in-memory store.

use turbo_catalog::prelude::*;

/// 25 networking products (10 of them in the `wifi` subcategory), 5 audio
/// products, and one archived networking product that must never show up.
fn storefront() -> MemoryStore {
    let mut entries = Vec::new();
    for i in 1..=25i64 {
        let mut entry = CatalogEntry::new(
            format!("net-{i:02}"),
            format!("Network Device {i}"),
            "c-net",
            "networking",
            Price::from_cents(1_000 + i * 100),
        );
        entry.view_count = 100 - i;
        entry.stock = if i % 5 == 0 { 0 } else { 3 };
        entry.product_type = match i % 3 {
            0 => ProductType::Configurable,
            1 => ProductType::Standalone,
            _ => ProductType::WithAddons,
        };
        if i <= 10 {
            entry = entry.with_subcategory("s-wifi", "wifi");
        } else {
            entry = entry.with_subcategory("s-switch", "switches");
        }
        entries.push(entry);
    }
    for i in 1..=5i64 {
        let mut entry = CatalogEntry::new(
            format!("aud-{i:02}"),
            format!("Speaker {i}"),
            "c-audio",
            "audio",
            Price::from_cents(20_000 + i),
        );
        entry.featured = i == 1;
        entries.push(entry);
    }
    let mut archived = CatalogEntry::new("net-99", "Old Router", "c-net", "networking", Price::from_cents(1));
    archived.status = ProductStatus::Archived;
    entries.push(archived);

    MemoryStore::new(entries)
}

fn ids(listing: &Listing) -> Vec<&str> {
    listing.page.items.iter().map(|e| e.id.as_str()).collect()
}

#[tokio::test]
async fn test_networking_pages() {
    let engine = CatalogEngine::new(storefront());

    let first = engine
        .browse_query("category=networking", &Scope::All)
        .await
        .unwrap();
    assert_eq!(first.pagination.total_matching, 25);
    assert_eq!(first.pagination.total_pages, 3);
    assert_eq!(first.pagination.first_item_index, 1);
    assert_eq!(first.pagination.last_item_index, 12);
    assert!(!first.pagination.has_prev);
    assert!(first.pagination.has_next);
    assert_eq!(ids(&first)[0], "net-01");

    let third = engine
        .browse_query("category=networking&page=3", &Scope::All)
        .await
        .unwrap();
    assert_eq!(ids(&third), vec!["net-25"]);
    assert!(!third.pagination.has_next);

    let past_end = engine
        .browse_query("category=networking&page=4", &Scope::All)
        .await
        .unwrap();
    assert!(past_end.page.items.is_empty());
    assert_eq!(past_end.page.total_matching, 25);
}

#[tokio::test]
async fn test_networking_type_filter_scenario() {
    let mut entries: Vec<CatalogEntry> = (1..=25i64)
        .map(|i| {
            let mut entry = CatalogEntry::new(
                format!("n-{i:02}"),
                format!("Switch {i}"),
                "c-net",
                "networking",
                Price::from_cents(i * 1_000),
            );
            entry.product_type = if i % 2 == 0 {
                ProductType::Configurable
            } else {
                ProductType::Standalone
            };
            entry
        })
        .collect();
    for i in 1..=4i64 {
        let mut addon = CatalogEntry::new(
            format!("x-{i}"),
            format!("Rack Kit {i}"),
            "c-net",
            "networking",
            Price::from_cents(500),
        );
        addon.product_type = ProductType::WithAddons;
        entries.push(addon);
    }
    let engine = CatalogEngine::new(MemoryStore::new(entries));
    let query = "category=networking&type=STANDALONE&type=CONFIGURABLE";

    let first = engine.browse_query(query, &Scope::All).await.unwrap();
    assert_eq!(first.pagination.total_matching, 25);
    assert_eq!(first.pagination.total_pages, 3);
    assert_eq!(
        (first.pagination.first_item_index, first.pagination.last_item_index),
        (1, 12)
    );
    // Type counts still list the unselected type.
    assert_eq!(first.facets.type_counts.len(), 3);

    let out_of_range = engine
        .browse_query(&format!("{query}&page=4"), &Scope::All)
        .await
        .unwrap();
    assert!(out_of_range.page.items.is_empty());
    assert_eq!(out_of_range.page.total_matching, 25);
}

#[tokio::test]
async fn test_pages_partition_results() {
    let engine = CatalogEngine::new(storefront());
    let mut seen = Vec::new();
    for page in 1..=3 {
        let spec = FilterSpec::new().with_page(page);
        let listing = engine.browse(&spec, &Scope::All).await.unwrap();
        seen.extend(listing.page.items.iter().map(|e| e.id.to_string()));
    }
    let total = seen.len();
    seen.sort();
    seen.dedup();
    assert_eq!(total, 30);
    assert_eq!(seen.len(), 30);
}

#[tokio::test]
async fn test_facets_ignore_their_own_filter() {
    let engine = CatalogEngine::new(storefront());

    let unfiltered = engine
        .browse_query("category=networking", &Scope::All)
        .await
        .unwrap();
    let filtered = engine
        .browse_query("category=networking&type=CONFIGURABLE&minPrice=15&maxPrice=20", &Scope::All)
        .await
        .unwrap();

    // Price bounds ignore the price filter, type counts ignore the type filter.
    let type_filtered = engine
        .browse_query("category=networking&type=CONFIGURABLE", &Scope::All)
        .await
        .unwrap();
    assert_eq!(
        filtered.facets.price_range,
        type_filtered.facets.price_range
    );
    let counts = |l: &Listing| -> Vec<(ProductType, u64)> {
        l.facets
            .type_counts
            .iter()
            .map(|c| (c.product_type, c.count))
            .collect()
    };
    assert_eq!(counts(&unfiltered), counts(&type_filtered));
    assert!(type_filtered
        .facets
        .type_counts
        .iter()
        .any(|c| c.product_type == ProductType::Configurable && c.selected));

    // Results themselves honour every filter.
    assert!(filtered
        .page
        .items
        .iter()
        .all(|e| e.product_type == ProductType::Configurable
            && e.price >= Price::from_cents(1_500)
            && e.price <= Price::from_cents(2_000)));
}

#[tokio::test]
async fn test_category_scope_counts_subcategories() {
    let engine = CatalogEngine::new(storefront());
    let scope = Scope::Category(CategoryId::new("c-net"));

    let listing = engine.browse_query("subcategory=wifi", &scope).await.unwrap();
    assert_eq!(listing.pagination.total_matching, 10);

    let siblings: Vec<(&str, u64, bool)> = listing
        .facets
        .scope_counts
        .iter()
        .map(|c| (c.slug.as_str(), c.count, c.selected))
        .collect();
    assert_eq!(siblings, vec![("switches", 15, false), ("wifi", 10, true)]);
}

#[tokio::test]
async fn test_subcategory_scope() {
    let engine = CatalogEngine::new(storefront());
    let scope = Scope::Subcategory {
        category: CategoryId::new("c-net"),
        subcategory: SubcategoryId::new("s-wifi"),
    };

    let listing = engine.browse_query("inStock=true", &scope).await.unwrap();
    assert_eq!(listing.pagination.total_matching, 8);
    assert!(listing.page.items.iter().all(|e| e.stock > 0));
    // Siblings are counted across the parent category.
    assert_eq!(listing.facets.scope_counts.len(), 2);
}

#[tokio::test]
async fn test_active_filter_links_round_trip() {
    let engine = CatalogEngine::new(storefront());
    let listing = engine
        .browse_query("?category=audio&category=networking&featured=true&page=2", &Scope::All)
        .await
        .unwrap();

    let chip = listing
        .active_filters
        .iter()
        .find(|c| c.key == FilterKey::Featured)
        .unwrap();
    assert_eq!(chip.remove_query, "category=audio&category=networking");

    let widened = engine
        .browse_query(&chip.remove_query, &Scope::All)
        .await
        .unwrap();
    assert_eq!(widened.pagination.total_matching, 30);
    assert_eq!(widened.pagination.page, 1);
}

#[tokio::test]
async fn test_sort_and_search() {
    let engine = CatalogEngine::new(storefront());

    let cheapest = engine
        .browse_query("sortBy=price-asc", &Scope::All)
        .await
        .unwrap();
    assert_eq!(ids(&cheapest)[0], "net-01");

    let priciest = engine
        .browse_query("sortBy=price-desc", &Scope::All)
        .await
        .unwrap();
    assert_eq!(ids(&priciest)[0], "aud-05");

    let search = engine
        .browse_query("search=SPEAKER", &Scope::All)
        .await
        .unwrap();
    assert_eq!(search.pagination.total_matching, 5);
}

#[tokio::test]
async fn test_sub_cent_price_bound_still_filters() {
    let engine = CatalogEngine::new(storefront());
    let listing = engine
        .browse_query("category=networking&maxPrice=11.999", &Scope::All)
        .await
        .unwrap();
    assert_eq!(ids(&listing), vec!["net-01"]);
    assert_eq!(listing.spec.price_max(), Some(Price::from_cents(1_199)));
}

#[tokio::test]
async fn test_empty_catalog() {
    let engine = CatalogEngine::new(MemoryStore::new(Vec::new()));
    let listing = engine.browse(&FilterSpec::new(), &Scope::All).await.unwrap();
    assert_eq!(listing.pagination.total_pages, 0);
    assert!(listing.page_links.is_empty());
    assert!(listing.facets.price_range.is_none());
    assert!(listing.facets.type_counts.is_empty());
}
