//! Listing pages built from a catalog file.

use anyhow::{Context as _, Result};
use turbo_catalog::search::Scope;
use turbo_catalog::store::MemoryStore;
use turbo_catalog::{CatalogEngine, CategoryId, Listing, SubcategoryId};

use super::BrowseArgs;
use crate::context::Context;
use crate::output::{facet_entry, page_strip};

/// Run the browse command.
pub async fn run(args: BrowseArgs, ctx: &Context) -> Result<()> {
    let path = ctx.catalog_path(args.catalog.as_deref())?;
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
    let store = MemoryStore::from_json(&json)
        .with_context(|| format!("Failed to parse catalog: {}", path.display()))?;
    ctx.output
        .debug(&format!("Loaded {} entries from {}", store.len(), path.display()));

    let engine = CatalogEngine::with_config(store, ctx.config.engine.clone())?;
    let scope = scope_from(&args);
    let listing = engine.browse_query(&args.query, &scope).await?;

    if ctx.output.is_json() {
        ctx.output.json(&listing);
        return Ok(());
    }

    print_listing(&listing, ctx);
    Ok(())
}

fn scope_from(args: &BrowseArgs) -> Scope {
    match (&args.category, &args.subcategory) {
        (Some(category), Some(subcategory)) => Scope::Subcategory {
            category: CategoryId::new(category.as_str()),
            subcategory: SubcategoryId::new(subcategory.as_str()),
        },
        (Some(category), None) => Scope::Category(CategoryId::new(category.as_str())),
        _ => Scope::All,
    }
}

fn print_listing(listing: &Listing, ctx: &Context) {
    let out = &ctx.output;
    let pagination = &listing.pagination;

    out.header(&format!("Listing ({})", listing.scope));
    out.kv("sort", listing.spec.sort().display_name());
    out.kv("view", listing.spec.view().as_str());

    if pagination.total_matching == 0 {
        out.info("No matching products.");
    } else if listing.page.is_empty() {
        out.warn(&format!(
            "Page {} is past the last page ({})",
            pagination.page, pagination.total_pages
        ));
    } else {
        out.info(&format!(
            "Showing {}-{} of {}",
            pagination.first_item_index, pagination.last_item_index, pagination.total_matching
        ));
        let widths = [12, 32, 14, 10];
        out.table_row(&["ID", "NAME", "TYPE", "PRICE"], &widths);
        for entry in &listing.page.items {
            let price = entry.price.display();
            out.table_row(
                &[
                    entry.id.as_str(),
                    &entry.name,
                    entry.product_type.label(),
                    &price,
                ],
                &widths,
            );
        }
    }

    if !listing.page_links.is_empty() {
        out.kv("pages", &page_strip(&listing.page_links));
    }

    let facets = &listing.facets;
    out.header("Facets");
    if let Some(range) = facets.price_range {
        out.kv("price", &format!("{} - {}", range.min, range.max));
    }
    for count in &facets.type_counts {
        out.list_item(&facet_entry(&count.label, count.count, count.selected));
    }
    for count in &facets.scope_counts {
        out.list_item(&facet_entry(&count.slug, count.count, count.selected));
    }

    if !listing.active_filters.is_empty() {
        out.header("Active filters");
        for chip in &listing.active_filters {
            out.kv(&chip.label, &format!("?{}", chip.remove_query));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(category: Option<&str>, subcategory: Option<&str>) -> BrowseArgs {
        BrowseArgs {
            query: String::new(),
            catalog: None,
            category: category.map(str::to_string),
            subcategory: subcategory.map(str::to_string),
        }
    }

    #[test]
    fn test_scope_from_flags() {
        assert_eq!(scope_from(&args(None, None)), Scope::All);
        assert_eq!(
            scope_from(&args(Some("c-net"), None)),
            Scope::Category(CategoryId::new("c-net"))
        );
        assert_eq!(
            scope_from(&args(Some("c-net"), Some("s-wifi"))),
            Scope::Subcategory {
                category: CategoryId::new("c-net"),
                subcategory: SubcategoryId::new("s-wifi"),
            }
        );
    }
}
