//! Query-string rewriting.

use anyhow::{anyhow, Result};
use serde::Serialize;
use turbo_catalog::search::{
    ActiveFilter, FilterKey, FilterSpec, FilterUrlCodec, PageReset, SortKey, ViewMode,
};

use super::UrlArgs;
use crate::context::Context;

#[derive(Serialize)]
struct UrlResult {
    query: String,
    active_filters: Vec<ActiveFilter>,
}

/// Run the url command.
pub async fn run(args: UrlArgs, ctx: &Context) -> Result<()> {
    let spec = rewrite(&args)?;
    let query = FilterUrlCodec::encode(&spec);

    if ctx.output.is_json() {
        ctx.output.json(&UrlResult {
            query,
            active_filters: FilterUrlCodec::active_filters(&spec),
        });
        return Ok(());
    }

    println!("?{}", query);
    Ok(())
}

/// Apply every requested change to the decoded query.
///
/// Filter edits run first (removals, additions, toggles), then the page
/// policy, then explicit sort/view/page overrides.
pub fn rewrite(args: &UrlArgs) -> Result<FilterSpec> {
    let original = FilterUrlCodec::decode(&args.query);
    let mut spec = original.clone();

    for raw in &args.remove {
        let (key, value) = split_filter(raw)?;
        spec = FilterUrlCodec::remove_filter(&spec, key, value);
    }
    for raw in &args.add {
        let (key, value) = require_value(raw)?;
        spec = FilterUrlCodec::add_filter(&spec, key, value);
    }
    for raw in &args.toggle {
        let (key, value) = require_value(raw)?;
        spec = FilterUrlCodec::toggle_filter(&spec, key, value);
    }

    if filters_of(&spec) != filters_of(&original) {
        let reset = if args.keep_page {
            PageReset::Keep
        } else {
            PageReset::FirstPage
        };
        spec = reset.apply(spec);
    }

    if let Some(ref sort) = args.sort {
        spec = spec.with_sort(SortKey::from_str(sort));
    }
    if let Some(ref view) = args.view {
        spec = spec.with_view(ViewMode::from_str(view));
    }
    if let Some(page) = args.page {
        spec = spec.with_page(page);
    }

    Ok(spec)
}

/// The spec with sort, view and page cleared; those never trigger a reset.
fn filters_of(spec: &FilterSpec) -> FilterSpec {
    spec.clone()
        .with_sort(SortKey::default())
        .with_view(ViewMode::default())
        .with_page(1)
}

fn split_filter(raw: &str) -> Result<(FilterKey, Option<&str>)> {
    let (key, value) = match raw.split_once('=') {
        Some((key, value)) => (key, Some(value)),
        None => (raw, None),
    };
    let key = FilterKey::from_str(key).ok_or_else(|| anyhow!("Unknown filter key: {}", key))?;
    Ok((key, value))
}

fn require_value(raw: &str) -> Result<(FilterKey, &str)> {
    match split_filter(raw)? {
        (key, Some(value)) => Ok((key, value)),
        (_, None) => Err(anyhow!("Expected KEY=VALUE, got: {}", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(query: &str) -> UrlArgs {
        UrlArgs {
            query: query.to_string(),
            remove: Vec::new(),
            add: Vec::new(),
            toggle: Vec::new(),
            keep_page: false,
            sort: None,
            view: None,
            page: None,
        }
    }

    fn encoded(args: &UrlArgs) -> String {
        FilterUrlCodec::encode(&rewrite(args).unwrap())
    }

    #[test]
    fn test_remove_one_category_resets_page() {
        let mut a = args("category=a&category=b&page=3");
        a.remove.push("category=a".to_string());
        assert_eq!(encoded(&a), "category=b");
    }

    #[test]
    fn test_keep_page() {
        let mut a = args("category=a&category=b&page=3");
        a.remove.push("category=a".to_string());
        a.keep_page = true;
        assert_eq!(encoded(&a), "category=b&page=3");
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut a = args("inStock=true");
        a.toggle.push("type=configurable".to_string());
        assert_eq!(encoded(&a), "type=CONFIGURABLE&inStock=true");

        let mut b = args("type=CONFIGURABLE&inStock=true");
        b.toggle.push("type=CONFIGURABLE".to_string());
        assert_eq!(encoded(&b), "inStock=true");
    }

    #[test]
    fn test_sort_change_keeps_page() {
        let mut a = args("search=router&page=2");
        a.sort = Some("price-asc".to_string());
        assert_eq!(encoded(&a), "search=router&sortBy=price-asc&page=2");
    }

    #[test]
    fn test_sort_and_view_edits_keep_page() {
        let mut a = args("category=a&page=3");
        a.add.push("sortBy=newest".to_string());
        assert_eq!(encoded(&a), "category=a&sortBy=newest&page=3");

        let mut b = args("category=a&page=3");
        b.toggle.push("view=list".to_string());
        assert_eq!(encoded(&b), "category=a&view=list&page=3");
    }

    #[test]
    fn test_bad_arguments() {
        let mut a = args("");
        a.add.push("colour=red".to_string());
        assert!(rewrite(&a).is_err());

        let mut b = args("");
        b.add.push("category".to_string());
        assert!(rewrite(&b).is_err());
    }
}
