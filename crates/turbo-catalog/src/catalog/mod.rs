//! Product catalog module.
//!
//! Contains the listable entry type and its classifications.

mod product;

pub use product::{CatalogEntry, ProductStatus, ProductType};
