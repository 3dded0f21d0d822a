//! Product catalog module.
//!
//! Maps product ids to display names and answers the lookups the interactive
//! driver needs (name → id, selectable product listing).

pub mod catalog;

pub use catalog::{Catalog, CatalogListing, ProductCatalogEntry};
