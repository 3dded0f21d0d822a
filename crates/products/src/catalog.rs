use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use stockcast_core::{PipelineError, PipelineResult, ProductId};

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCatalogEntry {
    pub product_id: ProductId,
    pub product_name: String,
}

/// A product offered for selection: catalog name plus id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CatalogListing {
    pub product_name: String,
    pub product_id: ProductId,
}

/// Product catalog keyed by product id.
///
/// Invariant: each product id appears once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    names: BTreeMap<ProductId, String>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and blank names.
    pub fn from_entries(
        entries: impl IntoIterator<Item = ProductCatalogEntry>,
    ) -> PipelineResult<Self> {
        let mut names = BTreeMap::new();
        for entry in entries {
            let name = entry.product_name.trim();
            if name.is_empty() {
                return Err(PipelineError::configuration(format!(
                    "catalog entry for product {} has an empty name",
                    entry.product_id
                )));
            }
            if names.contains_key(&entry.product_id) {
                return Err(PipelineError::configuration(format!(
                    "product {} appears more than once in the catalog",
                    entry.product_id
                )));
            }
            names.insert(entry.product_id, name.to_string());
        }
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.names.contains_key(product_id)
    }

    pub fn name_of(&self, product_id: &ProductId) -> Option<&str> {
        self.names.get(product_id).map(String::as_str)
    }

    /// Resolve a display name to a product id.
    ///
    /// Names are not a key: when several products share a name the smallest id wins,
    /// so the same name always resolves to the same product.
    pub fn resolve_name(&self, product_name: &str) -> Option<&ProductId> {
        let wanted = product_name.trim();
        self.names
            .iter()
            .find(|(_, name)| name.as_str() == wanted)
            .map(|(id, _)| id)
    }

    /// Catalog listings for `product_ids` (typically the ids seen in sales),
    /// sorted by name then id. Ids missing from the catalog are left out.
    pub fn listing<'a>(
        &self,
        product_ids: impl IntoIterator<Item = &'a ProductId>,
    ) -> Vec<CatalogListing> {
        let known: BTreeSet<CatalogListing> = product_ids
            .into_iter()
            .filter_map(|id| {
                self.names.get(id).map(|name| CatalogListing {
                    product_name: name.clone(),
                    product_id: id.clone(),
                })
            })
            .collect();
        known.into_iter().collect()
    }
}
