use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use stockcast_core::ProductId;

/// One sales transaction row.
///
/// `date` is kept as the raw cell text: preparation parses it and drops rows it
/// cannot read instead of rejecting the whole table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub product_id: ProductId,
    pub date: String,
    pub units_sold: u32,
}

impl SalesRecord {
    pub fn new(product_id: ProductId, date: impl Into<String>, units_sold: u32) -> Self {
        Self {
            product_id,
            date: date.into(),
            units_sold,
        }
    }
}

/// Distinct product ids in order of first appearance.
pub fn distinct_product_ids(records: &[SalesRecord]) -> Vec<ProductId> {
    let mut seen: HashSet<&ProductId> = HashSet::new();
    let mut ids = Vec::new();
    for record in records {
        if seen.insert(&record.product_id) {
            ids.push(record.product_id.clone());
        }
    }
    ids
}
