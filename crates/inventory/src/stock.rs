use serde::{Deserialize, Serialize};

use stockcast_core::{ProductId, WarehouseId};

/// Stock on hand for one product at one warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub product_id: ProductId,
    pub warehouse: WarehouseId,
    pub stock_level: u32,
}

impl InventoryRecord {
    pub fn new(product_id: ProductId, warehouse: WarehouseId, stock_level: u32) -> Self {
        Self {
            product_id,
            warehouse,
            stock_level,
        }
    }
}

/// Total stock for `product_id` across all warehouses.
///
/// A product with no inventory rows has zero stock.
pub fn current_stock(records: &[InventoryRecord], product_id: &ProductId) -> i64 {
    records
        .iter()
        .filter(|r| &r.product_id == product_id)
        .map(|r| i64::from(r.stock_level))
        .sum()
}
