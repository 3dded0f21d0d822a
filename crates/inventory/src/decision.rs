//! Inventory sufficiency decision.

use serde::{Deserialize, Serialize};

use stockcast_core::ProductId;

use crate::stock::{InventoryRecord, current_stock};

/// Whether stock covers forecasted demand.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    Sufficient,
    Shortage,
}

impl core::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StockStatus::Sufficient => f.write_str("SUFFICIENT"),
            StockStatus::Shortage => f.write_str("SHORTAGE"),
        }
    }
}

/// Outcome of comparing current stock against forecasted demand for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryDecision {
    pub product_id: ProductId,
    pub current_stock: i64,
    pub forecasted_demand: i64,
    pub status: StockStatus,
    /// `max(0, forecasted_demand - current_stock)`; zero when sufficient.
    pub shortage_amount: i64,
}

impl InventoryDecision {
    /// Classify `current_stock` against `forecasted_demand`.
    pub fn evaluate(product_id: ProductId, current_stock: i64, forecasted_demand: i64) -> Self {
        let shortage_amount = forecasted_demand.saturating_sub(current_stock).max(0);
        let status = if shortage_amount == 0 {
            StockStatus::Sufficient
        } else {
            StockStatus::Shortage
        };

        Self {
            product_id,
            current_stock,
            forecasted_demand,
            status,
            shortage_amount,
        }
    }

    pub fn is_shortage(&self) -> bool {
        self.status == StockStatus::Shortage
    }

    /// User-facing status line.
    pub fn status_message(&self) -> String {
        match self.status {
            StockStatus::Sufficient => {
                "Current inventory is sufficient to meet forecasted demand.".to_string()
            }
            StockStatus::Shortage => format!(
                "Inventory shortage of {} units! Consider restocking.",
                self.shortage_amount
            ),
        }
    }
}

/// Sum stock for `product_id` and decide whether it covers `forecasted_demand`.
pub fn compare(
    records: &[InventoryRecord],
    product_id: &ProductId,
    forecasted_demand: i64,
) -> InventoryDecision {
    InventoryDecision::evaluate(
        product_id.clone(),
        current_stock(records, product_id),
        forecasted_demand,
    )
}
