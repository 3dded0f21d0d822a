//! Inventory module.
//!
//! Stock records per warehouse and the sufficiency decision against forecasted
//! demand, implemented as pure functions (no IO, no storage).

pub mod decision;
pub mod stock;

pub use decision::{InventoryDecision, StockStatus, compare};
pub use stock::{InventoryRecord, current_stock};
