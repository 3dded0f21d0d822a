//! Infrastructure layer: table IO, forecast artifacts and the two pipeline drivers.
//!
//! - `tables`: CSV input tables (sales, catalog, inventory), loaded once per run.
//! - `artifacts`: per-product forecast persistence.
//! - `pipeline`: the shared prepare → forecast → aggregate core.
//! - `batch`: many products, failures isolated per product.
//! - `runner`: one product end to end, including the inventory decision.

pub mod artifacts;
pub mod batch;
pub mod pipeline;
pub mod runner;
pub mod tables;

mod integration_tests;
#[cfg(test)]
mod test_support;

pub use artifacts::{CsvForecastWriter, ForecastSink, InMemoryForecastSink, artifact_file_name};
pub use batch::{BatchConfig, BatchOrchestrator, BatchReport, ProductOutcome, ProductState};
pub use pipeline::{ProductForecast, forecast_product};
pub use runner::{ProductReport, ProductSelector, SingleProductRunner, selectable_products};
pub use tables::{DataPaths, DataTables};
