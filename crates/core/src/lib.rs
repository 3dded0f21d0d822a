//! `stockcast-core`: shared building blocks for the forecasting pipeline.
//!
//! This crate contains **pure** primitives (no IO): identifiers, the series types
//! exchanged between pipeline stages, run policy and the error taxonomy.

pub mod error;
pub mod id;
pub mod policy;
pub mod series;

pub use error::{PipelineError, PipelineResult};
pub use id::{ProductId, RunId, WarehouseId};
pub use policy::{PipelinePolicy, SeasonalityMode};
pub use series::{ForecastPoint, TimeSeriesPoint};
