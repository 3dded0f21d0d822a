//! `stockcast-forecast`
//!
//! **Responsibility:** forecasting boundary of the pipeline.
//!
//! - [`Forecaster`] is the pluggable capability contract (fit, then predict N days ahead).
//! - [`SeasonalTrendForecaster`] is the default capability shipped with the workspace.
//! - [`fit_and_forecast`] runs any capability and checks its output contract.
//! - [`aggregate_demand`] turns the forecast window into one whole-unit demand figure.
//!
//! This crate does not know about tables, catalogs or stock levels.

pub mod adapter;
pub mod aggregate;
pub mod error;
pub mod forecaster;
pub mod seasonal_trend;

pub use adapter::{fit_and_forecast, future_points};
pub use aggregate::aggregate_demand;
pub use error::ForecastError;
pub use forecaster::Forecaster;
pub use seasonal_trend::{SeasonalTrendForecaster, SeasonalTrendModel};
