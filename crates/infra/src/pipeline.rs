//! The forecasting core shared by both drivers: prepare → forecast → aggregate.

use stockcast_core::{ForecastPoint, PipelinePolicy, PipelineResult, ProductId};
use stockcast_forecast::{Forecaster, aggregate_demand, fit_and_forecast};
use stockcast_sales::{SalesRecord, prepare};

/// Forecast for one product plus the demand it implies over the horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductForecast {
    pub product_id: ProductId,
    /// Number of prepared daily points the model was fitted on.
    pub history_points: usize,
    pub horizon_days: usize,
    /// History estimates followed by the `horizon_days` future points.
    pub forecast: Vec<ForecastPoint>,
    pub forecasted_demand: i64,
}

impl ProductForecast {
    /// The future window (last `horizon_days` points).
    pub fn future(&self) -> &[ForecastPoint] {
        &self.forecast[self.history_points..]
    }
}

/// Run preparation, forecasting and aggregation for one product under `policy`.
pub fn forecast_product<F: Forecaster>(
    forecaster: &F,
    sales: &[SalesRecord],
    product_id: &ProductId,
    policy: &PipelinePolicy,
) -> PipelineResult<ProductForecast> {
    let series = prepare(sales, product_id, policy.min_history)?;
    let forecast = fit_and_forecast(forecaster, &series, policy.horizon_days, policy.seasonality)?;
    let forecasted_demand = aggregate_demand(&forecast, policy.horizon_days)?;

    Ok(ProductForecast {
        product_id: product_id.clone(),
        history_points: series.len(),
        horizon_days: policy.horizon_days,
        forecast,
        forecasted_demand,
    })
}
