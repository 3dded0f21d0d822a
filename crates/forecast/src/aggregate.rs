//! Demand aggregation over the forecast horizon.

use stockcast_core::{ForecastPoint, PipelineError, PipelineResult};

use crate::adapter::future_points;

/// Expected demand over the last `horizon_days` points of `forecast`.
///
/// Estimates are summed and rounded half away from zero to whole units.
pub fn aggregate_demand(forecast: &[ForecastPoint], horizon_days: usize) -> PipelineResult<i64> {
    if horizon_days == 0 {
        return Err(PipelineError::contract("demand horizon must be at least one day"));
    }

    let window = future_points(forecast, horizon_days)?;
    let total: f64 = window.iter().map(|p| p.estimate).sum();
    if !total.is_finite() {
        return Err(PipelineError::contract(format!(
            "forecasted demand over {horizon_days} day(s) is not finite"
        )));
    }
    if total.abs() >= i64::MAX as f64 {
        return Err(PipelineError::contract(format!(
            "forecasted demand {total} does not fit whole units"
        )));
    }

    // f64::round rounds half away from zero.
    Ok(total.round() as i64)
}
