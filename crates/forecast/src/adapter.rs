//! Uniform entry point over any [`Forecaster`].
//!
//! The adapter owns the pipeline's side of the contract: it refuses malformed
//! series before fitting, wraps capability errors, and checks the produced
//! sequence (length, dates, bound ordering) before anyone aggregates it.

use stockcast_core::{
    ForecastPoint, PipelineError, PipelineResult, SeasonalityMode, TimeSeriesPoint,
};

use crate::error::ForecastError;
use crate::forecaster::Forecaster;

/// Fit `forecaster` on `series` and predict `horizon_days` ahead.
///
/// Returns `series.len() + horizon_days` points: one per observed date, then the
/// future window. Errors:
/// - fewer than two points, or any error from the capability → `ForecastingFailure`;
/// - unordered/duplicate input dates, zero horizon, or output breaking the
///   contract → `ContractViolation`.
pub fn fit_and_forecast<F: Forecaster>(
    forecaster: &F,
    series: &[TimeSeriesPoint],
    horizon_days: usize,
    seasonality: SeasonalityMode,
) -> PipelineResult<Vec<ForecastPoint>> {
    if horizon_days == 0 {
        return Err(PipelineError::contract("forecast horizon must be at least one day"));
    }
    if series.len() < 2 {
        return Err(PipelineError::forecasting(ForecastError::InsufficientData {
            required: 2,
            actual: series.len(),
        }));
    }
    if let Some(pair) = series.windows(2).find(|w| w[0].timestamp >= w[1].timestamp) {
        return Err(PipelineError::contract(format!(
            "series must be strictly increasing by date ({} is followed by {})",
            pair[0].timestamp, pair[1].timestamp
        )));
    }

    let model = forecaster
        .fit(series, seasonality)
        .map_err(PipelineError::forecasting)?;
    let forecast = forecaster
        .predict(&model, horizon_days)
        .map_err(PipelineError::forecasting)?;

    check_output(series, &forecast, horizon_days)?;
    Ok(forecast)
}

/// The trailing `horizon_days` points of a forecast (the future window).
pub fn future_points(
    forecast: &[ForecastPoint],
    horizon_days: usize,
) -> PipelineResult<&[ForecastPoint]> {
    if horizon_days > forecast.len() {
        return Err(PipelineError::contract(format!(
            "forecast holds {} point(s), cannot take a {horizon_days}-day window",
            forecast.len()
        )));
    }
    Ok(&forecast[forecast.len() - horizon_days..])
}

fn check_output(
    series: &[TimeSeriesPoint],
    forecast: &[ForecastPoint],
    horizon_days: usize,
) -> PipelineResult<()> {
    let expected = series.len() + horizon_days;
    if forecast.len() != expected {
        return Err(PipelineError::contract(format!(
            "forecaster returned {} point(s), expected {expected}",
            forecast.len()
        )));
    }

    if let Some(bad) = forecast.iter().find(|p| !p.bounds_ordered()) {
        return Err(PipelineError::contract(format!(
            "forecast for {} is not bracketed (lower={}, estimate={}, upper={})",
            bad.timestamp, bad.lower_bound, bad.estimate, bad.upper_bound
        )));
    }

    let last_observed = series[series.len() - 1].timestamp;
    let future = &forecast[series.len()..];
    if let Some(stale) = future.iter().find(|p| p.timestamp <= last_observed) {
        return Err(PipelineError::contract(format!(
            "future point dated {} does not follow last observation {last_observed}",
            stale.timestamp
        )));
    }
    if future.windows(2).any(|w| w[0].timestamp >= w[1].timestamp) {
        return Err(PipelineError::contract("future points are not in date order"));
    }

    Ok(())
}
