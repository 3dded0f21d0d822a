use stockcast_core::{ForecastPoint, SeasonalityMode, TimeSeriesPoint};

/// A time-series forecasting capability.
///
/// Implementations receive a chronologically ordered daily series with one point
/// per date. `predict` must return one point per observed date followed by
/// `horizon_days` points for the days after the last observation, each with
/// `lower_bound <= estimate <= upper_bound`. [`crate::fit_and_forecast`] enforces
/// this on every call.
///
/// Neither method may mutate shared state: the batch driver calls one instance
/// from several worker threads.
pub trait Forecaster: Send + Sync {
    /// Fitted model handle.
    type Model;

    type Error: std::error::Error + Send + Sync + 'static;

    /// Fit a model to `series`.
    fn fit(
        &self,
        series: &[TimeSeriesPoint],
        seasonality: SeasonalityMode,
    ) -> Result<Self::Model, Self::Error>;

    /// Estimate every observed date plus `horizon_days` future days.
    fn predict(
        &self,
        model: &Self::Model,
        horizon_days: usize,
    ) -> Result<Vec<ForecastPoint>, Self::Error>;
}
