//! Shared fixtures for infra tests.

use std::path::PathBuf;

use chrono::NaiveDate;

use stockcast_core::{ForecastPoint, ProductId, SeasonalityMode, TimeSeriesPoint};
use stockcast_forecast::{ForecastError, Forecaster, SeasonalTrendForecaster, SeasonalTrendModel};
use stockcast_sales::SalesRecord;

/// Units sold on the first day of a series that [`FailOnSentinel`] refuses to fit.
pub const SENTINEL_UNITS: u32 = 13_013;

pub fn pid(s: &str) -> ProductId {
    ProductId::new(s).unwrap()
}

/// Fresh, unique directory under the system temp dir.
pub fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("stockcast-test-{}", uuid::Uuid::now_v7()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// `days` consecutive daily sales rows starting 2024-01-01, units from `units(day)`.
pub fn daily_sales(product: &str, days: u32, units: impl Fn(u32) -> u32) -> Vec<SalesRecord> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..days)
        .map(|d| {
            let date = start + chrono::Duration::days(i64::from(d));
            SalesRecord::new(pid(product), date.format("%Y-%m-%d").to_string(), units(d))
        })
        .collect()
}

/// Default forecaster that fails to fit any series opening with [`SENTINEL_UNITS`].
#[derive(Debug, Default)]
pub struct FailOnSentinel {
    inner: SeasonalTrendForecaster,
}

impl Forecaster for FailOnSentinel {
    type Model = SeasonalTrendModel;
    type Error = ForecastError;

    fn fit(
        &self,
        series: &[TimeSeriesPoint],
        seasonality: SeasonalityMode,
    ) -> Result<Self::Model, Self::Error> {
        if series.first().map(|p| p.quantity) == Some(f64::from(SENTINEL_UNITS)) {
            return Err(ForecastError::Numerical("optimizer diverged".to_string()));
        }
        self.inner.fit(series, seasonality)
    }

    fn predict(
        &self,
        model: &Self::Model,
        horizon_days: usize,
    ) -> Result<Vec<ForecastPoint>, Self::Error> {
        self.inner.predict(model, horizon_days)
    }
}
