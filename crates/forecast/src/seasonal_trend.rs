//! Default forecasting capability: additive linear trend + day-of-week effects.
//!
//! Model:
//! - Regress quantity on the day offset from the first observation (OLS), so gaps
//!   in the history keep their true spacing.
//! - With daily seasonality on, average the detrended residuals per weekday and
//!   centre them to sum to zero.
//! - Bracket each estimate with `z * sigma * sqrt(1 + h / n)`, where `sigma` is the
//!   residual standard deviation and `h` the number of days past the last observation.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use stockcast_core::{ForecastPoint, SeasonalityMode, TimeSeriesPoint};

use crate::error::ForecastError;
use crate::forecaster::Forecaster;

/// Two-sided 80% normal quantile.
const DEFAULT_INTERVAL_Z: f64 = 1.2816;

/// Weekday effects need two full weeks of span to be meaningful.
const MIN_SEASONAL_SPAN_DAYS: i64 = 14;

/// Fitted seasonal-trend model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalTrendModel {
    origin: NaiveDate,
    observed: Vec<NaiveDate>,
    intercept: f64,
    slope: f64,
    /// Additive effect per weekday, Monday first.
    weekday_effects: [f64; 7],
    residual_std: f64,
}

impl SeasonalTrendModel {
    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn weekday_effects(&self) -> &[f64; 7] {
        &self.weekday_effects
    }

    pub fn residual_std(&self) -> f64 {
        self.residual_std
    }

    /// Point estimate for `date`.
    pub fn estimate_at(&self, date: NaiveDate) -> f64 {
        let t = (date - self.origin).num_days() as f64;
        self.intercept + self.slope * t + self.weekday_effects[weekday_index(date)]
    }

    fn point(&self, date: NaiveDate, half_width: f64) -> ForecastPoint {
        let estimate = self.estimate_at(date);
        ForecastPoint::new(date, estimate, estimate - half_width, estimate + half_width)
    }
}

/// Additive trend + weekday seasonality forecaster.
#[derive(Debug, Copy, Clone)]
pub struct SeasonalTrendForecaster {
    interval_z: f64,
}

impl Default for SeasonalTrendForecaster {
    fn default() -> Self {
        Self::new()
    }
}

impl SeasonalTrendForecaster {
    pub fn new() -> Self {
        Self {
            interval_z: DEFAULT_INTERVAL_Z,
        }
    }

    /// Override the normal quantile used for the uncertainty bracket.
    pub fn with_interval_z(mut self, interval_z: f64) -> Self {
        self.interval_z = interval_z;
        self
    }
}

impl Forecaster for SeasonalTrendForecaster {
    type Model = SeasonalTrendModel;
    type Error = ForecastError;

    fn fit(
        &self,
        series: &[TimeSeriesPoint],
        seasonality: SeasonalityMode,
    ) -> Result<Self::Model, Self::Error> {
        if !(self.interval_z.is_finite() && self.interval_z >= 0.0) {
            return Err(ForecastError::InvalidInput(
                "interval_z must be a finite non-negative number".to_string(),
            ));
        }
        if series.len() < 2 {
            return Err(ForecastError::InsufficientData {
                required: 2,
                actual: series.len(),
            });
        }
        if series.iter().any(|p| !p.quantity.is_finite()) {
            return Err(ForecastError::InvalidInput(
                "quantities must be finite".to_string(),
            ));
        }
        if series.windows(2).any(|w| w[0].timestamp >= w[1].timestamp) {
            return Err(ForecastError::InvalidInput(
                "timestamps must be strictly increasing".to_string(),
            ));
        }

        let origin = series[0].timestamp;
        let ts: Vec<f64> = series
            .iter()
            .map(|p| (p.timestamp - origin).num_days() as f64)
            .collect();
        let ys: Vec<f64> = series.iter().map(|p| p.quantity).collect();

        let (intercept, slope) = ols(&ts, &ys)?;

        let detrended: Vec<f64> = ts
            .iter()
            .zip(&ys)
            .map(|(t, y)| y - (intercept + slope * t))
            .collect();

        let span = (series[series.len() - 1].timestamp - origin).num_days();
        let weekday_effects = if seasonality.daily_seasonality && span >= MIN_SEASONAL_SPAN_DAYS {
            weekday_means(series, &detrended)
        } else {
            [0.0; 7]
        };

        let sse: f64 = series
            .iter()
            .zip(&detrended)
            .map(|(p, r)| {
                let e = r - weekday_effects[weekday_index(p.timestamp)];
                e * e
            })
            .sum();
        let dof = series.len().saturating_sub(2).max(1) as f64;
        let residual_std = (sse / dof).sqrt();

        if !(slope.is_finite() && intercept.is_finite() && residual_std.is_finite()) {
            return Err(ForecastError::Numerical(
                "fit produced non-finite parameters".to_string(),
            ));
        }

        Ok(SeasonalTrendModel {
            origin,
            observed: series.iter().map(|p| p.timestamp).collect(),
            intercept,
            slope,
            weekday_effects,
            residual_std,
        })
    }

    fn predict(
        &self,
        model: &Self::Model,
        horizon_days: usize,
    ) -> Result<Vec<ForecastPoint>, Self::Error> {
        let last = *model
            .observed
            .last()
            .ok_or_else(|| ForecastError::InvalidInput("model has no observations".to_string()))?;

        let base_width = self.interval_z * model.residual_std;
        let n = model.observed.len() as f64;

        let mut points = Vec::with_capacity(model.observed.len() + horizon_days);
        points.extend(model.observed.iter().map(|d| model.point(*d, base_width)));

        for step in 1..=horizon_days {
            let date = last.checked_add_days(Days::new(step as u64)).ok_or_else(|| {
                ForecastError::Numerical(format!("date overflow {step} day(s) after {last}"))
            })?;
            let widening = (1.0 + step as f64 / n).sqrt();
            points.push(model.point(date, base_width * widening));
        }

        Ok(points)
    }
}

fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

/// Least-squares line through `(ts, ys)`: returns `(intercept, slope)`.
fn ols(ts: &[f64], ys: &[f64]) -> Result<(f64, f64), ForecastError> {
    let n = ts.len() as f64;
    let mean_t = ts.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let sxx: f64 = ts.iter().map(|t| (t - mean_t).powi(2)).sum();
    if sxx < 1e-10 {
        return Err(ForecastError::Numerical(
            "singular design: all observations share one timestamp".to_string(),
        ));
    }
    let sxy: f64 = ts
        .iter()
        .zip(ys)
        .map(|(t, y)| (t - mean_t) * (y - mean_y))
        .sum();

    let slope = sxy / sxx;
    Ok((mean_y - slope * mean_t, slope))
}

/// Mean residual per weekday, centred over the weekdays that were observed.
fn weekday_means(series: &[TimeSeriesPoint], residuals: &[f64]) -> [f64; 7] {
    let mut sums = [0.0; 7];
    let mut counts = [0usize; 7];
    for (p, r) in series.iter().zip(residuals) {
        let idx = weekday_index(p.timestamp);
        sums[idx] += r;
        counts[idx] += 1;
    }

    let mut effects = [0.0; 7];
    let mut observed = 0usize;
    for i in 0..7 {
        if counts[i] > 0 {
            effects[i] = sums[i] / counts[i] as f64;
            observed += 1;
        }
    }
    if observed == 0 {
        return effects;
    }

    let centre = effects.iter().sum::<f64>() / observed as f64;
    for i in 0..7 {
        if counts[i] > 0 {
            effects[i] -= centre;
        }
    }
    effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn day(offset: i64) -> NaiveDate {
        // 2024-01-01 is a Monday.
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(offset)
    }

    fn series(points: &[(i64, f64)]) -> Vec<TimeSeriesPoint> {
        points
            .iter()
            .map(|(d, q)| TimeSeriesPoint::new(day(*d), *q))
            .collect()
    }

    #[test]
    fn recovers_linear_trend() {
        let data: Vec<(i64, f64)> = (0..10).map(|i| (i, 10.0 + 2.0 * i as f64)).collect();
        let forecaster = SeasonalTrendForecaster::new();
        let model = forecaster.fit(&series(&data), SeasonalityMode::none()).unwrap();

        assert!((model.slope() - 2.0).abs() < 1e-9);
        assert!((model.intercept() - 10.0).abs() < 1e-9);
        assert!(model.residual_std() < 1e-9);

        let forecast = forecaster.predict(&model, 3).unwrap();
        assert_eq!(forecast.len(), 13);
        let future = &forecast[10..];
        assert_eq!(future[0].timestamp, day(10));
        assert!((future[0].estimate - 30.0).abs() < 1e-9);
        assert!((future[1].estimate - 32.0).abs() < 1e-9);
        assert!((future[2].estimate - 34.0).abs() < 1e-9);
    }

    #[test]
    fn respects_gaps_between_observations() {
        let forecaster = SeasonalTrendForecaster::new();
        let model = forecaster
            .fit(&series(&[(0, 0.0), (2, 4.0), (4, 8.0)]), SeasonalityMode::none())
            .unwrap();

        let forecast = forecaster.predict(&model, 1).unwrap();
        let next = forecast.last().unwrap();
        assert_eq!(next.timestamp, day(5));
        assert!((next.estimate - 10.0).abs() < 1e-9);
    }

    #[test]
    fn daily_seasonality_picks_up_weekday_peaks() {
        // Four weeks, Saturdays sell 20 extra units.
        let data: Vec<(i64, f64)> = (0..28)
            .map(|i| (i, if i % 7 == 5 { 30.0 } else { 10.0 }))
            .collect();
        let forecaster = SeasonalTrendForecaster::new();

        let seasonal = forecaster.fit(&series(&data), SeasonalityMode::daily()).unwrap();
        let forecast = forecaster.predict(&seasonal, 7).unwrap();
        let friday = forecast.iter().find(|p| p.timestamp == day(32)).unwrap();
        let saturday = forecast.iter().find(|p| p.timestamp == day(33)).unwrap();
        assert!(saturday.estimate - friday.estimate > 15.0);

        let flat = forecaster.fit(&series(&data), SeasonalityMode::none()).unwrap();
        assert!(flat.weekday_effects().iter().all(|e| *e == 0.0));
        assert!(
            (flat.estimate_at(day(33)) - flat.estimate_at(day(32))).abs() < 1.0
        );
    }

    #[test]
    fn short_span_skips_weekday_effects() {
        let data: Vec<(i64, f64)> = (0..7).map(|i| (i, i as f64)).collect();
        let model = SeasonalTrendForecaster::new()
            .fit(&series(&data), SeasonalityMode::daily())
            .unwrap();
        assert_eq!(model.weekday_effects(), &[0.0; 7]);
    }

    #[test]
    fn uncertainty_widens_with_horizon() {
        let data: Vec<(i64, f64)> = (0..20)
            .map(|i| (i, 10.0 + if i % 2 == 0 { 3.0 } else { -3.0 }))
            .collect();
        let forecaster = SeasonalTrendForecaster::new();
        let model = forecaster.fit(&series(&data), SeasonalityMode::none()).unwrap();
        let forecast = forecaster.predict(&model, 5).unwrap();

        let widths: Vec<f64> = forecast[20..]
            .iter()
            .map(|p| p.upper_bound - p.lower_bound)
            .collect();
        for pair in widths.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn rejects_invalid_series() {
        let forecaster = SeasonalTrendForecaster::new();

        assert_eq!(
            forecaster.fit(&series(&[(0, 1.0)]), SeasonalityMode::none()),
            Err(ForecastError::InsufficientData {
                required: 2,
                actual: 1
            })
        );
        assert!(matches!(
            forecaster.fit(&series(&[(0, 1.0), (0, 2.0)]), SeasonalityMode::none()),
            Err(ForecastError::InvalidInput(_))
        ));
        assert!(matches!(
            forecaster.fit(&series(&[(0, 1.0), (1, f64::NAN)]), SeasonalityMode::none()),
            Err(ForecastError::InvalidInput(_))
        ));
        assert!(matches!(
            SeasonalTrendForecaster::new()
                .with_interval_z(-1.0)
                .fit(&series(&[(0, 1.0), (1, 2.0)]), SeasonalityMode::none()),
            Err(ForecastError::InvalidInput(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: every produced point is bracketed, history comes first and the
        /// horizon covers the consecutive days after the last observation.
        #[test]
        fn forecasts_are_bracketed_and_shaped(
            rows in prop::collection::vec((1i64..4, 0u32..500), 2..90),
            horizon in 1usize..30,
            daily in prop::bool::ANY,
        ) {
            let mut offset = 0i64;
            let data: Vec<(i64, f64)> = rows
                .iter()
                .map(|(gap, q)| {
                    offset += gap;
                    (offset, f64::from(*q))
                })
                .collect();
            let input = series(&data);
            let mode = if daily { SeasonalityMode::daily() } else { SeasonalityMode::none() };

            let forecaster = SeasonalTrendForecaster::new();
            let model = forecaster.fit(&input, mode).unwrap();
            let forecast = forecaster.predict(&model, horizon).unwrap();

            prop_assert_eq!(forecast.len(), input.len() + horizon);
            for p in &forecast {
                prop_assert!(p.bounds_ordered());
            }
            let last = input[input.len() - 1].timestamp;
            for (i, p) in forecast[input.len()..].iter().enumerate() {
                prop_assert_eq!(p.timestamp, last + chrono::Duration::days(i as i64 + 1));
            }
        }
    }
}
