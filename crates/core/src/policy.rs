//! Run policy shared by the batch and single-product drivers.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// Seasonality configuration handed to the forecasting capability.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalityMode {
    /// Model day-of-week effects.
    pub daily_seasonality: bool,
}

impl SeasonalityMode {
    pub fn daily() -> Self {
        Self {
            daily_seasonality: true,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

/// Parameters of one pipeline execution: horizon, history threshold, seasonality.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelinePolicy {
    /// Number of future days to forecast and aggregate.
    pub horizon_days: usize,
    /// Minimum number of prepared daily points before a product is forecast.
    pub min_history: usize,
    pub seasonality: SeasonalityMode,
}

impl PipelinePolicy {
    /// Lowest threshold any caller may configure; fitting a trend needs two points.
    pub const MIN_HISTORY_FLOOR: usize = 2;

    /// Interactive check: one week ahead, anything with two days of history.
    pub fn interactive() -> Self {
        Self {
            horizon_days: 7,
            min_history: 2,
            seasonality: SeasonalityMode::none(),
        }
    }

    /// Bulk run: two months ahead, only products with a month of history.
    pub fn batch() -> Self {
        Self {
            horizon_days: 60,
            min_history: 30,
            seasonality: SeasonalityMode::daily(),
        }
    }

    pub fn with_horizon_days(mut self, horizon_days: usize) -> Self {
        self.horizon_days = horizon_days;
        self
    }

    pub fn with_min_history(mut self, min_history: usize) -> Self {
        self.min_history = min_history;
        self
    }

    pub fn with_seasonality(mut self, seasonality: SeasonalityMode) -> Self {
        self.seasonality = seasonality;
        self
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if self.horizon_days == 0 {
            return Err(PipelineError::configuration(
                "horizon_days must be at least 1",
            ));
        }
        if self.min_history < Self::MIN_HISTORY_FLOOR {
            return Err(PipelineError::configuration(format!(
                "min_history must be at least {}",
                Self::MIN_HISTORY_FLOOR
            )));
        }
        Ok(())
    }
}

impl Default for PipelinePolicy {
    fn default() -> Self {
        Self::interactive()
    }
}
