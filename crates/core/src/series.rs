//! Series types exchanged between pipeline stages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One observed day of demand for a product.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub timestamp: NaiveDate,
    pub quantity: f64,
}

impl TimeSeriesPoint {
    pub fn new(timestamp: NaiveDate, quantity: f64) -> Self {
        Self {
            timestamp,
            quantity,
        }
    }
}

/// One forecast day: point estimate plus its uncertainty bracket.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: NaiveDate,
    pub estimate: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl ForecastPoint {
    pub fn new(timestamp: NaiveDate, estimate: f64, lower_bound: f64, upper_bound: f64) -> Self {
        Self {
            timestamp,
            estimate,
            lower_bound,
            upper_bound,
        }
    }

    /// `lower_bound <= estimate <= upper_bound` (false for any NaN component).
    pub fn bounds_ordered(&self) -> bool {
        self.lower_bound <= self.estimate && self.estimate <= self.upper_bound
    }
}
