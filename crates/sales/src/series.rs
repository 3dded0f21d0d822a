//! Time series preparation: raw sales rows → one ordered point per day.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

use stockcast_core::{PipelineError, PipelineResult, ProductId, TimeSeriesPoint};

use crate::record::SalesRecord;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a sales date cell into a calendar date.
///
/// Accepts plain dates, naive date-times and RFC 3339 timestamps (the time part
/// is discarded). Returns `None` for anything else.
pub fn parse_sales_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Build the daily demand series for `product_id`.
///
/// Rows for other products are ignored and rows with unreadable dates are
/// dropped. Units sold on the same day are summed, and the result is sorted
/// ascending with exactly one point per date.
///
/// Fails with [`PipelineError::InsufficientHistory`] when fewer than
/// `min_points` days remain.
pub fn prepare(
    records: &[SalesRecord],
    product_id: &ProductId,
    min_points: usize,
) -> PipelineResult<Vec<TimeSeriesPoint>> {
    let mut daily: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    let mut dropped = 0usize;

    for record in records.iter().filter(|r| &r.product_id == product_id) {
        match parse_sales_date(&record.date) {
            Some(date) => *daily.entry(date).or_insert(0) += u64::from(record.units_sold),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(product = %product_id, dropped, "dropped sales rows with unparseable dates");
    }

    if daily.len() < min_points {
        return Err(PipelineError::InsufficientHistory {
            product_id: product_id.clone(),
            required: min_points,
            actual: daily.len(),
        });
    }

    Ok(daily
        .into_iter()
        .map(|(date, units)| TimeSeriesPoint::new(date, units as f64))
        .collect())
}
