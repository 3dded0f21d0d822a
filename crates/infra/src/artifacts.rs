//! Forecast artifacts: one CSV file per product.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use stockcast_core::{ForecastPoint, PipelineError, PipelineResult, ProductId};

/// Column order of every artifact.
pub const ARTIFACT_COLUMNS: &[&str] = &[
    "timestamp",
    "estimate",
    "lower_bound",
    "upper_bound",
    "product_id",
];

/// Destination for per-product forecasts.
///
/// Implementations must tolerate concurrent calls for *different* products.
pub trait ForecastSink: Send + Sync {
    /// Store `points` for `product_id`, returning where they went.
    fn persist(&self, product_id: &ProductId, points: &[ForecastPoint]) -> PipelineResult<PathBuf>;
}

/// Deterministic artifact file name for a product.
///
/// Bytes outside `[A-Za-z0-9_-]` (including `%`) are written as `%XX`, so two
/// distinct ids never share a file.
pub fn artifact_file_name(product_id: &ProductId) -> String {
    let mut stem = String::with_capacity(product_id.as_str().len());
    for byte in product_id.as_str().bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("%{byte:02X}"));
        }
    }
    format!("forecast_{stem}.csv")
}

#[derive(Debug, Serialize)]
struct ArtifactRow<'a> {
    timestamp: NaiveDate,
    estimate: f64,
    lower_bound: f64,
    upper_bound: f64,
    product_id: &'a ProductId,
}

/// Writes `forecast_<product_id>.csv` files into one directory.
///
/// Each file is written to a temporary sibling and renamed into place, so readers
/// never observe a half-written artifact.
#[derive(Debug, Clone)]
pub struct CsvForecastWriter {
    dir: PathBuf,
}

impl CsvForecastWriter {
    /// Use `dir` as output directory, creating it if needed.
    pub fn create(dir: impl Into<PathBuf>) -> PipelineResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            PipelineError::configuration(format!(
                "cannot create output directory {}: {e}",
                dir.display()
            ))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, product_id: &ProductId) -> PathBuf {
        self.dir.join(artifact_file_name(product_id))
    }

    fn write_file(
        &self,
        path: &Path,
        product_id: &ProductId,
        points: &[ForecastPoint],
    ) -> Result<(), String> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(|e| e.to_string())?;

        writer
            .write_record(ARTIFACT_COLUMNS)
            .map_err(|e| e.to_string())?;
        for p in points {
            writer
                .serialize(ArtifactRow {
                    timestamp: p.timestamp,
                    estimate: p.estimate,
                    lower_bound: p.lower_bound,
                    upper_bound: p.upper_bound,
                    product_id,
                })
                .map_err(|e| e.to_string())?;
        }
        writer.flush().map_err(|e| e.to_string())
    }
}

impl ForecastSink for CsvForecastWriter {
    fn persist(&self, product_id: &ProductId, points: &[ForecastPoint]) -> PipelineResult<PathBuf> {
        let path = self.path_for(product_id);
        let tmp = path.with_extension("csv.tmp");

        if let Err(reason) = self.write_file(&tmp, product_id, points) {
            let _ = fs::remove_file(&tmp);
            return Err(PipelineError::persistence(product_id, reason));
        }
        fs::rename(&tmp, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            PipelineError::persistence(product_id, e.to_string())
        })?;

        debug!(
            product = %product_id,
            rows = points.len(),
            path = %path.display(),
            "forecast artifact written"
        );
        Ok(path)
    }
}

/// In-memory sink for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryForecastSink {
    inner: Mutex<BTreeMap<ProductId, Vec<ForecastPoint>>>,
}

impl InMemoryForecastSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, product_id: &ProductId) -> Option<Vec<ForecastPoint>> {
        self.entries().get(product_id).cloned()
    }

    pub fn product_ids(&self) -> Vec<ProductId> {
        self.entries().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<ProductId, Vec<ForecastPoint>>> {
        // Poisoning is ignored: every write is a single map insert.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ForecastSink for InMemoryForecastSink {
    fn persist(&self, product_id: &ProductId, points: &[ForecastPoint]) -> PipelineResult<PathBuf> {
        self.entries().insert(product_id.clone(), points.to_vec());
        Ok(PathBuf::from(artifact_file_name(product_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{pid, temp_dir};

    fn points() -> Vec<ForecastPoint> {
        let d = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        vec![
            ForecastPoint::new(d, 10.5, 8.0, 13.0),
            ForecastPoint::new(d.succ_opt().unwrap(), 11.0, 8.5, 13.5),
        ]
    }

    #[test]
    fn file_names_are_deterministic_and_safe() {
        assert_eq!(artifact_file_name(&pid("FOO_09")), "forecast_FOO_09.csv");
        assert_eq!(artifact_file_name(&pid("a/b c")), "forecast_a%2Fb%20c.csv");
        assert_eq!(artifact_file_name(&pid("v1.2")), "forecast_v1%2E2.csv");
        assert_eq!(artifact_file_name(&pid("caf\u{e9}")), "forecast_caf%C3%A9.csv");
    }

    #[test]
    fn ids_differing_only_in_unsafe_characters_get_distinct_files() {
        let names: Vec<String> = ["SKU 1", "SKU_1", "SKU%201", "SKU/1"]
            .iter()
            .map(|id| artifact_file_name(&pid(id)))
            .collect();
        let unique: std::collections::BTreeSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), names.len(), "{names:?}");

        let dir = temp_dir();
        let writer = CsvForecastWriter::create(&dir).unwrap();
        let spaced = writer.persist(&pid("SKU 1"), &points()).unwrap();
        let underscored = writer.persist(&pid("SKU_1"), &points()[..1]).unwrap();

        assert_ne!(spaced, underscored);
        assert_eq!(
            spaced.with_extension("csv.tmp").file_name().unwrap(),
            "forecast_SKU%201.csv.tmp"
        );
        assert!(fs::read_to_string(&spaced).unwrap().contains(",SKU 1"));
        assert_eq!(fs::read_to_string(&underscored).unwrap().lines().count(), 2);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn csv_writer_persists_rows_with_header() {
        let dir = temp_dir();
        let writer = CsvForecastWriter::create(dir.join("nested")).unwrap();
        let path = writer.persist(&pid("FOO_09"), &points()).unwrap();

        assert_eq!(path, writer.path_for(&pid("FOO_09")));
        let written = fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next(),
            Some("timestamp,estimate,lower_bound,upper_bound,product_id")
        );
        assert_eq!(lines.next(), Some("2024-02-01,10.5,8.0,13.0,FOO_09"));
        assert_eq!(lines.count(), 1);
        assert!(!path.with_extension("csv.tmp").exists());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn rewriting_replaces_previous_artifact() {
        let dir = temp_dir();
        let writer = CsvForecastWriter::create(&dir).unwrap();
        writer.persist(&pid("P1"), &points()).unwrap();
        let path = writer.persist(&pid("P1"), &points()[..1]).unwrap();

        assert_eq!(fs::read_to_string(path).unwrap().lines().count(), 2);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn write_failure_is_a_persistence_error() {
        let dir = temp_dir();
        let writer = CsvForecastWriter::create(&dir).unwrap();
        // A directory squatting on the artifact's temp path makes the write fail.
        fs::create_dir_all(writer.path_for(&pid("P1")).with_extension("csv.tmp")).unwrap();

        assert!(matches!(
            writer.persist(&pid("P1"), &points()),
            Err(PipelineError::Persistence { .. })
        ));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn in_memory_sink_keeps_latest_points() {
        let sink = InMemoryForecastSink::new();
        assert!(sink.is_empty());
        sink.persist(&pid("P1"), &points()).unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.get(&pid("P1")).unwrap().len(), 2);
        assert_eq!(sink.product_ids(), vec![pid("P1")]);
    }
}
