//! CSV input tables.
//!
//! Every table has a header row; columns beyond the required ones are ignored.
//! A missing file, a missing required column or a row that cannot be decoded is
//! a `Configuration` error raised before any pipeline logic runs.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::info;

use stockcast_core::{PipelineError, PipelineResult};
use stockcast_inventory::InventoryRecord;
use stockcast_products::{Catalog, ProductCatalogEntry};
use stockcast_sales::SalesRecord;

pub const SALES_COLUMNS: &[&str] = &["product_id", "date", "units_sold"];
pub const CATALOG_COLUMNS: &[&str] = &["product_id", "product_name"];
pub const INVENTORY_COLUMNS: &[&str] = &["product_id", "warehouse", "stock_level"];

pub const SALES_FILE: &str = "sales_data.csv";
pub const CATALOG_FILE: &str = "product_catalog.csv";
pub const INVENTORY_FILE: &str = "inventory_data.csv";

/// Locations of the three input tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub sales: PathBuf,
    pub catalog: PathBuf,
    pub inventory: PathBuf,
}

impl DataPaths {
    /// Conventional file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            sales: dir.join(SALES_FILE),
            catalog: dir.join(CATALOG_FILE),
            inventory: dir.join(INVENTORY_FILE),
        }
    }

    pub fn with_sales(mut self, path: impl Into<PathBuf>) -> Self {
        self.sales = path.into();
        self
    }

    pub fn with_catalog(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog = path.into();
        self
    }

    pub fn with_inventory(mut self, path: impl Into<PathBuf>) -> Self {
        self.inventory = path.into();
        self
    }
}

/// All input tables of one run.
///
/// Loaded once per invocation and shared read-only by every product; never
/// cached across runs.
#[derive(Debug, Clone, Default)]
pub struct DataTables {
    pub sales: Vec<SalesRecord>,
    pub catalog: Catalog,
    pub inventory: Vec<InventoryRecord>,
}

impl DataTables {
    pub fn load(paths: &DataPaths) -> PipelineResult<Self> {
        let tables = Self {
            sales: load_sales(&paths.sales)?,
            catalog: load_catalog(&paths.catalog)?,
            inventory: load_inventory(&paths.inventory)?,
        };
        info!(
            sales_rows = tables.sales.len(),
            catalog_entries = tables.catalog.len(),
            inventory_rows = tables.inventory.len(),
            "input tables loaded"
        );
        Ok(tables)
    }
}

pub fn load_sales(path: &Path) -> PipelineResult<Vec<SalesRecord>> {
    read_sales(open_table(path, "sales")?)
}

pub fn load_catalog(path: &Path) -> PipelineResult<Catalog> {
    read_catalog(open_table(path, "catalog")?)
}

pub fn load_inventory(path: &Path) -> PipelineResult<Vec<InventoryRecord>> {
    read_inventory(open_table(path, "inventory")?)
}

pub fn read_sales<R: Read>(reader: R) -> PipelineResult<Vec<SalesRecord>> {
    read_table(reader, "sales", SALES_COLUMNS)
}

pub fn read_catalog<R: Read>(reader: R) -> PipelineResult<Catalog> {
    let entries: Vec<ProductCatalogEntry> = read_table(reader, "catalog", CATALOG_COLUMNS)?;
    Catalog::from_entries(entries)
}

pub fn read_inventory<R: Read>(reader: R) -> PipelineResult<Vec<InventoryRecord>> {
    read_table(reader, "inventory", INVENTORY_COLUMNS)
}

/// Decode every row of a CSV table after checking its header.
pub fn read_table<T, R>(reader: R, table: &str, required: &[&str]) -> PipelineResult<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| {
            PipelineError::configuration(format!("{table} table: cannot read header row: {e}"))
        })?
        .clone();

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::configuration(format!(
            "{table} table is missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let mut rows = Vec::new();
    for (index, result) in csv_reader.deserialize().enumerate() {
        let row: T = result.map_err(|e| {
            PipelineError::configuration(format!(
                "{table} table: malformed row at line {}: {e}",
                index + 2
            ))
        })?;
        rows.push(row);
    }
    Ok(rows)
}

fn open_table(path: &Path, table: &str) -> PipelineResult<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => PipelineError::configuration(format!(
            "{table} table not found: {}",
            path.display()
        )),
        _ => PipelineError::configuration(format!(
            "cannot open {table} table {}: {e}",
            path.display()
        )),
    })
}
