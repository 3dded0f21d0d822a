//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use stockcast_core::{PipelinePolicy, ProductId, SeasonalityMode};
use stockcast_infra::{DataPaths, ProductSelector};
use stockcast_observability::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "stockcast")]
#[command(about = "Demand forecasting and inventory sufficiency checks", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub data: DataArgs,

    /// Log line format (logs go to stderr)
    #[arg(long, value_enum, default_value_t = LogFormatArg::Json, global = true)]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the input tables live. Only these paths are read from the environment.
#[derive(Debug, Args)]
pub struct DataArgs {
    /// Directory holding sales_data.csv, product_catalog.csv and inventory_data.csv
    #[arg(long, env = "STOCKCAST_DATA_DIR", default_value = "data", global = true)]
    pub data_dir: PathBuf,

    /// Sales table path (overrides --data-dir)
    #[arg(long, env = "STOCKCAST_SALES", global = true)]
    pub sales: Option<PathBuf>,

    /// Product catalog path (overrides --data-dir)
    #[arg(long, env = "STOCKCAST_CATALOG", global = true)]
    pub catalog: Option<PathBuf>,

    /// Inventory table path (overrides --data-dir)
    #[arg(long, env = "STOCKCAST_INVENTORY", global = true)]
    pub inventory: Option<PathBuf>,
}

impl DataArgs {
    pub fn paths(&self) -> DataPaths {
        let mut paths = DataPaths::in_dir(&self.data_dir);
        if let Some(sales) = &self.sales {
            paths = paths.with_sales(sales);
        }
        if let Some(catalog) = &self.catalog {
            paths = paths.with_catalog(catalog);
        }
        if let Some(inventory) = &self.inventory {
            paths = paths.with_inventory(inventory);
        }
        paths
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List products that have sales history and a catalog name
    Products {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Forecast one product and check its stock against demand
    Check(CheckArgs),

    /// Forecast one product and write the full forecast to a CSV file
    Forecast(ForecastArgs),

    /// Forecast every product in the sales table
    Batch(BatchArgs),
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct SelectorArgs {
    /// Product id
    #[arg(long)]
    pub product_id: Option<ProductId>,

    /// Product name as listed in the catalog
    #[arg(long)]
    pub product_name: Option<String>,
}

impl SelectorArgs {
    pub fn selector(&self) -> Option<ProductSelector> {
        match (&self.product_id, &self.product_name) {
            (Some(id), _) => Some(ProductSelector::Id(id.clone())),
            (None, Some(name)) => Some(ProductSelector::Name(name.clone())),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub product: SelectorArgs,

    /// Forecast horizon in days
    #[arg(long, default_value_t = 7)]
    pub horizon: usize,

    /// Minimum number of days with sales
    #[arg(long, default_value_t = 2)]
    pub min_history: usize,

    /// Model a day-of-week pattern
    #[arg(long)]
    pub daily_seasonality: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl CheckArgs {
    pub fn policy(&self) -> PipelinePolicy {
        let seasonality = if self.daily_seasonality {
            SeasonalityMode::daily()
        } else {
            SeasonalityMode::none()
        };
        PipelinePolicy::interactive()
            .with_horizon_days(self.horizon)
            .with_min_history(self.min_history)
            .with_seasonality(seasonality)
    }
}

#[derive(Debug, Args)]
pub struct ForecastArgs {
    /// Product id
    #[arg(long)]
    pub product_id: ProductId,

    /// Forecast horizon in days
    #[arg(long, default_value_t = 7)]
    pub horizon: usize,

    /// Directory for the forecast file
    #[arg(long, default_value = "SinglePrediction")]
    pub output_dir: PathBuf,
}

impl ForecastArgs {
    pub fn policy(&self) -> PipelinePolicy {
        PipelinePolicy::interactive().with_horizon_days(self.horizon)
    }
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Forecast horizon in days
    #[arg(long, default_value_t = 60)]
    pub horizon: usize,

    /// Products with fewer days of sales are skipped
    #[arg(long, default_value_t = 30)]
    pub min_history: usize,

    /// Do not model a day-of-week pattern
    #[arg(long)]
    pub no_daily_seasonality: bool,

    /// Number of products forecast in parallel
    #[arg(long, default_value_t = 1)]
    pub jobs: usize,

    /// Directory for per-product forecast files
    #[arg(long, default_value = "Multiforecasts")]
    pub output_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl BatchArgs {
    pub fn policy(&self) -> PipelinePolicy {
        let seasonality = if self.no_daily_seasonality {
            SeasonalityMode::none()
        } else {
            SeasonalityMode::daily()
        };
        PipelinePolicy::batch()
            .with_horizon_days(self.horizon)
            .with_min_history(self.min_history)
            .with_seasonality(seasonality)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Json,
    Pretty,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Json => LogFormat::Json,
            LogFormatArg::Pretty => LogFormat::Pretty,
        }
    }
}
