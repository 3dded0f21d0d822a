//! Command execution.
//!
//! Tables are loaded once per invocation, and only the ones a command reads.
//! Output directories are created only after the run's inputs have been checked.
//! Every command writes its result to `out`.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::info;

use stockcast_forecast::SeasonalTrendForecaster;
use stockcast_infra::tables::load_sales;
use stockcast_infra::{
    BatchConfig, BatchOrchestrator, CsvForecastWriter, DataPaths, DataTables, ProductSelector,
    SingleProductRunner, selectable_products,
};

use crate::args::{BatchArgs, CheckArgs, Cli, Command, ForecastArgs, OutputFormat};
use crate::render;

/// Run the parsed command line, writing command output to `out`.
pub fn execute(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let paths = cli.data.paths();

    match &cli.command {
        Command::Products { format } => products(&load_tables(&paths)?, *format, out),
        Command::Check(args) => check(&load_tables(&paths)?, args, out),
        Command::Forecast(args) => forecast(&load_tables(&paths)?, args, out),
        Command::Batch(args) => batch(&paths, args, out),
    }
}

fn load_tables(paths: &DataPaths) -> Result<DataTables> {
    DataTables::load(paths).context("cannot load input tables")
}

fn products(tables: &DataTables, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    let listing = selectable_products(tables);
    match format {
        OutputFormat::Text => render::listing(out, &listing)?,
        OutputFormat::Json => write_json(out, &listing)?,
    }
    Ok(())
}

fn check(tables: &DataTables, args: &CheckArgs, out: &mut impl Write) -> Result<()> {
    let selector = args
        .product
        .selector()
        .context("a product id or name is required")?;
    let runner = SingleProductRunner::new(SeasonalTrendForecaster::new(), args.policy());
    let report = runner.run(tables, &selector)?;

    match args.format {
        OutputFormat::Text => render::product_report(out, &report)?,
        OutputFormat::Json => write_json(out, &report)?,
    }
    Ok(())
}

fn forecast(tables: &DataTables, args: &ForecastArgs, out: &mut impl Write) -> Result<()> {
    let runner = SingleProductRunner::new(SeasonalTrendForecaster::new(), args.policy());
    let selector = ProductSelector::Id(args.product_id.clone());
    let report = runner.run(tables, &selector)?;

    let writer = CsvForecastWriter::create(&args.output_dir)?;
    let artifact = report.persist(&writer)?;

    info!(product = %report.product_id, path = %artifact.display(), "forecast report written");
    render::product_report(out, &report)?;
    writeln!(out)?;
    render::artifact(out, &artifact)?;
    Ok(())
}

fn batch(paths: &DataPaths, args: &BatchArgs, out: &mut impl Write) -> Result<()> {
    let config = BatchConfig::default()
        .with_policy(args.policy())
        .with_max_concurrent(args.jobs);
    config.validate()?;

    let sales = load_sales(&paths.sales).context("cannot load sales table")?;
    let writer = CsvForecastWriter::create(&args.output_dir)?;
    let orchestrator = BatchOrchestrator::new(SeasonalTrendForecaster::new(), writer, config);
    let report = orchestrator.run(&sales)?;

    match args.format {
        OutputFormat::Text => render::batch_report(out, &report)?,
        OutputFormat::Json => write_json(out, &report)?,
    }
    Ok(())
}

fn write_json<T: serde::Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
