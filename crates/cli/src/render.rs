//! Text rendering of command results.

use std::io::{self, Write};
use std::path::Path;

use stockcast_core::ForecastPoint;
use stockcast_infra::{BatchReport, ProductReport, ProductState};
use stockcast_products::CatalogListing;

pub fn listing(out: &mut impl Write, products: &[CatalogListing]) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products with both sales history and a catalog entry.");
    }
    let width = products
        .iter()
        .map(|p| p.product_id.as_str().len())
        .max()
        .unwrap_or(0);
    for p in products {
        writeln!(out, "{:<width$}  {}", p.product_id.as_str(), p.product_name)?;
    }
    Ok(())
}

pub fn product_report(out: &mut impl Write, report: &ProductReport) -> io::Result<()> {
    match &report.product_name {
        Some(name) => writeln!(out, "Product: {name} ({})", report.product_id)?,
        None => writeln!(out, "Product: {}", report.product_id)?,
    }
    let decision = &report.decision;
    writeln!(out, "Current stock: {}", decision.current_stock)?;
    writeln!(
        out,
        "Forecasted demand (next {} days): {}",
        report.horizon_days, decision.forecasted_demand
    )?;
    writeln!(out, "Status: {}", decision.status)?;
    writeln!(out, "{}", decision.status_message())?;
    writeln!(out)?;
    forecast_rows(out, report.future())
}

pub fn forecast_rows(out: &mut impl Write, points: &[ForecastPoint]) -> io::Result<()> {
    writeln!(
        out,
        "{:<10}  {:>10}  {:>10}  {:>10}",
        "date", "estimate", "lower", "upper"
    )?;
    for p in points {
        writeln!(
            out,
            "{:<10}  {:>10.2}  {:>10.2}  {:>10.2}",
            p.timestamp.format("%Y-%m-%d"),
            p.estimate,
            p.lower_bound,
            p.upper_bound
        )?;
    }
    Ok(())
}

pub fn artifact(out: &mut impl Write, path: &Path) -> io::Result<()> {
    writeln!(out, "Forecast written to {}", path.display())
}

pub fn batch_report(out: &mut impl Write, report: &BatchReport) -> io::Result<()> {
    writeln!(
        out,
        "Batch {}: {} succeeded, {} skipped, {} failed ({} products)",
        report.run_id,
        report.succeeded,
        report.skipped,
        report.failed,
        report.total()
    )?;
    for outcome in &report.outcomes {
        match &outcome.state {
            ProductState::Succeeded {
                forecasted_demand,
                artifact,
            } => writeln!(
                out,
                "  {}  SUCCEEDED  demand={forecasted_demand}  artifact={}",
                outcome.product_id,
                artifact.display()
            )?,
            ProductState::SkippedInsufficientHistory { points } => writeln!(
                out,
                "  {}  SKIPPED_INSUFFICIENT_HISTORY  points={points}",
                outcome.product_id
            )?,
            ProductState::Failed { error } => {
                writeln!(out, "  {}  FAILED  {error}", outcome.product_id)?
            }
        }
    }
    Ok(())
}
