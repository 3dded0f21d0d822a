//! Single-product driver: one product end to end, including the inventory decision.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use stockcast_core::{ForecastPoint, PipelineError, PipelinePolicy, PipelineResult, ProductId};
use stockcast_forecast::Forecaster;
use stockcast_inventory::{InventoryDecision, compare};
use stockcast_products::{Catalog, CatalogListing};
use stockcast_sales::{SalesRecord, distinct_product_ids};

use crate::artifacts::ForecastSink;
use crate::pipeline::forecast_product;
use crate::tables::DataTables;

/// How the caller picked the product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductSelector {
    Id(ProductId),
    /// Catalog display name.
    Name(String),
}

impl ProductSelector {
    /// Resolve to a product id known to the catalog or the sales table.
    ///
    /// A name prefers products that have sales, matching the listing offered by
    /// [`selectable_products`]; only when none of them carries the name does the
    /// whole catalog apply.
    pub fn resolve(&self, catalog: &Catalog, sales: &[SalesRecord]) -> PipelineResult<ProductId> {
        match self {
            ProductSelector::Name(name) => {
                let wanted = name.trim();
                catalog
                    .listing(&distinct_product_ids(sales))
                    .into_iter()
                    .find(|listed| listed.product_name == wanted)
                    .map(|listed| listed.product_id)
                    .or_else(|| catalog.resolve_name(wanted).cloned())
                    .ok_or_else(|| PipelineError::UnknownProduct(wanted.to_string()))
            }
            ProductSelector::Id(id) => {
                if catalog.contains(id) || sales.iter().any(|r| &r.product_id == id) {
                    Ok(id.clone())
                } else {
                    Err(PipelineError::UnknownProduct(id.to_string()))
                }
            }
        }
    }
}

/// Products that can be picked interactively: present in sales and in the catalog.
pub fn selectable_products(tables: &DataTables) -> Vec<CatalogListing> {
    tables.catalog.listing(&distinct_product_ids(&tables.sales))
}

/// Everything the interactive view shows for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductReport {
    pub product_id: ProductId,
    pub product_name: Option<String>,
    pub horizon_days: usize,
    pub history_points: usize,
    pub decision: InventoryDecision,
    /// History estimates followed by the future window.
    pub forecast: Vec<ForecastPoint>,
}

impl ProductReport {
    pub fn future(&self) -> &[ForecastPoint] {
        &self.forecast[self.history_points..]
    }

    /// Standalone report artifact: the full sequence, history and future.
    pub fn persist<S: ForecastSink>(&self, sink: &S) -> PipelineResult<PathBuf> {
        sink.persist(&self.product_id, &self.forecast)
    }
}

pub struct SingleProductRunner<F> {
    forecaster: F,
    policy: PipelinePolicy,
}

impl<F: Forecaster> SingleProductRunner<F> {
    pub fn new(forecaster: F, policy: PipelinePolicy) -> Self {
        Self { forecaster, policy }
    }

    pub fn policy(&self) -> &PipelinePolicy {
        &self.policy
    }

    /// Forecast the selected product and compare demand against its stock.
    ///
    /// Every error goes back to the caller unchanged.
    pub fn run(
        &self,
        tables: &DataTables,
        selector: &ProductSelector,
    ) -> PipelineResult<ProductReport> {
        self.policy.validate()?;
        let product_id = selector.resolve(&tables.catalog, &tables.sales)?;
        debug!(
            product = %product_id,
            horizon_days = self.policy.horizon_days,
            "single-product forecast"
        );

        let result = forecast_product(&self.forecaster, &tables.sales, &product_id, &self.policy)?;
        let decision = compare(&tables.inventory, &product_id, result.forecasted_demand);
        info!(
            product = %product_id,
            demand = decision.forecasted_demand,
            stock = decision.current_stock,
            status = %decision.status,
            "inventory decision"
        );

        Ok(ProductReport {
            product_name: tables.catalog.name_of(&product_id).map(str::to_string),
            product_id,
            horizon_days: result.horizon_days,
            history_points: result.history_points,
            decision,
            forecast: result.forecast,
        })
    }
}
