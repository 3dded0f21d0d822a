//! Batch forecasting across every product found in the sales table.
//!
//! Each product starts pending and ends in exactly one terminal state:
//! - `SkippedInsufficientHistory`: below the history threshold, nothing written.
//! - `Failed`: forecasting or persistence failed; logged, the run continues.
//! - `Succeeded`: the future window was persisted through the sink.
//!
//! Only a `ContractViolation` (a bug, not bad data) aborts the run.

use std::path::PathBuf;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, info_span, warn};

use stockcast_core::{PipelineError, PipelinePolicy, PipelineResult, ProductId, RunId};
use stockcast_forecast::Forecaster;
use stockcast_sales::{SalesRecord, distinct_product_ids};

use crate::artifacts::ForecastSink;
use crate::pipeline::forecast_product;

/// Batch run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub policy: PipelinePolicy,
    /// Worker threads; `1` runs products sequentially on the caller's thread.
    pub max_concurrent: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            policy: PipelinePolicy::batch(),
            max_concurrent: 1,
        }
    }
}

impl BatchConfig {
    pub fn with_policy(mut self, policy: PipelinePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max;
        self
    }

    /// Reject settings no run can use.
    pub fn validate(&self) -> PipelineResult<()> {
        self.policy.validate()?;
        if self.max_concurrent == 0 {
            return Err(PipelineError::configuration("max_concurrent must be at least 1"));
        }
        Ok(())
    }
}

/// Terminal state of one product in a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductState {
    SkippedInsufficientHistory { points: usize },
    Failed { error: String },
    Succeeded { forecasted_demand: i64, artifact: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOutcome {
    pub product_id: ProductId,
    #[serde(flatten)]
    pub state: ProductState,
}

/// Summary of a finished batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub run_id: RunId,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// One entry per product, in sales-table order.
    pub outcomes: Vec<ProductOutcome>,
}

impl BatchReport {
    fn from_outcomes(run_id: RunId, outcomes: Vec<ProductOutcome>) -> Self {
        let mut report = Self {
            run_id,
            succeeded: 0,
            skipped: 0,
            failed: 0,
            outcomes,
        };
        for outcome in &report.outcomes {
            match outcome.state {
                ProductState::Succeeded { .. } => report.succeeded += 1,
                ProductState::SkippedInsufficientHistory { .. } => report.skipped += 1,
                ProductState::Failed { .. } => report.failed += 1,
            }
        }
        report
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn outcome(&self, product_id: &ProductId) -> Option<&ProductState> {
        self.outcomes
            .iter()
            .find(|o| &o.product_id == product_id)
            .map(|o| &o.state)
    }
}

/// Drives the forecasting core over every product in a sales table.
pub struct BatchOrchestrator<F, S> {
    forecaster: F,
    sink: S,
    config: BatchConfig,
}

impl<F: Forecaster, S: ForecastSink> BatchOrchestrator<F, S> {
    pub fn new(forecaster: F, sink: S, config: BatchConfig) -> Self {
        Self {
            forecaster,
            sink,
            config,
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Forecast every distinct product in `sales` and persist the successes.
    pub fn run(&self, sales: &[SalesRecord]) -> PipelineResult<BatchReport> {
        self.config.validate()?;

        let run_id = RunId::new();
        let span = info_span!("batch", run = %run_id);
        let _enter = span.enter();

        let products = distinct_product_ids(sales);
        let total = products.len();
        info!(
            products = total,
            horizon_days = self.config.policy.horizon_days,
            min_history = self.config.policy.min_history,
            workers = self.config.max_concurrent,
            "batch forecast started"
        );

        let outcomes = if self.config.max_concurrent == 1 {
            products
                .iter()
                .enumerate()
                .map(|(i, product_id)| self.visit(run_id, sales, product_id, i, total))
                .collect::<PipelineResult<Vec<_>>>()?
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.max_concurrent)
                .thread_name(|i| format!("stockcast-batch-{i}"))
                .build()
                .map_err(|e| {
                    PipelineError::configuration(format!("cannot start worker pool: {e}"))
                })?;
            pool.install(|| {
                products
                    .par_iter()
                    .enumerate()
                    .map(|(i, product_id)| self.visit(run_id, sales, product_id, i, total))
                    .collect::<PipelineResult<Vec<_>>>()
            })?
        };

        let report = BatchReport::from_outcomes(run_id, outcomes);
        info!(
            succeeded = report.succeeded,
            skipped = report.skipped,
            failed = report.failed,
            "batch forecast finished"
        );
        Ok(report)
    }

    /// Per-product failure boundary.
    fn visit(
        &self,
        run_id: RunId,
        sales: &[SalesRecord],
        product_id: &ProductId,
        index: usize,
        total: usize,
    ) -> PipelineResult<ProductOutcome> {
        let progress = format!("{}/{total}", index + 1);
        debug!(
            run = %run_id,
            product = %product_id,
            progress = %progress,
            "forecasting product"
        );

        let state = match self.forecast_and_persist(sales, product_id) {
            Ok(state) => state,
            Err(PipelineError::InsufficientHistory { required, actual, .. }) => {
                warn!(
                    run = %run_id,
                    product = %product_id,
                    points = actual,
                    required,
                    "skipped: insufficient history"
                );
                ProductState::SkippedInsufficientHistory { points: actual }
            }
            Err(e) if e.is_product_scoped() => {
                warn!(
                    run = %run_id,
                    product = %product_id,
                    error = %e,
                    "forecast failed; continuing with next product"
                );
                ProductState::Failed {
                    error: e.to_string(),
                }
            }
            Err(e) => {
                error!(run = %run_id, product = %product_id, error = %e, "aborting batch");
                return Err(e);
            }
        };

        Ok(ProductOutcome {
            product_id: product_id.clone(),
            state,
        })
    }

    fn forecast_and_persist(
        &self,
        sales: &[SalesRecord],
        product_id: &ProductId,
    ) -> PipelineResult<ProductState> {
        let result = forecast_product(&self.forecaster, sales, product_id, &self.config.policy)?;
        let artifact = self.sink.persist(product_id, result.future())?;
        Ok(ProductState::Succeeded {
            forecasted_demand: result.forecasted_demand,
            artifact,
        })
    }
}
