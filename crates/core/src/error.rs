//! Pipeline error model.

use thiserror::Error;

use crate::id::ProductId;

/// Result type used across the pipeline.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Boxed error produced by a pluggable forecasting capability.
pub type CapabilityError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Pipeline-level error.
///
/// The variants map onto how far a failure may propagate:
/// - `Configuration` aborts before any pipeline logic runs.
/// - `InsufficientHistory`, `ForecastingFailure` and `Persistence` are scoped to one
///   product; the batch driver records them and moves on.
/// - `ContractViolation` signals a broken internal invariant and is always fatal.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// An input table is missing, lacks a required column or holds malformed values.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A product's prepared series is shorter than the caller's minimum.
    #[error(
        "insufficient history for product {product_id}: {actual} daily point(s), at least {required} required"
    )]
    InsufficientHistory {
        product_id: ProductId,
        required: usize,
        actual: usize,
    },

    /// The forecasting capability could not fit or predict.
    #[error("forecasting failed: {0}")]
    ForecastingFailure(#[source] CapabilityError),

    /// An internal invariant was broken (indicates a bug, never bad input).
    #[error("contract violated: {0}")]
    ContractViolation(String),

    /// A forecast artifact could not be written.
    #[error("failed to persist forecast for product {product_id}: {reason}")]
    Persistence { product_id: ProductId, reason: String },

    /// No product matches the interactive selection.
    #[error("unknown product: {0}")]
    UnknownProduct(String),
}

impl PipelineError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn contract(msg: impl Into<String>) -> Self {
        Self::ContractViolation(msg.into())
    }

    pub fn forecasting(err: impl Into<CapabilityError>) -> Self {
        Self::ForecastingFailure(err.into())
    }

    pub fn persistence(product_id: &ProductId, reason: impl Into<String>) -> Self {
        Self::Persistence {
            product_id: product_id.clone(),
            reason: reason.into(),
        }
    }

    /// Whether a batch run may record this error against one product and continue.
    pub fn is_product_scoped(&self) -> bool {
        matches!(
            self,
            Self::InsufficientHistory { .. }
                | Self::ForecastingFailure(_)
                | Self::Persistence { .. }
        )
    }
}
