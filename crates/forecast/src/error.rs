use thiserror::Error;

/// Errors raised by the shipped forecasting capability.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastError {
    #[error("insufficient data: {actual} point(s), at least {required} required")]
    InsufficientData { required: usize, actual: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("numerical error: {0}")]
    Numerical(String),
}
