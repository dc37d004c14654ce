//! Forecaster errors

use thiserror::Error;

use core_kernel::TemporalError;

/// Errors that can occur during forecasting
#[derive(Debug, Error)]
pub enum ForecastError {
    /// History too short for a defensible forecast; an explicit
    /// non-result, never a fabricated low-confidence number
    #[error("Insufficient data: {required} observations required, {actual} available")]
    InsufficientData { required: usize, actual: usize },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Temporal error: {0}")]
    Temporal(#[from] TemporalError),
}
