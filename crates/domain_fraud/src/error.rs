//! Fraud engine errors

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during fraud detection
#[derive(Debug, Error)]
pub enum FraudError {
    /// Scan exceeded its runtime budget; partial results are discarded
    /// and the scan is reported incomplete, never complete
    #[error("Scan exceeded its {budget:?} budget and was aborted")]
    ScanTimeout { budget: Duration },

    #[error("Validation error: {0}")]
    Validation(String),

    /// The scan task panicked or was cancelled by the runtime
    #[error("Scan task failed: {0}")]
    TaskFailed(String),
}
