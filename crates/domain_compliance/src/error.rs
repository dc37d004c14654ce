//! Compliance orchestrator errors

use thiserror::Error;

use domain_lifecycle::LifecycleError;

/// Errors that can occur during a compliance sweep
#[derive(Debug, Error)]
pub enum ComplianceError {
    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("Temporal error: {0}")]
    Temporal(#[from] core_kernel::TemporalError),
}
