//! Lifecycle domain errors

use chrono::{DateTime, Utc};
use thiserror::Error;

use core_kernel::{ClaimId, MoneyError, TemporalError};
use infra_store::StoreError;

use crate::rejection::RejectionStatus;

/// Errors that can occur in the rejection lifecycle domain
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Malformed input rejected at the boundary, before any state change
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transition not legal from the current state; reported, not retried
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        from: RejectionStatus,
        to: RejectionStatus,
    },

    /// Appeal attempted after the statutory deadline; the appeal is
    /// recorded flagged out-of-window, never silently accepted or dropped
    #[error("Deadline exceeded: response deadline was {deadline}")]
    DeadlineExceeded { deadline: DateTime<Utc> },

    /// Optimistic concurrency check failed after exhausting retries
    #[error("Concurrency conflict on claim {claim_id}: retry against the new state")]
    ConcurrencyConflict { claim_id: ClaimId },

    #[error("Rejection record not found: {0}")]
    NotFound(ClaimId),

    #[error("Rejection record already ingested for claim {0}")]
    DuplicateClaim(ClaimId),

    #[error("An active appeal already exists for claim {0}")]
    AppealAlreadyActive(ClaimId),

    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    #[error("Temporal error: {0}")]
    Temporal(#[from] TemporalError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl LifecycleError {
    /// Translates a storage error for the given claim
    pub fn from_store(err: StoreError, claim_id: ClaimId) -> Self {
        match err {
            StoreError::Conflict { .. } => LifecycleError::ConcurrencyConflict { claim_id },
            StoreError::NotFound { .. } => LifecycleError::NotFound(claim_id),
            StoreError::Duplicate { .. } => LifecycleError::DuplicateClaim(claim_id),
        }
    }

    /// Returns true when the whole operation is safe to retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, LifecycleError::ConcurrencyConflict { .. })
    }
}
