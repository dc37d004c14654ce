//! Storage layer errors

use thiserror::Error;

/// Errors surfaced by the storage primitives
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Optimistic concurrency check failed; safe to retry the whole operation
    #[error("Version conflict on {entity} {id}: expected v{expected}, found v{actual}")]
    Conflict {
        entity: &'static str,
        id: String,
        expected: u64,
        actual: u64,
    },

    #[error("Not found: {entity} {id}")]
    NotFound {
        entity: &'static str,
        id: String,
    },

    #[error("Duplicate: {entity} {id} already exists")]
    Duplicate {
        entity: &'static str,
        id: String,
    },
}

impl StoreError {
    /// Returns true when the failed operation may be retried as a whole
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}
