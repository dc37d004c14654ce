//! Ports to storage and audit collaborators
//!
//! The lifecycle service talks to abstractions only; in-memory adapters
//! live in [`crate::adapters`] and production implementations plug in the
//! same way.

use async_trait::async_trait;

use core_kernel::ClaimId;
use infra_store::{StoreError, Versioned};

use crate::events::LifecycleEvent;
use crate::rejection::RejectionRecord;

/// Versioned persistence for rejection records
#[async_trait]
pub trait RejectionStore: Send + Sync {
    /// Inserts a new record at version 1; fails on duplicate claim ids
    async fn insert(&self, record: RejectionRecord) -> Result<u64, StoreError>;

    /// Fetches a record with its current version
    async fn get(&self, claim_id: ClaimId) -> Result<Versioned<RejectionRecord>, StoreError>;

    /// Replaces a record if and only if the stored version matches
    async fn compare_and_swap(
        &self,
        claim_id: ClaimId,
        expected_version: u64,
        record: RejectionRecord,
    ) -> Result<u64, StoreError>;

    /// Returns a point-in-time copy of all records
    async fn snapshot(&self) -> Vec<Versioned<RejectionRecord>>;
}

/// Append-only audit trail
///
/// The sink is infallible by contract: audit entries must never be lost
/// to transient errors, so implementations buffer rather than fail.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, event: LifecycleEvent);
}

/// Outbound notification queue with idempotent publication
#[async_trait]
pub trait NotificationOutbox: Send + Sync {
    /// Queues a message; returns false if the dedup key was already seen
    async fn publish(
        &self,
        topic: &str,
        payload: serde_json::Value,
        dedup_key: Option<String>,
    ) -> bool;
}
