//! In-memory adapters for the lifecycle ports

use async_trait::async_trait;

use core_kernel::ClaimId;
use infra_store::{AppendLog, OutboxQueue, StoreError, Versioned, VersionedStore};

use crate::events::LifecycleEvent;
use crate::ports::{AuditSink, NotificationOutbox, RejectionStore};
use crate::rejection::RejectionRecord;

/// In-memory rejection store backed by [`VersionedStore`]
#[derive(Debug, Clone)]
pub struct MemoryRejectionStore {
    inner: VersionedStore<RejectionRecord>,
}

impl MemoryRejectionStore {
    pub fn new() -> Self {
        Self {
            inner: VersionedStore::new("rejection_record"),
        }
    }
}

impl Default for MemoryRejectionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RejectionStore for MemoryRejectionStore {
    async fn insert(&self, record: RejectionRecord) -> Result<u64, StoreError> {
        self.inner.insert(record.claim_id.into(), record).await
    }

    async fn get(&self, claim_id: ClaimId) -> Result<Versioned<RejectionRecord>, StoreError> {
        self.inner.get(claim_id.into()).await
    }

    async fn compare_and_swap(
        &self,
        claim_id: ClaimId,
        expected_version: u64,
        record: RejectionRecord,
    ) -> Result<u64, StoreError> {
        self.inner
            .compare_and_swap(claim_id.into(), expected_version, record)
            .await
    }

    async fn snapshot(&self) -> Vec<Versioned<RejectionRecord>> {
        self.inner.snapshot().await
    }
}

/// In-memory audit sink backed by [`AppendLog`]
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditSink {
    log: AppendLog<LifecycleEvent>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded events in order
    pub async fn events(&self) -> Vec<LifecycleEvent> {
        self.log.snapshot().await
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, event: LifecycleEvent) {
        self.log.append(event).await;
    }
}

/// In-memory outbox backed by [`OutboxQueue`]
#[derive(Debug, Clone, Default)]
pub struct MemoryOutbox {
    queue: OutboxQueue,
}

impl MemoryOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Access to the underlying queue for draining in tests and workers
    pub fn queue(&self) -> &OutboxQueue {
        &self.queue
    }
}

#[async_trait]
impl NotificationOutbox for MemoryOutbox {
    async fn publish(
        &self,
        topic: &str,
        payload: serde_json::Value,
        dedup_key: Option<String>,
    ) -> bool {
        self.queue.enqueue(topic, payload, dedup_key).await
    }
}
