//! Trigger log
//!
//! Records which (claim, trigger type) pairs have already fired, making
//! the sweep idempotent even across restarts when backed by durable
//! storage.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use core_kernel::ClaimId;

use crate::trigger::TriggerType;

/// Durable memory of emitted triggers
#[async_trait]
pub trait TriggerLog: Send + Sync {
    /// Records the pair; returns false if it was already present
    async fn record(&self, claim_id: ClaimId, trigger: TriggerType) -> bool;
}

/// In-memory trigger log
#[derive(Debug, Clone, Default)]
pub struct InMemoryTriggerLog {
    seen: Arc<Mutex<HashSet<(ClaimId, TriggerType)>>>,
}

impl InMemoryTriggerLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TriggerLog for InMemoryTriggerLog {
    async fn record(&self, claim_id: ClaimId, trigger: TriggerType) -> bool {
        self.seen.lock().await.insert((claim_id, trigger))
    }
}
