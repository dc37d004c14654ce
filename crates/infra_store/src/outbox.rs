//! Outbox queue for deferred external publication
//!
//! Core transition processing never calls a collaborator directly; it
//! enqueues a message here and a delivery process drains the queue out of
//! band. Messages carry an optional dedup key so idempotent producers
//! (compliance sweep, fraud re-scan) can re-run without re-emitting.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// A message queued for an external delivery collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxMessage {
    /// Logical destination (e.g. "compliance.triggers", "fraud.alerts")
    pub topic: String,
    /// Structured payload; rendering/delivery happen downstream
    pub payload: serde_json::Value,
    /// Producer-supplied idempotency key
    pub dedup_key: Option<String>,
    pub enqueued_at: DateTime<Utc>,
}

/// In-memory outbox with dedup-key suppression
#[derive(Debug, Clone, Default)]
pub struct OutboxQueue {
    inner: Arc<Mutex<OutboxInner>>,
}

#[derive(Debug, Default)]
struct OutboxInner {
    pending: Vec<OutboxMessage>,
    seen_keys: HashSet<String>,
}

impl OutboxQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues a message; returns false if its dedup key was already seen
    pub async fn enqueue(
        &self,
        topic: impl Into<String>,
        payload: serde_json::Value,
        dedup_key: Option<String>,
    ) -> bool {
        let mut inner = self.inner.lock().await;
        if let Some(key) = &dedup_key {
            if !inner.seen_keys.insert(key.clone()) {
                return false;
            }
        }
        inner.pending.push(OutboxMessage {
            topic: topic.into(),
            payload,
            dedup_key,
            enqueued_at: Utc::now(),
        });
        true
    }

    /// Removes and returns all pending messages
    pub async fn drain(&self) -> Vec<OutboxMessage> {
        std::mem::take(&mut self.inner.lock().await.pending)
    }

    /// Returns a copy of pending messages without consuming them
    pub async fn pending(&self) -> Vec<OutboxMessage> {
        self.inner.lock().await.pending.clone()
    }

    /// Number of messages awaiting delivery
    pub async fn len(&self) -> usize {
        self.inner.lock().await.pending.len()
    }

    /// Returns true if no messages await delivery
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.pending.is_empty()
    }
}
