//! Lifecycle audit events
//!
//! Every state-changing operation emits exactly one event carrying the
//! prior state, new state, actor and timestamp. The sink is append-only;
//! corrections are new events, never edits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AuditEventId, ClaimId};

use crate::appeal::SubmissionChannel;
use crate::rejection::{RejectionStatus, ResolutionOutcome};

/// What happened in a lifecycle transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LifecycleEventKind {
    /// Record ingested from the claims exchange
    Ingested { channel: SubmissionChannel },
    /// Appeal filed; `out_of_window` marks late filings that did not
    /// change the record's state
    AppealFiled { out_of_window: bool },
    /// Payer resolution applied
    Resolved { outcome: ResolutionOutcome },
    /// Statutory window elapsed with no appeal
    Expired,
    /// Record soft-archived for retention
    Archived,
}

/// One immutable entry in the lifecycle audit trail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleEvent {
    pub id: AuditEventId,
    pub claim_id: ClaimId,
    /// Absent only for ingestion, which creates the record
    pub prior_state: Option<RejectionStatus>,
    pub new_state: RejectionStatus,
    /// System or user identity that caused the transition
    pub actor: String,
    pub occurred_at: DateTime<Utc>,
    pub kind: LifecycleEventKind,
    /// Free-form supporting detail (e.g. evidence references, amounts)
    pub evidence: Option<String>,
}

impl LifecycleEvent {
    pub fn new(
        claim_id: ClaimId,
        prior_state: Option<RejectionStatus>,
        new_state: RejectionStatus,
        actor: impl Into<String>,
        occurred_at: DateTime<Utc>,
        kind: LifecycleEventKind,
        evidence: Option<String>,
    ) -> Self {
        Self {
            id: AuditEventId::new_v7(),
            claim_id,
            prior_state,
            new_state,
            actor: actor.into(),
            occurred_at,
            kind,
            evidence,
        }
    }
}
