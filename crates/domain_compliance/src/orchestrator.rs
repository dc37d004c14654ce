//! Compliance sweep
//!
//! Walks every pending rejection against the deadline calculator and
//! emits the statutory notification triggers. Each (claim, trigger) pair
//! fires once ever; expiry goes through the lifecycle service so it is
//! audited and CAS-protected like any other transition. The sweep reads
//! a snapshot and therefore runs safely alongside live transitions: a
//! record that leaves `PendingReview` between read and write turns the
//! expire call into a no-op.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument, warn};

use core_kernel::ClaimId;
use domain_lifecycle::{
    AuditSink, DeadlinePosition, LifecycleService, NotificationOutbox, RejectionRecord,
    RejectionStatus, RejectionStore,
};

use crate::error::ComplianceError;
use crate::trigger::{ComplianceLetter, TriggerType};
use crate::trigger_log::TriggerLog;

/// Outcome of one sweep run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub as_of: DateTime<Utc>,
    /// Pending records examined
    pub examined: usize,
    pub initial_notifications: usize,
    pub warnings: usize,
    pub finals: usize,
    /// Records expired through the lifecycle service this run
    pub expired: usize,
    pub letters: Vec<ComplianceLetter>,
}

/// The scheduled deadline sweep
pub struct ComplianceSweep<'a, S, A, L, O> {
    service: &'a LifecycleService<S, A>,
    trigger_log: L,
    outbox: O,
}

impl<'a, S, A, L, O> ComplianceSweep<'a, S, A, L, O>
where
    S: RejectionStore,
    A: AuditSink,
    L: TriggerLog,
    O: NotificationOutbox,
{
    pub fn new(service: &'a LifecycleService<S, A>, trigger_log: L, outbox: O) -> Self {
        Self {
            service,
            trigger_log,
            outbox,
        }
    }

    /// Runs one sweep at the given instant
    ///
    /// Idempotent: re-running over the same data emits nothing new and
    /// leaves all records in the same final states.
    #[instrument(skip(self))]
    pub async fn run(&self, as_of: DateTime<Utc>) -> Result<SweepReport, ComplianceError> {
        let snapshot = self.service.store().snapshot().await;
        let mut report = SweepReport {
            as_of,
            examined: 0,
            initial_notifications: 0,
            warnings: 0,
            finals: 0,
            expired: 0,
            letters: Vec::new(),
        };

        for versioned in snapshot {
            let record = versioned.value;
            if record.status != RejectionStatus::PendingReview || record.archived {
                continue;
            }
            report.examined += 1;

            let calc = self.service.deadline_calculator();
            let position = calc.position(record.received_date, as_of)?;

            if let Some(letter) = self
                .emit(&record, TriggerType::InitialNotification, as_of)
                .await?
            {
                report.initial_notifications += 1;
                report.letters.push(letter);
            }
            if position >= DeadlinePosition::AtRisk {
                if let Some(letter) = self.emit(&record, TriggerType::Warning, as_of).await? {
                    report.warnings += 1;
                    report.letters.push(letter);
                }
            }
            if position == DeadlinePosition::Expired {
                if let Some(letter) = self.emit(&record, TriggerType::Final, as_of).await? {
                    report.finals += 1;
                    report.letters.push(letter);
                }
                if self.expire(record.claim_id, as_of).await? {
                    report.expired += 1;
                }
            }
        }

        info!(
            examined = report.examined,
            initial = report.initial_notifications,
            warnings = report.warnings,
            finals = report.finals,
            expired = report.expired,
            "compliance sweep complete"
        );
        Ok(report)
    }

    /// Emits one trigger if it has not fired before; returns the letter
    /// when newly emitted
    async fn emit(
        &self,
        record: &RejectionRecord,
        trigger: TriggerType,
        as_of: DateTime<Utc>,
    ) -> Result<Option<ComplianceLetter>, ComplianceError> {
        if !self.trigger_log.record(record.claim_id, trigger).await {
            return Ok(None);
        }
        let days_remaining = self
            .service
            .deadline_calculator()
            .days_remaining(record.received_date, as_of)?;
        let letter = ComplianceLetter::new(
            record.claim_id,
            trigger,
            record.response_deadline,
            days_remaining,
            as_of,
        );
        self.outbox
            .publish(
                "compliance.triggers",
                json!({
                    "letter_id": letter.id,
                    "claim_id": letter.claim_id,
                    "trigger": letter.trigger,
                    "response_deadline": letter.response_deadline,
                    "days_remaining": letter.days_remaining,
                    "generated_at": letter.generated_at,
                }),
                Some(letter.dedup_key()),
            )
            .await;
        Ok(Some(letter))
    }

    async fn expire(
        &self,
        claim_id: ClaimId,
        as_of: DateTime<Utc>,
    ) -> Result<bool, ComplianceError> {
        match self.service.expire(claim_id, as_of, "compliance-sweep").await {
            Ok(expired) => Ok(expired),
            // The record vanished or changed under us; the next sweep
            // sees the new state
            Err(e) if !e.is_retryable() => {
                warn!(%claim_id, error = %e, "expire skipped during sweep");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}
