//! Rejection record aggregate
//!
//! The canonical state of one rejected claim line. State mutation methods
//! are crate-private: callers go through [`crate::service::LifecycleService`],
//! which wraps every mutating operation with audit emission and optimistic
//! concurrency, so no call site can change state unaudited.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{AmountBreakdown, ClaimId, Money, PayerId, PhysicianId, ProviderId};

use crate::appeal::{AppealRequest, SubmissionChannel};
use crate::error::LifecycleError;
use crate::reason::ReasonCode;

/// Lifecycle states of a rejection record
///
/// Transitions are forward-only; no state is ever revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionStatus {
    /// Rejection ingested, awaiting an appeal decision
    PendingReview,
    /// Appeal filed before the deadline
    UnderAppeal,
    /// Payer paid on appeal (fully, or partially above the policy threshold)
    Recovered,
    /// Denial upheld, or partial payment below the policy threshold
    FinalRejection,
    /// Statutory window elapsed with no appeal filed
    Expired,
}

impl RejectionStatus {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RejectionStatus::Recovered
                | RejectionStatus::FinalRejection
                | RejectionStatus::Expired
        )
    }

    fn can_transition_to(&self, target: RejectionStatus) -> bool {
        use RejectionStatus::*;
        matches!(
            (self, target),
            (PendingReview, UnderAppeal)
                | (PendingReview, Expired)
                | (UnderAppeal, Recovered)
                | (UnderAppeal, FinalRejection)
        )
    }
}

impl fmt::Display for RejectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RejectionStatus::PendingReview => "pending_review",
            RejectionStatus::UnderAppeal => "under_appeal",
            RejectionStatus::Recovered => "recovered",
            RejectionStatus::FinalRejection => "final_rejection",
            RejectionStatus::Expired => "expired",
        };
        write!(f, "{}", name)
    }
}

/// Payer resolution outcome for an appealed rejection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionOutcome {
    Recovered,
    Denied,
}

/// Whether an appeal landed inside the statutory window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppealDisposition {
    InWindow,
    OutOfWindow,
}

/// Policy for classifying partial recoveries
///
/// A recovered amount at or above `partial_recovery_threshold` of the
/// original total classifies as `Recovered`; below it the denial is treated
/// as upheld, with the partial amount still recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryPolicy {
    pub partial_recovery_threshold: Decimal,
}

impl Default for RecoveryPolicy {
    fn default() -> Self {
        Self {
            partial_recovery_threshold: Decimal::new(5, 1), // 0.5
        }
    }
}

/// One rejected claim line and its appeal state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionRecord {
    pub claim_id: ClaimId,
    pub payer_id: PayerId,
    pub provider_id: ProviderId,
    pub physician_id: PhysicianId,
    /// Rejected amount with statutory breakdown
    pub amount: AmountBreakdown,
    pub submission_date: NaiveDate,
    pub received_date: NaiveDate,
    pub channel: SubmissionChannel,
    /// Response deadline computed once at ingestion
    pub response_deadline: DateTime<Utc>,
    pub status: RejectionStatus,
    pub reason_codes: Vec<ReasonCode>,
    pub appeal: Option<AppealRequest>,
    pub recovered_amount: Option<Money>,
    pub resolution_date: Option<DateTime<Utc>>,
    /// Soft-archive marker; records are never physically deleted
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RejectionRecord {
    /// Creates a new record in `PendingReview`
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        claim_id: ClaimId,
        payer_id: PayerId,
        provider_id: ProviderId,
        physician_id: PhysicianId,
        amount: AmountBreakdown,
        submission_date: NaiveDate,
        received_date: NaiveDate,
        channel: SubmissionChannel,
        response_deadline: DateTime<Utc>,
        reason_codes: Vec<ReasonCode>,
    ) -> Self {
        let now = Utc::now();
        Self {
            claim_id,
            payer_id,
            provider_id,
            physician_id,
            amount,
            submission_date,
            received_date,
            channel,
            response_deadline,
            status: RejectionStatus::PendingReview,
            reason_codes,
            appeal: None,
            recovered_amount: None,
            resolution_date: None,
            archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if an appeal was filed inside the statutory window
    pub fn appealed_within_window(&self) -> bool {
        self.appeal
            .as_ref()
            .map(|a| !a.out_of_window)
            .unwrap_or(false)
    }

    fn guard(&self, target: RejectionStatus) -> Result<(), LifecycleError> {
        if !self.status.can_transition_to(target) {
            return Err(LifecycleError::InvalidTransition {
                from: self.status,
                to: target,
            });
        }
        Ok(())
    }

    /// Files an appeal against this rejection
    ///
    /// Before the deadline the record moves to `UnderAppeal`. After the
    /// deadline the appeal is still attached, flagged out-of-window, and
    /// the state is left unchanged; the caller surfaces `DeadlineExceeded`
    /// so the exception path is visible, never silent.
    pub(crate) fn file_appeal(
        &mut self,
        channel: SubmissionChannel,
        submitted_at: DateTime<Utc>,
        evidence_refs: Vec<String>,
    ) -> Result<AppealDisposition, LifecycleError> {
        self.guard(RejectionStatus::UnderAppeal)?;
        if self.appeal.as_ref().is_some_and(|a| a.active) {
            return Err(LifecycleError::AppealAlreadyActive(self.claim_id));
        }

        let mut appeal = AppealRequest::new(self.claim_id, channel, submitted_at, evidence_refs);
        let disposition = if submitted_at > self.response_deadline {
            appeal.out_of_window = true;
            AppealDisposition::OutOfWindow
        } else {
            self.status = RejectionStatus::UnderAppeal;
            AppealDisposition::InWindow
        };
        self.appeal = Some(appeal);
        self.updated_at = submitted_at;
        Ok(disposition)
    }

    /// Applies a payer resolution to an appealed rejection
    ///
    /// Returns the resulting terminal status.
    pub(crate) fn resolve(
        &mut self,
        outcome: ResolutionOutcome,
        resolved_amount: Option<Money>,
        resolved_at: DateTime<Utc>,
        policy: &RecoveryPolicy,
    ) -> Result<RejectionStatus, LifecycleError> {
        // Either terminal target proves the record is currently appealable
        self.guard(RejectionStatus::Recovered)?;

        if resolved_at.date_naive() < self.received_date {
            return Err(LifecycleError::Validation(format!(
                "resolution date {} precedes rejection received date {}",
                resolved_at.date_naive(),
                self.received_date
            )));
        }

        let target = match outcome {
            ResolutionOutcome::Denied => {
                self.recovered_amount = resolved_amount;
                RejectionStatus::FinalRejection
            }
            ResolutionOutcome::Recovered => {
                let amount = resolved_amount.ok_or_else(|| {
                    LifecycleError::Validation(
                        "recovered outcome requires a resolved amount".to_string(),
                    )
                })?;
                let total = self.amount.total();
                if amount.checked_sub(&total)?.is_positive() {
                    return Err(LifecycleError::Validation(format!(
                        "recovered amount {} exceeds original total {}",
                        amount, total
                    )));
                }
                self.recovered_amount = Some(amount);
                let ratio = amount.ratio_of(&total)?;
                if ratio >= policy.partial_recovery_threshold {
                    RejectionStatus::Recovered
                } else {
                    RejectionStatus::FinalRejection
                }
            }
        };

        if let Some(appeal) = self.appeal.as_mut() {
            appeal.close();
        }
        self.status = target;
        self.resolution_date = Some(resolved_at);
        self.updated_at = resolved_at;
        Ok(target)
    }

    /// Expires a record whose window elapsed with no appeal
    ///
    /// Returns false without error when the record is no longer pending,
    /// so the deadline sweep is idempotent at the record level too.
    pub(crate) fn expire(&mut self, as_of: DateTime<Utc>) -> bool {
        if self.status != RejectionStatus::PendingReview {
            return false;
        }
        self.status = RejectionStatus::Expired;
        self.updated_at = as_of;
        true
    }

    /// Soft-archives the record for audit retention
    pub(crate) fn archive(&mut self) {
        self.archived = true;
        self.updated_at = Utc::now();
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_status() -> impl Strategy<Value = RejectionStatus> {
        prop_oneof![
            Just(RejectionStatus::PendingReview),
            Just(RejectionStatus::UnderAppeal),
            Just(RejectionStatus::Recovered),
            Just(RejectionStatus::FinalRejection),
            Just(RejectionStatus::Expired),
        ]
    }

    proptest! {
        #[test]
        fn no_transition_leaves_a_terminal_state(
            from in any_status(),
            to in any_status()
        ) {
            if from.is_terminal() {
                prop_assert!(!from.can_transition_to(to));
            }
        }

        #[test]
        fn no_transition_is_a_self_loop(status in any_status()) {
            prop_assert!(!status.can_transition_to(status));
        }
    }
}
