//! Lifecycle service
//!
//! The single write path for rejection records. Every mutation here
//! follows the same shape: read the versioned record, apply the domain
//! transition on a copy, compare-and-swap it back, and emit exactly one
//! audit event on success. A CAS conflict means another writer won the
//! race; the whole operation is re-read and re-applied against the new
//! state, up to the retry budget.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use core_kernel::{ClaimId, Money, PayerId, PhysicianId, ProviderId};
use core_kernel::AmountBreakdown;
use infra_store::StoreError;

use crate::config::JurisdictionConfig;
use crate::deadline::DeadlineCalculator;
use crate::error::LifecycleError;
use crate::events::{LifecycleEvent, LifecycleEventKind};
use crate::ingest::{AppealSubmission, RejectionEvent, ResolutionEvent};
use crate::ports::{AuditSink, RejectionStore};
use crate::reason::ReasonCode;
use crate::rejection::{
    AppealDisposition, RecoveryPolicy, RejectionRecord, RejectionStatus,
};

/// Bounded retry for CAS conflicts
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(10),
        }
    }
}

impl RetryPolicy {
    /// Exponential backoff delay before the given retry attempt
    fn delay(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Orchestrates all rejection-record mutations with audit and concurrency
/// control
pub struct LifecycleService<S, A> {
    store: S,
    audit: A,
    config: JurisdictionConfig,
    deadline: DeadlineCalculator,
    policy: RecoveryPolicy,
    retry: RetryPolicy,
}

impl<S: RejectionStore, A: AuditSink> LifecycleService<S, A> {
    pub fn new(
        store: S,
        audit: A,
        config: JurisdictionConfig,
    ) -> Result<Self, LifecycleError> {
        let deadline = config.deadline_calculator()?;
        let policy = config.recovery_policy()?;
        Ok(Self {
            store,
            audit,
            config,
            deadline,
            policy,
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audit(&self) -> &A {
        &self.audit
    }

    pub fn config(&self) -> &JurisdictionConfig {
        &self.config
    }

    pub fn deadline_calculator(&self) -> &DeadlineCalculator {
        &self.deadline
    }

    /// Ingests a rejection event from the exchange
    ///
    /// Validates the payload and the statutory amount breakdown, computes
    /// the response deadline once, and stores the record in
    /// `PendingReview`. Replayed claim ids fail with `DuplicateClaim` and
    /// change nothing.
    #[instrument(skip(self, event), fields(claim_id = %event.claim_id))]
    pub async fn ingest(
        &self,
        event: RejectionEvent,
        actor: &str,
    ) -> Result<RejectionRecord, LifecycleError> {
        event.validate_schema()?;

        let currency = self.config.currency;
        if event.currency != currency {
            return Err(LifecycleError::Validation(format!(
                "event currency {} does not match jurisdiction settlement currency {}",
                event.currency, currency
            )));
        }
        let amount = AmountBreakdown::from_parts(
            Money::new(event.net_amount, currency),
            Money::new(event.vat_amount, currency),
            Money::new(event.total_amount, currency),
            self.config.vat_rate()?,
        )?;
        let reason_codes: Vec<ReasonCode> = event
            .reason_codes
            .iter()
            .map(|code| ReasonCode::parse(code))
            .collect();
        let response_deadline = self.deadline.response_deadline(event.received_date)?;

        let claim_id = ClaimId::from(event.claim_id);
        let record = RejectionRecord::new(
            claim_id,
            PayerId::from(event.payer_id),
            ProviderId::from(event.provider_id),
            PhysicianId::from(event.physician_id),
            amount,
            event.submission_date,
            event.received_date,
            event.channel,
            response_deadline,
            reason_codes,
        );

        self.store
            .insert(record.clone())
            .await
            .map_err(|e| LifecycleError::from_store(e, claim_id))?;

        self.audit
            .record(LifecycleEvent::new(
                claim_id,
                None,
                RejectionStatus::PendingReview,
                actor,
                record.created_at,
                LifecycleEventKind::Ingested {
                    channel: record.channel,
                },
                Some(format!("amount {}", record.amount)),
            ))
            .await;

        info!(%claim_id, deadline = %response_deadline, "rejection ingested");
        Ok(record)
    }

    /// Files an appeal against a pending rejection
    ///
    /// In-window appeals move the record to `UnderAppeal`. Out-of-window
    /// appeals are attached to the record flagged as late, audited, and
    /// then surfaced as `DeadlineExceeded` so the caller sees the refusal.
    #[instrument(skip(self, submission), fields(claim_id = %submission.claim_id))]
    pub async fn file_appeal(
        &self,
        submission: AppealSubmission,
    ) -> Result<AppealDisposition, LifecycleError> {
        submission
            .validate()
            .map_err(|e| LifecycleError::Validation(e.to_string()))?;
        let claim_id = ClaimId::from(submission.claim_id);

        for attempt in 0..self.retry.max_attempts {
            let versioned = self
                .store
                .get(claim_id)
                .await
                .map_err(|e| LifecycleError::from_store(e, claim_id))?;
            let mut record = versioned.value;
            let prior = record.status;

            let disposition = record.file_appeal(
                submission.channel,
                submission.submitted_at,
                submission.evidence_refs.clone(),
            )?;
            let deadline = record.response_deadline;
            let new_state = record.status;

            match self
                .store
                .compare_and_swap(claim_id, versioned.version, record)
                .await
            {
                Ok(_) => {
                    let out_of_window = disposition == AppealDisposition::OutOfWindow;
                    self.audit
                        .record(LifecycleEvent::new(
                            claim_id,
                            Some(prior),
                            new_state,
                            &submission.actor,
                            submission.submitted_at,
                            LifecycleEventKind::AppealFiled { out_of_window },
                            Some(submission.evidence_refs.join(",")),
                        ))
                        .await;

                    if out_of_window {
                        warn!(%claim_id, %deadline, "appeal filed after deadline");
                        return Err(LifecycleError::DeadlineExceeded { deadline });
                    }
                    info!(%claim_id, "appeal filed");
                    return Ok(disposition);
                }
                Err(StoreError::Conflict { .. }) => {
                    debug!(%claim_id, attempt, "appeal lost CAS race, retrying");
                    if attempt + 1 < self.retry.max_attempts {
                        tokio::time::sleep(self.retry.delay(attempt)).await;
                    }
                }
                Err(e) => return Err(LifecycleError::from_store(e, claim_id)),
            }
        }
        Err(LifecycleError::ConcurrencyConflict { claim_id })
    }

    /// Applies a payer resolution to an appealed rejection
    #[instrument(skip(self, resolution), fields(claim_id = %resolution.claim_id))]
    pub async fn resolve(
        &self,
        resolution: ResolutionEvent,
    ) -> Result<RejectionStatus, LifecycleError> {
        resolution
            .validate()
            .map_err(|e| LifecycleError::Validation(e.to_string()))?;
        let claim_id = ClaimId::from(resolution.claim_id);
        let resolved_amount = resolution
            .resolved_amount
            .map(|amount| Money::new(amount, self.config.currency));

        for attempt in 0..self.retry.max_attempts {
            let versioned = self
                .store
                .get(claim_id)
                .await
                .map_err(|e| LifecycleError::from_store(e, claim_id))?;
            let mut record = versioned.value;
            let prior = record.status;

            let status = record.resolve(
                resolution.outcome,
                resolved_amount,
                resolution.resolved_at,
                &self.policy,
            )?;

            match self
                .store
                .compare_and_swap(claim_id, versioned.version, record)
                .await
            {
                Ok(_) => {
                    self.audit
                        .record(LifecycleEvent::new(
                            claim_id,
                            Some(prior),
                            status,
                            &resolution.actor,
                            resolution.resolved_at,
                            LifecycleEventKind::Resolved {
                                outcome: resolution.outcome,
                            },
                            resolved_amount.map(|m| m.to_string()),
                        ))
                        .await;
                    info!(%claim_id, %status, "rejection resolved");
                    return Ok(status);
                }
                Err(StoreError::Conflict { .. }) => {
                    debug!(%claim_id, attempt, "resolution lost CAS race, retrying");
                    if attempt + 1 < self.retry.max_attempts {
                        tokio::time::sleep(self.retry.delay(attempt)).await;
                    }
                }
                Err(e) => return Err(LifecycleError::from_store(e, claim_id)),
            }
        }
        Err(LifecycleError::ConcurrencyConflict { claim_id })
    }

    /// Expires a pending record whose window has elapsed
    ///
    /// Returns false without error when the record already left
    /// `PendingReview`, so the deadline sweep can call this blindly.
    #[instrument(skip(self))]
    pub async fn expire(
        &self,
        claim_id: ClaimId,
        as_of: DateTime<Utc>,
        actor: &str,
    ) -> Result<bool, LifecycleError> {
        for attempt in 0..self.retry.max_attempts {
            let versioned = self
                .store
                .get(claim_id)
                .await
                .map_err(|e| LifecycleError::from_store(e, claim_id))?;
            let mut record = versioned.value;
            let prior = record.status;

            if !record.expire(as_of) {
                return Ok(false);
            }

            match self
                .store
                .compare_and_swap(claim_id, versioned.version, record)
                .await
            {
                Ok(_) => {
                    self.audit
                        .record(LifecycleEvent::new(
                            claim_id,
                            Some(prior),
                            RejectionStatus::Expired,
                            actor,
                            as_of,
                            LifecycleEventKind::Expired,
                            None,
                        ))
                        .await;
                    info!(%claim_id, "rejection expired");
                    return Ok(true);
                }
                Err(StoreError::Conflict { .. }) => {
                    debug!(%claim_id, attempt, "expiry lost CAS race, retrying");
                    if attempt + 1 < self.retry.max_attempts {
                        tokio::time::sleep(self.retry.delay(attempt)).await;
                    }
                }
                Err(e) => return Err(LifecycleError::from_store(e, claim_id)),
            }
        }
        Err(LifecycleError::ConcurrencyConflict { claim_id })
    }

    /// Soft-archives a record in a terminal state
    #[instrument(skip(self))]
    pub async fn archive(
        &self,
        claim_id: ClaimId,
        actor: &str,
    ) -> Result<(), LifecycleError> {
        for attempt in 0..self.retry.max_attempts {
            let versioned = self
                .store
                .get(claim_id)
                .await
                .map_err(|e| LifecycleError::from_store(e, claim_id))?;
            let mut record = versioned.value;
            let status = record.status;
            if !status.is_terminal() {
                return Err(LifecycleError::Validation(format!(
                    "cannot archive claim {} in non-terminal state {}",
                    claim_id, status
                )));
            }
            record.archive();
            let archived_at = record.updated_at;

            match self
                .store
                .compare_and_swap(claim_id, versioned.version, record)
                .await
            {
                Ok(_) => {
                    self.audit
                        .record(LifecycleEvent::new(
                            claim_id,
                            Some(status),
                            status,
                            actor,
                            archived_at,
                            LifecycleEventKind::Archived,
                            None,
                        ))
                        .await;
                    return Ok(());
                }
                Err(StoreError::Conflict { .. }) => {
                    debug!(%claim_id, attempt, "archive lost CAS race, retrying");
                    if attempt + 1 < self.retry.max_attempts {
                        tokio::time::sleep(self.retry.delay(attempt)).await;
                    }
                }
                Err(e) => return Err(LifecycleError::from_store(e, claim_id)),
            }
        }
        Err(LifecycleError::ConcurrencyConflict { claim_id })
    }
}
