//! Inbound event payloads from the claims exchange
//!
//! Raw exchange payloads are validated here before any domain object is
//! constructed. Schema-level problems (missing fields, bad shapes) come
//! back as `Validation` errors; semantic checks (breakdown consistency,
//! date ordering) happen when the payload is converted in the service.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::Currency;

use crate::appeal::SubmissionChannel;
use crate::error::LifecycleError;
use crate::rejection::ResolutionOutcome;

/// A claim rejection as delivered by the exchange
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct RejectionEvent {
    pub claim_id: Uuid,
    pub payer_id: Uuid,
    pub provider_id: Uuid,
    pub physician_id: Uuid,
    pub net_amount: Decimal,
    pub vat_amount: Decimal,
    pub total_amount: Decimal,
    pub currency: Currency,
    /// Date the claim was originally submitted to the payer
    pub submission_date: NaiveDate,
    /// Date the rejection was received; the statutory window starts here
    pub received_date: NaiveDate,
    pub channel: SubmissionChannel,
    #[validate(length(min = 1, message = "at least one reason code is required"))]
    pub reason_codes: Vec<String>,
}

impl RejectionEvent {
    /// Runs schema-level validation plus checks `validator` cannot express
    pub fn validate_schema(&self) -> Result<(), LifecycleError> {
        self.validate()
            .map_err(|e| LifecycleError::Validation(e.to_string()))?;
        if self.net_amount < Decimal::ZERO {
            return Err(LifecycleError::Validation(format!(
                "net amount must not be negative, got {}",
                self.net_amount
            )));
        }
        if self.received_date < self.submission_date {
            return Err(LifecycleError::Validation(format!(
                "received date {} precedes submission date {}",
                self.received_date, self.submission_date
            )));
        }
        Ok(())
    }
}

/// An appeal submission against an ingested rejection
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct AppealSubmission {
    pub claim_id: Uuid,
    pub channel: SubmissionChannel,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub evidence_refs: Vec<String>,
    #[validate(length(min = 1, message = "actor is required"))]
    pub actor: String,
}

/// A payer resolution for an appealed rejection
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct ResolutionEvent {
    pub claim_id: Uuid,
    pub outcome: ResolutionOutcome,
    /// Amount actually paid; required when the outcome is `Recovered`
    pub resolved_amount: Option<Decimal>,
    pub resolved_at: DateTime<Utc>,
    #[validate(length(min = 1, message = "actor is required"))]
    pub actor: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn event() -> RejectionEvent {
        RejectionEvent {
            claim_id: Uuid::now_v7(),
            payer_id: Uuid::now_v7(),
            provider_id: Uuid::now_v7(),
            physician_id: Uuid::now_v7(),
            net_amount: dec!(1000),
            vat_amount: dec!(150),
            total_amount: dec!(1150),
            currency: Currency::SAR,
            submission_date: NaiveDate::from_ymd_opt(2024, 12, 20).unwrap(),
            received_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            channel: SubmissionChannel::Exchange,
            reason_codes: vec!["DOC-01".to_string()],
        }
    }

    #[test]
    fn test_valid_event_passes() {
        assert!(event().validate_schema().is_ok());
    }

    #[test]
    fn test_empty_reason_codes_rejected() {
        let mut e = event();
        e.reason_codes.clear();
        assert!(matches!(
            e.validate_schema(),
            Err(LifecycleError::Validation(_))
        ));
    }

    #[test]
    fn test_negative_net_rejected() {
        let mut e = event();
        e.net_amount = dec!(-5);
        assert!(matches!(
            e.validate_schema(),
            Err(LifecycleError::Validation(_))
        ));
    }

    #[test]
    fn test_received_before_submission_rejected() {
        let mut e = event();
        e.received_date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert!(matches!(
            e.validate_schema(),
            Err(LifecycleError::Validation(_))
        ));
    }
}
