//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests specify only the fields they care about; everything else is a
//! valid Saudi-regime default (SAR amounts, consistent 15% VAT breakdown,
//! a received date inside January 2025).

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use core_kernel::{
    AmountBreakdown, ClaimId, Currency, Money, PatientId, PhysicianId, ProviderId, Rate,
};
use domain_fraud::ClaimFact;
use domain_lifecycle::{RejectionEvent, SubmissionChannel};

use crate::fixtures::TemporalFixtures;

/// Builder for exchange rejection events
///
/// The VAT and total are recomputed from the net at every `build`, so the
/// produced event always satisfies the breakdown invariant regardless of
/// which fields were overridden.
#[derive(Debug, Clone)]
pub struct RejectionEventBuilder {
    claim_id: Uuid,
    payer_id: Uuid,
    provider_id: Uuid,
    physician_id: Uuid,
    net_amount: Decimal,
    vat_rate_percent: Decimal,
    currency: Currency,
    submission_date: NaiveDate,
    received_date: NaiveDate,
    channel: SubmissionChannel,
    reason_codes: Vec<String>,
}

impl Default for RejectionEventBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RejectionEventBuilder {
    pub fn new() -> Self {
        let received = TemporalFixtures::received_date();
        Self {
            claim_id: Uuid::now_v7(),
            payer_id: Uuid::now_v7(),
            provider_id: Uuid::now_v7(),
            physician_id: Uuid::now_v7(),
            net_amount: dec!(1000),
            vat_rate_percent: dec!(15),
            currency: Currency::SAR,
            submission_date: received - chrono::Days::new(5),
            received_date: received,
            channel: SubmissionChannel::Exchange,
            reason_codes: vec!["DOC-01".to_string()],
        }
    }

    pub fn with_claim_id(mut self, claim_id: Uuid) -> Self {
        self.claim_id = claim_id;
        self
    }

    pub fn with_physician_id(mut self, physician_id: Uuid) -> Self {
        self.physician_id = physician_id;
        self
    }

    pub fn with_net_amount(mut self, net: Decimal) -> Self {
        self.net_amount = net;
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Sets the received date and moves the submission date five days earlier
    pub fn with_received_date(mut self, received: NaiveDate) -> Self {
        self.received_date = received;
        self.submission_date = received - chrono::Days::new(5);
        self
    }

    pub fn with_channel(mut self, channel: SubmissionChannel) -> Self {
        self.channel = channel;
        self
    }

    pub fn with_reason_codes(mut self, codes: Vec<String>) -> Self {
        self.reason_codes = codes;
        self
    }

    pub fn build(self) -> RejectionEvent {
        let breakdown = AmountBreakdown::from_net(
            Money::new(self.net_amount, self.currency),
            Rate::from_percentage(self.vat_rate_percent),
        );
        RejectionEvent {
            claim_id: self.claim_id,
            payer_id: self.payer_id,
            provider_id: self.provider_id,
            physician_id: self.physician_id,
            net_amount: breakdown.net().amount(),
            vat_amount: breakdown.vat().amount(),
            total_amount: breakdown.total().amount(),
            currency: self.currency,
            submission_date: self.submission_date,
            received_date: self.received_date,
            channel: self.channel,
            reason_codes: self.reason_codes,
        }
    }
}

/// Builder for physician claim facts fed to the fraud detectors
#[derive(Debug, Clone)]
pub struct ClaimFactBuilder {
    provider_id: ProviderId,
    physician_id: PhysicianId,
    patient_id: PatientId,
    service_code: String,
    complexity: u8,
    service_at: DateTime<Utc>,
    amount: Decimal,
    rejected: bool,
}

impl ClaimFactBuilder {
    pub fn new(physician_id: PhysicianId) -> Self {
        Self {
            provider_id: ProviderId::new_v7(),
            physician_id,
            patient_id: PatientId::new_v7(),
            service_code: "CONS-01".to_string(),
            complexity: 2,
            service_at: Utc.with_ymd_and_hms(2025, 1, 10, 10, 0, 0).unwrap(),
            amount: dec!(100),
            rejected: false,
        }
    }

    pub fn with_provider(mut self, provider_id: ProviderId) -> Self {
        self.provider_id = provider_id;
        self
    }

    pub fn with_patient(mut self, patient_id: PatientId) -> Self {
        self.patient_id = patient_id;
        self
    }

    pub fn with_code(mut self, code: &str) -> Self {
        self.service_code = code.to_string();
        self
    }

    pub fn with_complexity(mut self, level: u8) -> Self {
        self.complexity = level;
        self
    }

    pub fn with_service_at(mut self, service_at: DateTime<Utc>) -> Self {
        self.service_at = service_at;
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_rejected(mut self, rejected: bool) -> Self {
        self.rejected = rejected;
        self
    }

    /// Builds a fact with a fresh claim id; call repeatedly for distinct claims
    pub fn build(&self) -> ClaimFact {
        ClaimFact {
            claim_id: ClaimId::new_v7(),
            provider_id: self.provider_id,
            physician_id: self.physician_id,
            patient_id: self.patient_id,
            service_code: self.service_code.clone(),
            complexity: self.complexity,
            service_at: self.service_at,
            billed: Money::new(self.amount, Currency::SAR),
            rejected: self.rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_event_builder_produces_consistent_breakdown() {
        let event = RejectionEventBuilder::new()
            .with_net_amount(dec!(333.33))
            .build();

        assert!(event.validate_schema().is_ok());
        assert_eq!(event.total_amount, event.net_amount + event.vat_amount);
    }

    #[test]
    fn test_received_date_override_keeps_ordering() {
        let received = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let event = RejectionEventBuilder::new()
            .with_received_date(received)
            .build();

        assert_eq!(event.received_date, received);
        assert!(event.submission_date < event.received_date);
    }

    #[test]
    fn test_claim_fact_builder_fresh_ids() {
        let builder = ClaimFactBuilder::new(PhysicianId::new_v7());
        assert_ne!(builder.build().claim_id, builder.build().claim_id);
    }
}
