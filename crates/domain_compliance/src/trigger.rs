//! Compliance triggers and letters

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, LetterId};

/// The three statutory notification stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    /// First sighting of a pending rejection
    InitialNotification,
    /// Record crossed the at-risk threshold without an appeal
    Warning,
    /// Deadline reached; the record is being expired
    Final,
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TriggerType::InitialNotification => "initial_notification",
            TriggerType::Warning => "warning",
            TriggerType::Final => "final",
        };
        write!(f, "{}", name)
    }
}

/// A generated compliance letter
///
/// Immutable once created; rendering and delivery happen downstream of
/// the outbox. The letter carries the structured facts only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceLetter {
    pub id: LetterId,
    pub claim_id: ClaimId,
    pub trigger: TriggerType,
    /// The deadline that produced this trigger
    pub response_deadline: DateTime<Utc>,
    pub days_remaining: i64,
    pub generated_at: DateTime<Utc>,
}

impl ComplianceLetter {
    pub fn new(
        claim_id: ClaimId,
        trigger: TriggerType,
        response_deadline: DateTime<Utc>,
        days_remaining: i64,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: LetterId::new_v7(),
            claim_id,
            trigger,
            response_deadline,
            days_remaining,
            generated_at,
        }
    }

    /// Idempotency key for outbox publication
    pub fn dedup_key(&self) -> String {
        format!("compliance:{}:{}", self.claim_id, self.trigger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_key_per_claim_and_trigger() {
        let claim_id = ClaimId::new_v7();
        let now = Utc::now();
        let warning = ComplianceLetter::new(claim_id, TriggerType::Warning, now, 5, now);
        let final_letter = ComplianceLetter::new(claim_id, TriggerType::Final, now, 0, now);
        let warning_again = ComplianceLetter::new(claim_id, TriggerType::Warning, now, 4, now);

        assert_ne!(warning.dedup_key(), final_letter.dedup_key());
        assert_eq!(warning.dedup_key(), warning_again.dedup_key());
    }
}
