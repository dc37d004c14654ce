//! Appeal requests

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AppealId, ClaimId};

/// Channel through which an appeal or rejection arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionChannel {
    /// The national claims exchange
    Exchange,
    /// Payer web portal
    Portal,
    /// Manual email intake
    Email,
}

/// An appeal filed against a rejection
///
/// At most one appeal per record is active at any time; superseded appeals
/// are kept for audit with `active` cleared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppealRequest {
    pub id: AppealId,
    pub claim_id: ClaimId,
    pub channel: SubmissionChannel,
    pub submitted_at: DateTime<Utc>,
    /// References to supporting evidence held by the document collaborator
    pub evidence_refs: Vec<String>,
    /// Set when the appeal was filed after the statutory deadline
    pub out_of_window: bool,
    pub active: bool,
}

impl AppealRequest {
    pub fn new(
        claim_id: ClaimId,
        channel: SubmissionChannel,
        submitted_at: DateTime<Utc>,
        evidence_refs: Vec<String>,
    ) -> Self {
        Self {
            id: AppealId::new_v7(),
            claim_id,
            channel,
            submitted_at,
            evidence_refs,
            out_of_window: false,
            active: true,
        }
    }

    /// Marks the appeal resolved; it stays on the record for audit
    pub fn close(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_appeal_is_active_and_in_window() {
        let appeal = AppealRequest::new(
            ClaimId::new_v7(),
            SubmissionChannel::Exchange,
            Utc::now(),
            vec!["doc://evidence/1".to_string()],
        );

        assert!(appeal.active);
        assert!(!appeal.out_of_window);
    }

    #[test]
    fn test_close_deactivates() {
        let mut appeal = AppealRequest::new(
            ClaimId::new_v7(),
            SubmissionChannel::Portal,
            Utc::now(),
            vec![],
        );
        appeal.close();
        assert!(!appeal.active);
    }
}
