//! Fraud alerts
//!
//! Alerts are immutable once created. A re-scan of the same window
//! produces alerts with identical dedup keys, which the outbox suppresses,
//! so re-running a scan never duplicates downstream review work.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AlertId, ClaimId, PhysicianId, ScanId};

/// Detected fraud pattern classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FraudPattern {
    DuplicateBilling,
    Unbundling,
    Upcoding,
    PhantomBilling,
    StatisticalAnomaly,
}

impl fmt::Display for FraudPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FraudPattern::DuplicateBilling => "duplicate_billing",
            FraudPattern::Unbundling => "unbundling",
            FraudPattern::Upcoding => "upcoding",
            FraudPattern::PhantomBilling => "phantom_billing",
            FraudPattern::StatisticalAnomaly => "statistical_anomaly",
        };
        write!(f, "{}", name)
    }
}

/// Alert severity for downstream triage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    /// Derives severity from the pattern class and confidence
    ///
    /// Deterministic patterns (duplicates, phantom encounters) are
    /// intrinsically more serious than distributional signals at the
    /// same confidence.
    pub fn derive(pattern: FraudPattern, confidence: f64) -> Self {
        let base = match pattern {
            FraudPattern::PhantomBilling => 2,
            FraudPattern::DuplicateBilling | FraudPattern::Upcoding => 1,
            FraudPattern::Unbundling | FraudPattern::StatisticalAnomaly => 0,
        };
        let boost = if confidence >= 0.9 {
            2
        } else if confidence >= 0.7 {
            1
        } else {
            0
        };
        match base + boost {
            0 => AlertSeverity::Low,
            1 => AlertSeverity::Medium,
            2 => AlertSeverity::High,
            _ => AlertSeverity::Critical,
        }
    }

    /// Weight used in composite risk scoring
    pub fn weight(&self) -> f64 {
        match self {
            AlertSeverity::Low => 0.05,
            AlertSeverity::Medium => 0.1,
            AlertSeverity::High => 0.2,
            AlertSeverity::Critical => 0.35,
        }
    }
}

/// An immutable fraud detection finding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudAlert {
    pub id: AlertId,
    pub scan_id: ScanId,
    pub physician_id: PhysicianId,
    pub pattern: FraudPattern,
    pub severity: AlertSeverity,
    /// Detection confidence in [0, 1]
    pub confidence: f64,
    /// Supporting claims, sorted for stable dedup keys
    pub claim_ids: Vec<ClaimId>,
    pub detected_at: DateTime<Utc>,
    /// Human-readable supporting detail for reviewers
    pub details: String,
}

impl FraudAlert {
    pub fn new(
        scan_id: ScanId,
        physician_id: PhysicianId,
        pattern: FraudPattern,
        confidence: f64,
        mut claim_ids: Vec<ClaimId>,
        detected_at: DateTime<Utc>,
        details: String,
    ) -> Self {
        claim_ids.sort();
        claim_ids.dedup();
        let confidence = confidence.clamp(0.0, 1.0);
        Self {
            id: AlertId::new_v7(),
            scan_id,
            physician_id,
            pattern,
            severity: AlertSeverity::derive(pattern, confidence),
            confidence,
            claim_ids,
            detected_at,
            details,
        }
    }

    /// Idempotency key: physician, pattern, and a hash of the sorted
    /// claim-id set. Identical findings from a re-scan share the key.
    pub fn dedup_key(&self) -> String {
        let mut hasher = DefaultHasher::new();
        for claim_id in &self.claim_ids {
            claim_id.as_uuid().hash(&mut hasher);
        }
        format!(
            "fraud:{}:{}:{:016x}",
            self.physician_id,
            self.pattern,
            hasher.finish()
        )
    }
}
