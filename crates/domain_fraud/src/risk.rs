//! Physician risk profiles
//!
//! Alerts from one scan accumulate into a composite score per physician,
//! weighted by severity and capped at 1.0. The previous score is retained
//! so the forecaster and reviewers can see the trend.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::PhysicianId;

use crate::alert::{FraudAlert, FraudPattern};
use crate::claim_fact::ClaimFact;

/// Risk banding derived from the composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 0.8 => RiskLevel::Critical,
            s if s >= 0.6 => RiskLevel::High,
            s if s >= 0.35 => RiskLevel::Medium,
            s if s > 0.0 => RiskLevel::Low,
            _ => RiskLevel::None,
        }
    }
}

/// Rolling risk aggregate for one physician
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicianRiskProfile {
    pub physician_id: PhysicianId,
    /// Claims in the scan window
    pub claim_volume: usize,
    /// Fraction of window claims the payer rejected
    pub rejection_rate: f64,
    pub pattern_counts: BTreeMap<FraudPattern, u32>,
    /// Severity-weighted composite in [0, 1]
    pub composite_score: f64,
    /// Score from the previous scan, kept for trend analysis
    pub previous_score: Option<f64>,
    pub computed_at: DateTime<Utc>,
}

impl PhysicianRiskProfile {
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.composite_score)
    }

    /// High and critical profiles go to the investigation queue
    pub fn requires_investigation(&self) -> bool {
        self.risk_level() >= RiskLevel::High
    }

    /// Coding-behaviour patterns at medium+ risk warrant clinician
    /// coding training rather than investigation
    pub fn requires_training(&self) -> bool {
        self.risk_level() >= RiskLevel::Medium
            && (self.pattern_counts.contains_key(&FraudPattern::Upcoding)
                || self.pattern_counts.contains_key(&FraudPattern::Unbundling))
    }

    /// Score delta against the previous scan, when one exists
    pub fn score_trend(&self) -> Option<f64> {
        self.previous_score
            .map(|previous| self.composite_score - previous)
    }
}

/// Builds risk profiles from a scan's alerts and facts
///
/// Physicians with window claims but no alerts still get a profile (zero
/// score) so downstream consumers see the full population.
pub fn build_risk_profiles(
    alerts: &[FraudAlert],
    facts: &[ClaimFact],
    previous: &HashMap<PhysicianId, f64>,
    computed_at: DateTime<Utc>,
) -> Vec<PhysicianRiskProfile> {
    let mut volumes: BTreeMap<PhysicianId, (usize, usize)> = BTreeMap::new();
    for fact in facts {
        let entry = volumes.entry(fact.physician_id).or_default();
        entry.0 += 1;
        if fact.rejected {
            entry.1 += 1;
        }
    }

    let mut scores: BTreeMap<PhysicianId, f64> = BTreeMap::new();
    let mut counts: BTreeMap<PhysicianId, BTreeMap<FraudPattern, u32>> = BTreeMap::new();
    for alert in alerts {
        let contribution = alert.severity.weight() * alert.confidence;
        *scores.entry(alert.physician_id).or_default() += contribution;
        *counts
            .entry(alert.physician_id)
            .or_default()
            .entry(alert.pattern)
            .or_default() += 1;
    }

    volumes
        .into_iter()
        .map(|(physician_id, (volume, rejected))| {
            let composite_score = scores.get(&physician_id).copied().unwrap_or(0.0).min(1.0);
            PhysicianRiskProfile {
                physician_id,
                claim_volume: volume,
                rejection_rate: if volume == 0 {
                    0.0
                } else {
                    rejected as f64 / volume as f64
                },
                pattern_counts: counts.remove(&physician_id).unwrap_or_default(),
                composite_score,
                previous_score: previous.get(&physician_id).copied(),
                computed_at,
            }
        })
        .collect()
}
