//! Deterministic fraud pattern detectors
//!
//! Each detector is a pure function over claim facts; all thresholds come
//! from [`DetectorConfig`]. Detectors return raw [`Detection`]s which the
//! scan runner turns into alerts with scan identity and timestamps.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, PhysicianId};

use crate::alert::FraudPattern;
use crate::claim_fact::{AvailabilityRoster, ClaimFact};

/// A service code with an established bundled equivalent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeBundle {
    pub bundle_code: String,
    pub component_codes: Vec<String>,
}

/// Thresholds for all pattern detectors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Amount delta at or below which two same-service claims count as
    /// duplicates rather than distinct procedures
    pub negligible_amount_delta: Decimal,
    pub bundles: Vec<CodeBundle>,
    /// Complexity level at or above which a code counts as high-complexity
    pub high_complexity_level: u8,
    /// How far a physician's high-complexity share must exceed their own
    /// baseline share before upcoding is flagged
    pub upcoding_margin: f64,
    /// Minimum claims in both window and baseline for upcoding analysis
    pub min_claims_for_upcoding: usize,
    /// Maximum distinct patients one physician can plausibly see per day
    pub daily_patient_ceiling: usize,
    /// Modified z-score beyond which a feature is anomalous
    pub anomaly_threshold: f64,
    /// Minimum peer-group size for statistical comparison
    pub min_peer_group: usize,
    /// Minimum distinct baseline days before a physician is compared
    /// against their own history
    pub min_history_days: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            negligible_amount_delta: dec!(1.00),
            bundles: Vec::new(),
            high_complexity_level: 4,
            upcoding_margin: 0.2,
            min_claims_for_upcoding: 10,
            daily_patient_ceiling: 40,
            anomaly_threshold: 3.5,
            min_peer_group: 5,
            min_history_days: 14,
        }
    }
}

/// A raw detector finding, before alert identity is attached
#[derive(Debug, Clone)]
pub struct Detection {
    pub physician_id: PhysicianId,
    pub pattern: FraudPattern,
    pub confidence: f64,
    pub claim_ids: Vec<ClaimId>,
    pub details: String,
}

/// Duplicate billing: same patient, provider, physician, service code and
/// service date, with a negligible amount difference between the lines
pub fn detect_duplicate_billing(facts: &[ClaimFact], config: &DetectorConfig) -> Vec<Detection> {
    let mut groups: BTreeMap<_, Vec<&ClaimFact>> = BTreeMap::new();
    for fact in facts {
        let key = (
            fact.patient_id,
            fact.provider_id,
            fact.physician_id,
            fact.service_code.clone(),
            fact.service_date(),
        );
        groups.entry(key).or_default().push(fact);
    }

    let mut detections = Vec::new();
    for ((_, _, physician_id, code, date), group) in groups {
        if group.len() < 2 {
            continue;
        }
        let amounts: Vec<Decimal> = group.iter().map(|f| f.billed.amount()).collect();
        let max = amounts.iter().max().copied().unwrap_or_default();
        let min = amounts.iter().min().copied().unwrap_or_default();
        if max - min > config.negligible_amount_delta {
            continue;
        }
        let confidence = (0.75 + 0.05 * (group.len() as f64 - 2.0)).min(0.95);
        detections.push(Detection {
            physician_id,
            pattern: FraudPattern::DuplicateBilling,
            confidence,
            claim_ids: group.iter().map(|f| f.claim_id).collect(),
            details: format!("{} lines of {} on {}", group.len(), code, date),
        });
    }
    detections
}

/// Unbundling: component codes of a configured bundle submitted as
/// separate lines within one encounter (physician, patient, service date)
pub fn detect_unbundling(facts: &[ClaimFact], config: &DetectorConfig) -> Vec<Detection> {
    let mut encounters: BTreeMap<_, Vec<&ClaimFact>> = BTreeMap::new();
    for fact in facts {
        let key = (fact.physician_id, fact.patient_id, fact.service_date());
        encounters.entry(key).or_default().push(fact);
    }

    let mut detections = Vec::new();
    for ((physician_id, _, date), encounter) in encounters {
        let codes: BTreeSet<&str> = encounter.iter().map(|f| f.service_code.as_str()).collect();
        for bundle in &config.bundles {
            let present: Vec<&ClaimFact> = encounter
                .iter()
                .filter(|f| bundle.component_codes.contains(&f.service_code))
                .copied()
                .collect();
            // A single component is legitimate; unbundling needs at least two
            if present.len() < 2 || codes.contains(bundle.bundle_code.as_str()) {
                continue;
            }
            let fraction = present.len() as f64 / bundle.component_codes.len() as f64;
            detections.push(Detection {
                physician_id,
                pattern: FraudPattern::Unbundling,
                confidence: 0.4 + 0.5 * fraction,
                claim_ids: present.iter().map(|f| f.claim_id).collect(),
                details: format!(
                    "{}/{} components of bundle {} on {}",
                    present.len(),
                    bundle.component_codes.len(),
                    bundle.bundle_code,
                    date
                ),
            });
        }
    }
    detections
}

/// Upcoding: a physician's high-complexity share in the window exceeds
/// their own historical share by more than the configured margin
pub fn detect_upcoding(
    facts: &[ClaimFact],
    baseline: &[ClaimFact],
    config: &DetectorConfig,
) -> Vec<Detection> {
    let mut detections = Vec::new();
    for (physician_id, window_facts) in group_by_physician(facts) {
        if window_facts.len() < config.min_claims_for_upcoding {
            continue;
        }
        let history: Vec<&ClaimFact> = baseline
            .iter()
            .filter(|f| f.physician_id == physician_id)
            .collect();
        if history.len() < config.min_claims_for_upcoding {
            continue;
        }

        let window_share = high_complexity_share(&window_facts, config);
        let baseline_share = high_complexity_share(&history, config);
        let excess = window_share - baseline_share;
        if excess <= config.upcoding_margin {
            continue;
        }

        let flagged: Vec<ClaimId> = window_facts
            .iter()
            .filter(|f| f.complexity >= config.high_complexity_level)
            .map(|f| f.claim_id)
            .collect();
        detections.push(Detection {
            physician_id,
            pattern: FraudPattern::Upcoding,
            confidence: (0.5 + excess).min(0.95),
            claim_ids: flagged,
            details: format!(
                "high-complexity share {:.0}% vs {:.0}% baseline",
                window_share * 100.0,
                baseline_share * 100.0
            ),
        });
    }
    detections
}

/// Phantom billing: encounters outside the physician's recorded shifts,
/// and daily patient loads above the plausibility ceiling
pub fn detect_phantom_billing(
    facts: &[ClaimFact],
    roster: &AvailabilityRoster,
    config: &DetectorConfig,
) -> Vec<Detection> {
    let mut detections = Vec::new();

    for (physician_id, physician_facts) in group_by_physician(facts) {
        // Off-roster encounters; physicians with no roster data are a
        // data gap, not evidence, and are skipped
        if roster.has_roster(physician_id) {
            let off_roster: Vec<ClaimId> = physician_facts
                .iter()
                .filter(|f| !roster.is_available(physician_id, f.service_date(), f.service_hour()))
                .map(|f| f.claim_id)
                .collect();
            if !off_roster.is_empty() {
                detections.push(Detection {
                    physician_id,
                    pattern: FraudPattern::PhantomBilling,
                    confidence: (0.7 + 0.05 * off_roster.len() as f64).min(0.95),
                    claim_ids: off_roster.clone(),
                    details: format!("{} encounters outside recorded shifts", off_roster.len()),
                });
            }
        }

        // Impossible daily patient load
        let mut per_day: BTreeMap<_, HashSet<_>> = BTreeMap::new();
        for fact in &physician_facts {
            per_day
                .entry(fact.service_date())
                .or_default()
                .insert(fact.patient_id);
        }
        for (date, patients) in per_day {
            if patients.len() <= config.daily_patient_ceiling {
                continue;
            }
            let claim_ids: Vec<ClaimId> = physician_facts
                .iter()
                .filter(|f| f.service_date() == date)
                .map(|f| f.claim_id)
                .collect();
            let overload =
                patients.len() as f64 / config.daily_patient_ceiling.max(1) as f64 - 1.0;
            detections.push(Detection {
                physician_id,
                pattern: FraudPattern::PhantomBilling,
                confidence: (0.6 + overload).min(0.95),
                claim_ids,
                details: format!("{} distinct patients on {}", patients.len(), date),
            });
        }
    }
    detections
}

fn high_complexity_share(facts: &[&ClaimFact], config: &DetectorConfig) -> f64 {
    if facts.is_empty() {
        return 0.0;
    }
    let high = facts
        .iter()
        .filter(|f| f.complexity >= config.high_complexity_level)
        .count();
    high as f64 / facts.len() as f64
}

pub(crate) fn group_by_physician(facts: &[ClaimFact]) -> BTreeMap<PhysicianId, Vec<&ClaimFact>> {
    let mut groups: BTreeMap<PhysicianId, Vec<&ClaimFact>> = BTreeMap::new();
    for fact in facts {
        groups.entry(fact.physician_id).or_default().push(fact);
    }
    groups
}
