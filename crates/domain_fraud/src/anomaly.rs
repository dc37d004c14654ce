//! Statistical anomaly detection
//!
//! Builds a per-physician feature vector (volume, average billed amount,
//! code-mix entropy) and compares each feature against the peer group and
//! the physician's own historical baseline using modified z-scores. The
//! robust measure keeps a single genuine volume spike in the peer group
//! from masking everyone else.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;

use core_kernel::PhysicianId;

use crate::alert::FraudPattern;
use crate::claim_fact::ClaimFact;
use crate::detectors::{group_by_physician, Detection, DetectorConfig};
use crate::stats::{modified_zscore, shannon_entropy};

/// Per-physician scan-window features
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub volume: f64,
    pub avg_amount: f64,
    pub code_entropy: f64,
}

impl FeatureVector {
    pub fn from_facts(facts: &[&ClaimFact]) -> Self {
        let volume = facts.len() as f64;
        let total: f64 = facts
            .iter()
            .map(|f| f.billed.amount().to_f64().unwrap_or(0.0))
            .sum();
        let avg_amount = if facts.is_empty() {
            0.0
        } else {
            total / volume
        };

        let mut code_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for fact in facts {
            *code_counts.entry(fact.service_code.as_str()).or_default() += 1;
        }
        let counts: Vec<usize> = code_counts.values().copied().collect();

        Self {
            volume,
            avg_amount,
            code_entropy: shannon_entropy(&counts),
        }
    }
}

/// Flags physicians whose feature vector deviates beyond the configured
/// threshold from the peer group or from their own baseline
///
/// Peer scoring needs at least `min_peer_group` physicians in the window;
/// own-history scoring needs at least `min_history_days` distinct days of
/// baseline activity. Either source alone can trigger a detection, and
/// the worst deviation across both wins.
pub fn detect_statistical_anomaly(
    facts: &[ClaimFact],
    baseline: &[ClaimFact],
    config: &DetectorConfig,
) -> Vec<Detection> {
    let groups = group_by_physician(facts);
    let history = group_by_physician(baseline);
    let peer_scored = groups.len() >= config.min_peer_group;
    if !peer_scored && history.is_empty() {
        return Vec::new();
    }

    let features: BTreeMap<PhysicianId, FeatureVector> = groups
        .iter()
        .map(|(id, facts)| (*id, FeatureVector::from_facts(facts)))
        .collect();

    let volumes: Vec<f64> = features.values().map(|f| f.volume).collect();
    let amounts: Vec<f64> = features.values().map(|f| f.avg_amount).collect();
    let entropies: Vec<f64> = features.values().map(|f| f.code_entropy).collect();

    let mut detections = Vec::new();
    for (physician_id, feature) in &features {
        let mut worst: Option<(&'static str, f64, &'static str)> = None;

        if peer_scored {
            let dimensions = [
                ("volume", feature.volume, &volumes),
                ("avg_amount", feature.avg_amount, &amounts),
                ("code_entropy", feature.code_entropy, &entropies),
            ];
            for (name, value, sample) in dimensions {
                track(&mut worst, name, "peers", modified_zscore(value, sample), config);
            }
        }

        if let Some(history_facts) = history.get(physician_id) {
            let past_daily = daily_volumes(history_facts);
            if past_daily.len() >= config.min_history_days {
                let current_daily = daily_volumes(&groups[physician_id]);
                let mean_daily =
                    current_daily.iter().sum::<f64>() / current_daily.len() as f64;
                let past_amounts: Vec<f64> = history_facts
                    .iter()
                    .map(|f| f.billed.amount().to_f64().unwrap_or(0.0))
                    .collect();

                track(
                    &mut worst,
                    "daily_volume",
                    "own history",
                    modified_zscore(mean_daily, &past_daily),
                    config,
                );
                track(
                    &mut worst,
                    "avg_amount",
                    "own history",
                    modified_zscore(feature.avg_amount, &past_amounts),
                    config,
                );
            }
        }

        if let Some((feature_name, z, origin)) = worst {
            let claim_ids = groups[physician_id].iter().map(|f| f.claim_id).collect();
            detections.push(Detection {
                physician_id: *physician_id,
                pattern: FraudPattern::StatisticalAnomaly,
                confidence: (z / (config.anomaly_threshold * 2.0)).min(0.95),
                claim_ids,
                details: format!(
                    "{} deviates {:.1} robust z-scores from {}",
                    feature_name, z, origin
                ),
            });
        }
    }
    detections
}

/// Keeps the worst above-threshold deviation seen so far
fn track(
    worst: &mut Option<(&'static str, f64, &'static str)>,
    name: &'static str,
    origin: &'static str,
    z: Option<f64>,
    config: &DetectorConfig,
) {
    if let Some(z) = z {
        if z.abs() > config.anomaly_threshold
            && worst.map(|(_, w, _)| z.abs() > w).unwrap_or(true)
        {
            *worst = Some((name, z.abs(), origin));
        }
    }
}

/// Claim counts per active day, ordered by date
fn daily_volumes(facts: &[&ClaimFact]) -> Vec<f64> {
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for fact in facts {
        *per_day.entry(fact.service_date()).or_default() += 1;
    }
    per_day.values().map(|&c| c as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use core_kernel::{ClaimId, Currency, Money, PatientId, ProviderId};

    fn fact_on(physician_id: PhysicianId, code: &str, amount: i64, day: u32) -> ClaimFact {
        ClaimFact {
            claim_id: ClaimId::new_v7(),
            provider_id: ProviderId::new_v7(),
            physician_id,
            patient_id: PatientId::new_v7(),
            service_code: code.to_string(),
            complexity: 2,
            service_at: Utc.with_ymd_and_hms(2025, 1, day, 10, 0, 0).unwrap(),
            billed: Money::new(Decimal::from(amount), Currency::SAR),
            rejected: false,
        }
    }

    fn fact(physician_id: PhysicianId, code: &str, amount: i64) -> ClaimFact {
        fact_on(physician_id, code, amount, 10)
    }

    #[test]
    fn test_feature_vector() {
        let physician = PhysicianId::new_v7();
        let facts = vec![
            fact(physician, "A", 100),
            fact(physician, "A", 200),
            fact(physician, "B", 300),
        ];
        let refs: Vec<&ClaimFact> = facts.iter().collect();
        let features = FeatureVector::from_facts(&refs);

        assert_eq!(features.volume, 3.0);
        assert!((features.avg_amount - 200.0).abs() < 1e-9);
        assert!(features.code_entropy > 0.0);
    }

    #[test]
    fn test_outlier_volume_flagged() {
        // Eight peers bill ~10 claims; one bills 200
        let mut facts = Vec::new();
        for i in 0..8 {
            let physician = PhysicianId::new_v7();
            for _ in 0..(9 + i % 3) {
                facts.push(fact(physician, "A", 100));
            }
        }
        let outlier = PhysicianId::new_v7();
        for _ in 0..200 {
            facts.push(fact(outlier, "A", 100));
        }

        let detections = detect_statistical_anomaly(&facts, &[], &DetectorConfig::default());

        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].physician_id, outlier);
        assert_eq!(detections[0].pattern, FraudPattern::StatisticalAnomaly);
        assert!(detections[0].details.contains("peers"));
    }

    #[test]
    fn test_own_history_volume_spike_flagged() {
        // A lone physician (no peer group) billing 60 claims in one day
        // against a 9-11 claims-per-day baseline
        let physician = PhysicianId::new_v7();
        let mut baseline = Vec::new();
        for day in 1u32..=20 {
            for _ in 0..(9 + day % 3) {
                baseline.push(fact_on(physician, "A", 100, day));
            }
        }
        let window: Vec<ClaimFact> = (0..60)
            .map(|_| fact_on(physician, "A", 100, 25))
            .collect();

        let detections =
            detect_statistical_anomaly(&window, &baseline, &DetectorConfig::default());

        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].physician_id, physician);
        assert!(detections[0].details.contains("own history"));
    }

    #[test]
    fn test_thin_baseline_not_compared() {
        // Five days of history is below the 14-day floor; with no peer
        // group either, the spike stays unscored
        let physician = PhysicianId::new_v7();
        let mut baseline = Vec::new();
        for day in 1u32..=5 {
            for _ in 0..(9 + day % 3) {
                baseline.push(fact_on(physician, "A", 100, day));
            }
        }
        let window: Vec<ClaimFact> = (0..60)
            .map(|_| fact_on(physician, "A", 100, 25))
            .collect();

        let detections =
            detect_statistical_anomaly(&window, &baseline, &DetectorConfig::default());

        assert!(detections.is_empty());
    }

    #[test]
    fn test_small_peer_group_skipped() {
        let facts = vec![
            fact(PhysicianId::new_v7(), "A", 100),
            fact(PhysicianId::new_v7(), "A", 100),
        ];
        assert!(detect_statistical_anomaly(&facts, &[], &DetectorConfig::default()).is_empty());
    }
}
