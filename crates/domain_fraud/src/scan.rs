//! Scan runner
//!
//! Runs every detector over a bounded claim window inside a runtime
//! budget. The detectors execute on the blocking pool so a heavy scan
//! never stalls lifecycle processing; exceeding the budget aborts the
//! scan with `ScanTimeout` and discards partial results.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use core_kernel::{DateRange, PhysicianId, ScanId};
use domain_lifecycle::NotificationOutbox;

use crate::alert::FraudAlert;
use crate::anomaly::detect_statistical_anomaly;
use crate::claim_fact::{AvailabilityRoster, ClaimFact};
use crate::detectors::{
    detect_duplicate_billing, detect_phantom_billing, detect_unbundling, detect_upcoding,
    DetectorConfig,
};
use crate::error::FraudError;
use crate::risk::{build_risk_profiles, PhysicianRiskProfile};

/// Everything one scan needs, gathered before it starts
#[derive(Debug, Clone)]
pub struct ScanInput {
    /// The bounded window under scrutiny
    pub window: DateRange,
    /// Claim facts; rows outside the window are ignored
    pub facts: Vec<ClaimFact>,
    /// Historical facts for baseline comparison, outside the window
    pub baseline: Vec<ClaimFact>,
    pub roster: AvailabilityRoster,
    /// Composite scores from the previous scan, for trend retention
    pub previous_scores: HashMap<PhysicianId, f64>,
}

/// Result of one completed scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub scan_id: ScanId,
    pub window: DateRange,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub alerts: Vec<FraudAlert>,
    pub profiles: Vec<PhysicianRiskProfile>,
}

/// Executes fraud scans with a bounded runtime budget
#[derive(Debug, Clone)]
pub struct ScanRunner {
    config: DetectorConfig,
    budget: Duration,
}

impl ScanRunner {
    pub fn new(config: DetectorConfig, budget: Duration) -> Self {
        Self { config, budget }
    }

    /// Runs all detectors over the window
    ///
    /// # Errors
    ///
    /// Returns `ScanTimeout` when the budget elapses first; the partially
    /// computed results are discarded, never reported as complete.
    pub async fn run(&self, input: ScanInput) -> Result<ScanReport, FraudError> {
        let scan_id = ScanId::new_v7();
        let started_at = Utc::now();
        let config = self.config.clone();
        info!(%scan_id, window_days = input.window.days(), "fraud scan starting");

        let handle =
            tokio::task::spawn_blocking(move || execute(scan_id, started_at, input, &config));

        match tokio::time::timeout(self.budget, handle).await {
            Err(_) => {
                // A blocking task cannot be interrupted mid-detector; it
                // runs to completion on the blocking pool and its report
                // is dropped with the abandoned join handle.
                warn!(%scan_id, budget = ?self.budget, "fraud scan exceeded budget, aborting");
                Err(FraudError::ScanTimeout {
                    budget: self.budget,
                })
            }
            Ok(Err(join_err)) => Err(FraudError::TaskFailed(join_err.to_string())),
            Ok(Ok(report)) => {
                info!(
                    %scan_id,
                    alerts = report.alerts.len(),
                    profiles = report.profiles.len(),
                    "fraud scan complete"
                );
                Ok(report)
            }
        }
    }

    /// Publishes the report's alerts through the outbox
    ///
    /// Returns the number of newly published alerts; alerts whose dedup
    /// key was already seen (identical finding from a prior run) are
    /// suppressed by the outbox.
    pub async fn publish_alerts<O: NotificationOutbox>(
        &self,
        outbox: &O,
        report: &ScanReport,
    ) -> usize {
        let mut published = 0;
        for alert in &report.alerts {
            let payload = json!({
                "alert_id": alert.id,
                "scan_id": alert.scan_id,
                "physician_id": alert.physician_id,
                "pattern": alert.pattern,
                "severity": alert.severity,
                "confidence": alert.confidence,
                "claim_ids": alert.claim_ids,
                "detected_at": alert.detected_at,
                "details": alert.details,
            });
            if outbox
                .publish("fraud.alerts", payload, Some(alert.dedup_key()))
                .await
            {
                published += 1;
            }
        }
        published
    }
}

fn execute(
    scan_id: ScanId,
    started_at: DateTime<Utc>,
    input: ScanInput,
    config: &DetectorConfig,
) -> ScanReport {
    let window_facts: Vec<ClaimFact> = input
        .facts
        .into_iter()
        .filter(|f| input.window.contains(f.service_date()))
        .collect();

    let mut detections = detect_duplicate_billing(&window_facts, config);
    detections.extend(detect_unbundling(&window_facts, config));
    detections.extend(detect_upcoding(&window_facts, &input.baseline, config));
    detections.extend(detect_phantom_billing(&window_facts, &input.roster, config));
    detections.extend(detect_statistical_anomaly(
        &window_facts,
        &input.baseline,
        config,
    ));

    let alerts: Vec<FraudAlert> = detections
        .into_iter()
        .map(|d| {
            FraudAlert::new(
                scan_id,
                d.physician_id,
                d.pattern,
                d.confidence,
                d.claim_ids,
                started_at,
                d.details,
            )
        })
        .collect();

    let profiles = build_risk_profiles(
        &alerts,
        &window_facts,
        &input.previous_scores,
        started_at,
    );

    ScanReport {
        scan_id,
        window: input.window,
        started_at,
        completed_at: Utc::now(),
        alerts,
        profiles,
    }
}
