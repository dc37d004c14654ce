//! Fraud and abuse detection domain
//!
//! Batch scans over read-only claim facts: four deterministic pattern
//! detectors plus a robust statistical anomaly measure, rolled up into
//! per-physician risk profiles. Alerts go to the notification outbox
//! with idempotent dedup keys; nothing here ever mutates a rejection
//! record.

pub mod alert;
pub mod anomaly;
pub mod claim_fact;
pub mod detectors;
pub mod error;
pub mod risk;
pub mod scan;
pub mod stats;

pub use alert::{AlertSeverity, FraudAlert, FraudPattern};
pub use anomaly::{detect_statistical_anomaly, FeatureVector};
pub use claim_fact::{AvailabilityRoster, ClaimFact, RosterShift};
pub use detectors::{CodeBundle, Detection, DetectorConfig};
pub use error::FraudError;
pub use risk::{build_risk_profiles, PhysicianRiskProfile, RiskLevel};
pub use scan::{ScanInput, ScanReport, ScanRunner};
