//! Compliance orchestrator domain
//!
//! The scheduled deadline sweep: initial notifications on first sighting,
//! warnings at the at-risk threshold, final triggers at the deadline, and
//! audited expiry through the lifecycle service. Trigger emission is
//! idempotent per (claim, trigger type).

pub mod error;
pub mod orchestrator;
pub mod trigger;
pub mod trigger_log;

pub use error::ComplianceError;
pub use orchestrator::{ComplianceSweep, SweepReport};
pub use trigger::{ComplianceLetter, TriggerType};
pub use trigger_log::{InMemoryTriggerLog, TriggerLog};
