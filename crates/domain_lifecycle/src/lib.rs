//! Rejection lifecycle domain
//!
//! Owns the rejection record aggregate and its forward-only state
//! machine, the statutory deadline calculator, and the audited service
//! that is the only write path for records. Downstream engines (fraud,
//! forecasting, compliance) consume read-only snapshots from here.

pub mod adapters;
pub mod analytics;
pub mod appeal;
pub mod config;
pub mod deadline;
pub mod error;
pub mod events;
pub mod ingest;
pub mod ports;
pub mod reason;
pub mod rejection;
pub mod service;

pub use adapters::{MemoryAuditSink, MemoryOutbox, MemoryRejectionStore};
pub use analytics::{compliance_summary, ComplianceSummary};
pub use appeal::{AppealRequest, SubmissionChannel};
pub use config::JurisdictionConfig;
pub use deadline::{DeadlineCalculator, DeadlinePosition};
pub use error::LifecycleError;
pub use events::{LifecycleEvent, LifecycleEventKind};
pub use ingest::{AppealSubmission, RejectionEvent, ResolutionEvent};
pub use ports::{AuditSink, NotificationOutbox, RejectionStore};
pub use reason::{DenialCategory, ReasonCode};
pub use rejection::{
    AppealDisposition, RecoveryPolicy, RejectionRecord, RejectionStatus, ResolutionOutcome,
};
pub use service::{LifecycleService, RetryPolicy};
