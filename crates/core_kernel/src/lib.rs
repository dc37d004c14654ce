//! Core Kernel - Foundational types for the rejection management engine
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic and the statutory VAT breakdown
//! - Timezone-aware calendar helpers for deadline math
//! - Strongly-typed identifiers

pub mod money;
pub mod temporal;
pub mod identifiers;

pub use money::{Money, Currency, MoneyError, Rate, AmountBreakdown};
pub use temporal::{Timezone, DateRange, TemporalError, add_calendar_days};
pub use identifiers::{
    ClaimId, PayerId, ProviderId, PhysicianId, PatientId,
    AppealId, AuditEventId, AlertId, ScanId, SnapshotId, LetterId,
};
