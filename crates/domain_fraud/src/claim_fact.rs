//! Read-only claim facts for scanning
//!
//! The fraud engine never touches rejection records directly. Scans run
//! over flattened `ClaimFact` rows extracted from a point-in-time
//! snapshot, so detection can never feed back into the data it analyzes.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, Money, PatientId, PhysicianId, ProviderId};

/// One claim line flattened for pattern detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimFact {
    pub claim_id: ClaimId,
    pub provider_id: ProviderId,
    pub physician_id: PhysicianId,
    pub patient_id: PatientId,
    pub service_code: String,
    /// Coded complexity level, 1 (simple) to 5 (most complex)
    pub complexity: u8,
    /// Encounter timestamp in the provider's local clock, kept as UTC
    pub service_at: DateTime<Utc>,
    pub billed: Money,
    /// True when the payer rejected this claim line
    pub rejected: bool,
}

impl ClaimFact {
    pub fn service_date(&self) -> NaiveDate {
        self.service_at.date_naive()
    }

    pub fn service_hour(&self) -> u32 {
        self.service_at.hour()
    }
}

/// A physician's recorded working shift on one date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterShift {
    pub date: NaiveDate,
    /// Inclusive start hour, 0-23
    pub start_hour: u32,
    /// Exclusive end hour, 1-24
    pub end_hour: u32,
}

impl RosterShift {
    pub fn covers(&self, date: NaiveDate, hour: u32) -> bool {
        self.date == date && hour >= self.start_hour && hour < self.end_hour
    }
}

/// Recorded availability per physician
///
/// A physician absent from the roster has no recorded shifts at all;
/// such physicians are skipped by phantom detection rather than flagged
/// wholesale, since a missing roster is a data gap, not evidence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilityRoster {
    shifts: HashMap<PhysicianId, Vec<RosterShift>>,
}

impl AvailabilityRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_shift(&mut self, physician_id: PhysicianId, shift: RosterShift) {
        self.shifts.entry(physician_id).or_default().push(shift);
    }

    /// Returns true if the physician has any roster data at all
    pub fn has_roster(&self, physician_id: PhysicianId) -> bool {
        self.shifts
            .get(&physician_id)
            .is_some_and(|s| !s.is_empty())
    }

    /// Returns true if the encounter falls inside a recorded shift
    pub fn is_available(&self, physician_id: PhysicianId, date: NaiveDate, hour: u32) -> bool {
        self.shifts
            .get(&physician_id)
            .is_some_and(|shifts| shifts.iter().any(|s| s.covers(date, hour)))
    }
}
