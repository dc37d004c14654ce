//! Pre-built Test Fixtures
//!
//! Ready-to-use test data shared across the suite. Fixtures are
//! deterministic so tests that compare identifiers or instants stay
//! stable between runs.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;
use uuid::Uuid;

use core_kernel::{AmountBreakdown, ClaimId, Currency, Money, PhysicianId, Rate};
use domain_lifecycle::JurisdictionConfig;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Standard SAR claim amount
    pub fn sar_1000() -> Money {
        Money::new(dec!(1000.00), Currency::SAR)
    }

    /// A SAR amount and its statutory 15% breakdown (vat 150, total 1150)
    pub fn sar_breakdown_1000() -> AmountBreakdown {
        AmountBreakdown::from_net(Self::sar_1000(), Rate::from_percentage(dec!(15)))
    }

    /// An AED amount for currency-mismatch scenarios
    pub fn aed_100() -> Money {
        Money::new(dec!(100.00), Currency::AED)
    }

    pub fn sar_zero() -> Money {
        Money::zero(Currency::SAR)
    }
}

/// Fixture for temporal test data
///
/// All dates sit inside January 2025 so that the default 30-day window
/// expires at end of Jan 31 Riyadh time.
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Standard rejection-received date (Jan 1, 2025)
    pub fn received_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    /// An instant well inside the window (Jan 10 noon UTC)
    pub fn mid_window() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap()
    }

    /// An instant past the at-risk threshold but before the deadline
    pub fn at_risk_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 28, 12, 0, 0).unwrap()
    }

    /// An instant strictly past the end of the deadline day
    pub fn past_deadline() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap()
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    /// A deterministic claim ID
    pub fn claim_id() -> ClaimId {
        ClaimId::from(Uuid::from_u128(0x0194_0000_0000_7000_8000_0000_0000_0001))
    }

    /// A deterministic physician ID
    pub fn physician_id() -> PhysicianId {
        PhysicianId::from(Uuid::from_u128(0x0194_0000_0000_7000_8000_0000_0000_0002))
    }
}

/// Fixture for jurisdiction configuration
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// The default Saudi regime: 30-day window, 15% VAT, Riyadh timezone
    pub fn saudi() -> JurisdictionConfig {
        JurisdictionConfig::default()
    }

    /// A compressed window for tests that walk a full lifecycle quickly
    pub fn short_window(days: u32) -> JurisdictionConfig {
        JurisdictionConfig {
            statutory_window_days: days,
            ..Default::default()
        }
    }
}
