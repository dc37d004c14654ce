//! Statutory deadline calculator
//!
//! Derives response deadlines from the rejection-received date and the
//! jurisdiction's statutory window, as calendar-day addition in the
//! provider's local timezone. Pure and deterministic: identical inputs
//! always yield identical outputs, so deadlines can be recomputed freely
//! and tested without side effects.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use core_kernel::{add_calendar_days, TemporalError, Timezone};

/// Where a record sits relative to its statutory window
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlinePosition {
    /// Before the at-risk threshold
    Open,
    /// Past the at-risk threshold but before the deadline
    AtRisk,
    /// At or past the deadline
    Expired,
}

/// Computes response deadlines and early-warning thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineCalculator {
    window_days: u32,
    /// Fraction of the window after which a record counts as at-risk
    at_risk_fraction: Decimal,
    timezone: Timezone,
}

impl DeadlineCalculator {
    pub fn new(window_days: u32, at_risk_fraction: Decimal, timezone: Timezone) -> Self {
        Self {
            window_days,
            at_risk_fraction,
            timezone,
        }
    }

    /// Returns the statutory window in calendar days
    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    /// The response deadline: end of day `received + window_days` in the
    /// provider's timezone, expressed as a UTC instant
    pub fn response_deadline(&self, received: NaiveDate) -> Result<DateTime<Utc>, TemporalError> {
        let deadline_date = add_calendar_days(received, self.window_days)?;
        Ok(self.timezone.end_of_day(deadline_date))
    }

    /// The at-risk threshold, at `ceil(window * fraction)` days
    pub fn at_risk_threshold(&self, received: NaiveDate) -> Result<DateTime<Utc>, TemporalError> {
        let days = (Decimal::from(self.window_days) * self.at_risk_fraction)
            .ceil()
            .to_u32()
            .unwrap_or(self.window_days)
            .min(self.window_days);
        let threshold_date = add_calendar_days(received, days)?;
        Ok(self.timezone.end_of_day(threshold_date))
    }

    /// Classifies `now` against the window for the given received date
    pub fn position(
        &self,
        received: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<DeadlinePosition, TemporalError> {
        let deadline = self.response_deadline(received)?;
        if now > deadline {
            return Ok(DeadlinePosition::Expired);
        }
        let threshold = self.at_risk_threshold(received)?;
        if now > threshold {
            Ok(DeadlinePosition::AtRisk)
        } else {
            Ok(DeadlinePosition::Open)
        }
    }

    /// Whole calendar days remaining until the deadline; negative when past
    pub fn days_remaining(
        &self,
        received: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<i64, TemporalError> {
        let deadline_date = add_calendar_days(received, self.window_days)?;
        let today = self.timezone.local_date(now);
        Ok((deadline_date - today).num_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn riyadh_calc() -> DeadlineCalculator {
        DeadlineCalculator::new(
            30,
            dec!(0.75),
            Timezone::new(chrono_tz::Asia::Riyadh),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_deadline_is_received_plus_window() {
        let calc = riyadh_calc();
        let deadline = calc.response_deadline(date(2025, 1, 1)).unwrap();

        // Jan 1 + 30 days = Jan 31, end of day Riyadh time
        let expected = Timezone::new(chrono_tz::Asia::Riyadh).end_of_day(date(2025, 1, 31));
        assert_eq!(deadline, expected);
    }

    #[test]
    fn test_deadline_independent_of_caller_timezone() {
        // The computation uses only the received date and the configured
        // provider timezone; the same inputs give the same instant.
        let calc = riyadh_calc();
        let a = calc.response_deadline(date(2025, 6, 10)).unwrap();
        let b = calc.response_deadline(date(2025, 6, 10)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_at_risk_threshold_ceils() {
        // 30 * 0.75 = 22.5 -> 23 days
        let calc = riyadh_calc();
        let threshold = calc.at_risk_threshold(date(2025, 1, 1)).unwrap();
        let expected = Timezone::new(chrono_tz::Asia::Riyadh).end_of_day(date(2025, 1, 24));
        assert_eq!(threshold, expected);
    }

    #[test]
    fn test_position_progression() {
        let calc = riyadh_calc();
        let received = date(2025, 1, 1);

        let early = Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap();
        let warned = Utc.with_ymd_and_hms(2025, 1, 28, 12, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2025, 2, 5, 12, 0, 0).unwrap();

        assert_eq!(calc.position(received, early).unwrap(), DeadlinePosition::Open);
        assert_eq!(calc.position(received, warned).unwrap(), DeadlinePosition::AtRisk);
        assert_eq!(calc.position(received, late).unwrap(), DeadlinePosition::Expired);
    }

    #[test]
    fn test_not_expired_on_deadline_day() {
        // Day 30 itself is still inside the window; expiry is strictly after
        // the end of the deadline day.
        let calc = riyadh_calc();
        let received = date(2025, 1, 1);
        let on_day_30 = Utc.with_ymd_and_hms(2025, 1, 31, 12, 0, 0).unwrap();

        assert_ne!(
            calc.position(received, on_day_30).unwrap(),
            DeadlinePosition::Expired
        );
    }

    #[test]
    fn test_days_remaining() {
        let calc = riyadh_calc();
        let received = date(2025, 1, 1);
        let now = Utc.with_ymd_and_hms(2025, 1, 21, 12, 0, 0).unwrap();

        assert_eq!(calc.days_remaining(received, now).unwrap(), 10);
    }
}
