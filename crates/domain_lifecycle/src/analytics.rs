//! Compliance aggregation over explicit date ranges
//!
//! Every aggregation takes a [`DateRange`]; nothing here reads the clock.
//! Callers pass a point-in-time snapshot so aggregation never blocks
//! lifecycle writers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, DateRange, Money, MoneyError};

use crate::rejection::{RejectionRecord, RejectionStatus};

/// Within-window compliance figures for records received in a range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceSummary {
    pub range: DateRange,
    /// Records whose rejection was received inside the range
    pub total_records: usize,
    /// Of those, records with an appeal filed before the deadline
    pub appealed_in_window: usize,
    pub expired: usize,
    pub recovered: usize,
    /// `appealed_in_window / total_records`; zero for an empty range
    pub compliance_rate: Decimal,
    pub total_rejected: Money,
    pub total_recovered: Money,
}

/// Aggregates compliance figures from a record snapshot
pub fn compliance_summary(
    records: &[RejectionRecord],
    range: DateRange,
    currency: Currency,
) -> Result<ComplianceSummary, MoneyError> {
    let mut total_records = 0usize;
    let mut appealed_in_window = 0usize;
    let mut expired = 0usize;
    let mut recovered = 0usize;
    let mut total_rejected = Money::zero(currency);
    let mut total_recovered = Money::zero(currency);

    for record in records {
        if !range.contains(record.received_date) {
            continue;
        }
        total_records += 1;
        total_rejected = total_rejected.checked_add(&record.amount.total())?;
        if record.appealed_within_window() {
            appealed_in_window += 1;
        }
        match record.status {
            RejectionStatus::Expired => expired += 1,
            RejectionStatus::Recovered => recovered += 1,
            _ => {}
        }
        if let Some(amount) = record.recovered_amount {
            total_recovered = total_recovered.checked_add(&amount)?;
        }
    }

    let compliance_rate = if total_records == 0 {
        Decimal::ZERO
    } else {
        Decimal::from(appealed_in_window as u64) / Decimal::from(total_records as u64)
    };

    Ok(ComplianceSummary {
        range,
        total_records,
        appealed_in_window,
        expired,
        recovered,
        compliance_rate,
        total_rejected,
        total_recovered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal_macros::dec;

    use core_kernel::{
        AmountBreakdown, ClaimId, PayerId, PhysicianId, ProviderId, Rate, Timezone,
    };

    use crate::appeal::SubmissionChannel;
    use crate::reason::ReasonCode;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(received: NaiveDate, net: Decimal) -> RejectionRecord {
        let amount = AmountBreakdown::from_net(
            Money::new(net, Currency::SAR),
            Rate::from_percentage(dec!(15)),
        );
        let deadline = Timezone::new(chrono_tz::Asia::Riyadh).end_of_day(received);
        RejectionRecord::new(
            ClaimId::new_v7(),
            PayerId::new_v7(),
            ProviderId::new_v7(),
            PhysicianId::new_v7(),
            amount,
            received,
            received,
            SubmissionChannel::Exchange,
            deadline,
            vec![ReasonCode::MissingDocumentation],
        )
    }

    #[test]
    fn test_empty_snapshot_yields_zero_rate() {
        let range = DateRange::new(date(2025, 1, 1), date(2025, 1, 31)).unwrap();
        let summary = compliance_summary(&[], range, Currency::SAR).unwrap();

        assert_eq!(summary.total_records, 0);
        assert_eq!(summary.compliance_rate, Decimal::ZERO);
        assert!(summary.total_rejected.is_zero());
    }

    #[test]
    fn test_range_filter_and_rate() {
        let range = DateRange::new(date(2025, 1, 1), date(2025, 1, 31)).unwrap();

        let mut appealed = record(date(2025, 1, 10), dec!(1000));
        appealed
            .file_appeal(
                SubmissionChannel::Portal,
                Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).unwrap(),
                vec![],
            )
            .unwrap();
        let pending = record(date(2025, 1, 20), dec!(500));
        let outside = record(date(2025, 2, 5), dec!(9999));

        let summary =
            compliance_summary(&[appealed, pending, outside], range, Currency::SAR).unwrap();

        assert_eq!(summary.total_records, 2);
        assert_eq!(summary.appealed_in_window, 1);
        assert_eq!(summary.compliance_rate, dec!(0.5));
        assert_eq!(summary.total_rejected.amount(), dec!(1725.00));
    }
}
