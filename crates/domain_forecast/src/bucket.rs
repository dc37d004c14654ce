//! Daily aggregation of lifecycle events
//!
//! The forecaster consumes fixed-size daily buckets built from the
//! lifecycle audit trail over an explicit date range. Submission volumes
//! come from the exchange feed separately, since the lifecycle only sees
//! claims that were rejected.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::DateRange;
use domain_lifecycle::{LifecycleEvent, LifecycleEventKind, RejectionStatus};

/// One day of lifecycle activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBucket {
    pub date: NaiveDate,
    /// Claims submitted to payers that day (exchange feed)
    pub claims_submitted: u32,
    /// Rejections ingested that day
    pub rejections_created: u32,
    /// Records reaching a terminal state that day
    pub resolved: u32,
    /// Of the resolved, records classified as recovered
    pub recovered: u32,
    pub expired: u32,
}

impl DailyBucket {
    /// Rejections as a fraction of submissions; zero when nothing was
    /// submitted
    pub fn rejection_rate(&self) -> f64 {
        if self.claims_submitted == 0 {
            0.0
        } else {
            self.rejections_created as f64 / self.claims_submitted as f64
        }
    }

    /// Recoveries as a fraction of resolutions; zero when nothing resolved
    pub fn recovery_rate(&self) -> f64 {
        if self.resolved == 0 {
            0.0
        } else {
            self.recovered as f64 / self.resolved as f64
        }
    }
}

/// Buckets lifecycle events into days over the range
///
/// Every day in the range gets a bucket, zero-filled when quiet, so the
/// series has no gaps and bucket index maps directly onto calendar days.
pub fn aggregate_daily(
    events: &[LifecycleEvent],
    submissions: &HashMap<NaiveDate, u32>,
    range: DateRange,
) -> Vec<DailyBucket> {
    let mut buckets: Vec<DailyBucket> = range
        .iter_days()
        .map(|date| DailyBucket {
            date,
            claims_submitted: submissions.get(&date).copied().unwrap_or(0),
            ..Default::default()
        })
        .collect();

    for event in events {
        let date = event.occurred_at.date_naive();
        if !range.contains(date) {
            continue;
        }
        let index = (date - range.start).num_days() as usize;
        let bucket = &mut buckets[index];

        match &event.kind {
            LifecycleEventKind::Ingested { .. } => bucket.rejections_created += 1,
            LifecycleEventKind::Resolved { .. } => {
                bucket.resolved += 1;
                if event.new_state == RejectionStatus::Recovered {
                    bucket.recovered += 1;
                }
            }
            LifecycleEventKind::Expired => {
                bucket.resolved += 1;
                bucket.expired += 1;
            }
            LifecycleEventKind::AppealFiled { .. } | LifecycleEventKind::Archived => {}
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use core_kernel::ClaimId;
    use domain_lifecycle::ResolutionOutcome;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(kind: LifecycleEventKind, new_state: RejectionStatus, day: u32) -> LifecycleEvent {
        LifecycleEvent::new(
            ClaimId::new_v7(),
            Some(RejectionStatus::PendingReview),
            new_state,
            "test",
            Utc.with_ymd_and_hms(2025, 1, day, 10, 0, 0).unwrap(),
            kind,
            None,
        )
    }

    #[test]
    fn test_aggregation_fills_gaps() {
        let range = DateRange::new(date(2025, 1, 1), date(2025, 1, 5)).unwrap();
        let events = vec![event(
            LifecycleEventKind::Ingested {
                channel: domain_lifecycle::SubmissionChannel::Exchange,
            },
            RejectionStatus::PendingReview,
            3,
        )];

        let buckets = aggregate_daily(&events, &HashMap::new(), range);

        assert_eq!(buckets.len(), 5);
        assert_eq!(buckets[2].rejections_created, 1);
        assert_eq!(buckets[0].rejections_created, 0);
    }

    #[test]
    fn test_recovery_and_expiry_counted_as_resolved() {
        let range = DateRange::new(date(2025, 1, 1), date(2025, 1, 2)).unwrap();
        let events = vec![
            event(
                LifecycleEventKind::Resolved {
                    outcome: ResolutionOutcome::Recovered,
                },
                RejectionStatus::Recovered,
                1,
            ),
            event(
                LifecycleEventKind::Resolved {
                    outcome: ResolutionOutcome::Denied,
                },
                RejectionStatus::FinalRejection,
                1,
            ),
            event(LifecycleEventKind::Expired, RejectionStatus::Expired, 1),
        ];

        let buckets = aggregate_daily(&events, &HashMap::new(), range);

        assert_eq!(buckets[0].resolved, 3);
        assert_eq!(buckets[0].recovered, 1);
        assert_eq!(buckets[0].expired, 1);
        assert!((buckets[0].recovery_rate() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_rates_with_submissions() {
        let mut submissions = HashMap::new();
        submissions.insert(date(2025, 1, 1), 100);
        let range = DateRange::new(date(2025, 1, 1), date(2025, 1, 1)).unwrap();
        let events = vec![event(
            LifecycleEventKind::Ingested {
                channel: domain_lifecycle::SubmissionChannel::Exchange,
            },
            RejectionStatus::PendingReview,
            1,
        )];

        let buckets = aggregate_daily(&events, &submissions, range);
        assert!((buckets[0].rejection_rate() - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_zero_denominators() {
        let bucket = DailyBucket::default();
        assert_eq!(bucket.rejection_rate(), 0.0);
        assert_eq!(bucket.recovery_rate(), 0.0);
    }
}
