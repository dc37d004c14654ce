//! Comprehensive tests for domain_forecast

use chrono::NaiveDate;

use domain_forecast::{
    DailyBucket, ForecastConfig, ForecastError, Forecaster, TrendDirection,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Builds `days` buckets starting 2025-01-01 with per-day counts derived
/// from the supplied closures
fn buckets(
    days: u64,
    submitted: impl Fn(u64) -> u32,
    created: impl Fn(u64) -> u32,
) -> Vec<DailyBucket> {
    (0..days)
        .map(|i| DailyBucket {
            date: date(2025, 1, 1) + chrono::Days::new(i),
            claims_submitted: submitted(i),
            rejections_created: created(i),
            resolved: 10,
            recovered: 5,
            expired: 1,
        })
        .collect()
}

// ============================================================================
// Guard Rail Tests
// ============================================================================

mod guard_tests {
    use super::*;

    #[test]
    fn test_ten_points_is_insufficient_data() {
        let forecaster = Forecaster::new(ForecastConfig::default());
        let history = buckets(10, |_| 100, |_| 20);

        let result = forecaster.forecast(&history);

        match result {
            Err(ForecastError::InsufficientData { required, actual }) => {
                assert_eq!(required, 30);
                assert_eq!(actual, 10);
            }
            other => panic!("expected InsufficientData, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_exactly_minimum_observations_forecasts() {
        let forecaster = Forecaster::new(ForecastConfig::default());
        let history = buckets(30, |_| 100, |_| 20);

        assert!(forecaster.forecast(&history).is_ok());
    }
}

// ============================================================================
// Forecast Content Tests
// ============================================================================

mod content_tests {
    use super::*;

    #[test]
    fn test_snapshot_shape() {
        let config = ForecastConfig::default();
        let horizon = config.horizon_days;
        let forecaster = Forecaster::new(config);
        let history = buckets(60, |_| 100, |_| 20);

        let snapshot = forecaster.forecast(&history).unwrap();

        assert_eq!(snapshot.rejection_rate.points.len(), horizon);
        assert_eq!(snapshot.recovery_rate.points.len(), horizon);
        assert_eq!(snapshot.volume.points.len(), horizon);
        assert_eq!(snapshot.history_range.start, date(2025, 1, 1));
        // Forecast dates continue from the end of history
        assert_eq!(
            snapshot.rejection_rate.points[0].date,
            snapshot.history_range.end + chrono::Days::new(1)
        );
    }

    #[test]
    fn test_stable_history_forecasts_stable_rate() {
        let forecaster = Forecaster::new(ForecastConfig::default());
        let history = buckets(60, |_| 100, |_| 20);

        let snapshot = forecaster.forecast(&history).unwrap();

        for point in &snapshot.rejection_rate.points {
            assert!((point.value - 0.2).abs() < 0.02);
        }
        assert_eq!(snapshot.rejection_rate.direction, TrendDirection::Flat);
        assert!(snapshot.high_risk_periods.is_empty());
    }

    #[test]
    fn test_rising_rejections_flag_high_risk() {
        // Rejection rate climbs from 10% toward 40% over 60 days
        let forecaster = Forecaster::new(ForecastConfig::default());
        let history = buckets(60, |_| 100, |i| (10 + i / 2) as u32);

        let snapshot = forecaster.forecast(&history).unwrap();

        assert_eq!(
            snapshot.rejection_rate.direction,
            TrendDirection::Increasing
        );
        assert!(!snapshot.high_risk_periods.is_empty());
    }

    #[test]
    fn test_rate_forecasts_clamped_to_unit_interval() {
        // Steeply rising rate would extrapolate past 1.0 without clamping
        let forecaster = Forecaster::new(ForecastConfig::default());
        let history = buckets(60, |_| 100, |i| (40 + i).min(100) as u32);

        let snapshot = forecaster.forecast(&history).unwrap();

        for point in &snapshot.rejection_rate.points {
            assert!(point.value <= 1.0);
            assert!(point.lower >= 0.0);
        }
    }

    #[test]
    fn test_components_exposed_for_explainability() {
        let forecaster = Forecaster::new(ForecastConfig::default());
        let history = buckets(60, |_| 100, |_| 20);

        let snapshot = forecaster.forecast(&history).unwrap();

        let components = &snapshot.volume.components;
        assert_eq!(components.seasonal.len(), 7);
        assert!(components.residual_std >= 0.0);
    }

    #[test]
    fn test_confidence_interval_brackets_point() {
        let forecaster = Forecaster::new(ForecastConfig::default());
        // Noisy volumes widen the interval
        let history = buckets(60, |_| 100, |i| if i % 2 == 0 { 30 } else { 10 });

        let snapshot = forecaster.forecast(&history).unwrap();

        for point in &snapshot.volume.points {
            assert!(point.lower <= point.value);
            assert!(point.value <= point.upper);
        }
        assert!(snapshot.volume.components.residual_std > 0.0);
    }
}
