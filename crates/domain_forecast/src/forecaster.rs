//! The forecaster
//!
//! Fits one [`SeriesModel`] per series (rejection rate, recovery rate,
//! volume) over daily buckets and assembles an immutable snapshot.
//! Rate forecasts are clamped into [0, 1] and volumes floored at zero;
//! the decomposition does not know the series' domain.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use core_kernel::{add_calendar_days, DateRange, SnapshotId};

use crate::bucket::DailyBucket;
use crate::error::ForecastError;
use crate::model::SeriesModel;
use crate::snapshot::{ForecastPoint, ForecastSnapshot, ModelComponents, SeriesForecast};

/// Forecaster parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Minimum daily observations before any forecast is attempted
    pub min_observations: usize,
    pub horizon_days: usize,
    /// Forecast rejection rate above which a day counts as high-risk
    pub high_risk_threshold: f64,
    /// Seasonal period in days
    pub seasonal_period: usize,
    /// Moving-average window for the trend component
    pub trend_window: usize,
    /// Slope per day below which a trend reads as flat
    pub flat_tolerance: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            min_observations: 30,
            horizon_days: 14,
            high_risk_threshold: 0.25,
            seasonal_period: 7,
            trend_window: 7,
            flat_tolerance: 1e-3,
        }
    }
}

/// Produces forecast snapshots from daily lifecycle aggregates
#[derive(Debug, Clone)]
pub struct Forecaster {
    config: ForecastConfig,
}

impl Forecaster {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    /// Forecasts over the horizon from the given history
    ///
    /// # Errors
    ///
    /// Returns `InsufficientData` when the history holds fewer buckets
    /// than `min_observations`.
    pub fn forecast(&self, buckets: &[DailyBucket]) -> Result<ForecastSnapshot, ForecastError> {
        if buckets.len() < self.config.min_observations {
            return Err(ForecastError::InsufficientData {
                required: self.config.min_observations,
                actual: buckets.len(),
            });
        }

        let history_range = DateRange::new(
            buckets[0].date,
            buckets[buckets.len() - 1].date,
        )?;

        let rejection_series: Vec<f64> = buckets.iter().map(|b| b.rejection_rate()).collect();
        let recovery_series: Vec<f64> = buckets.iter().map(|b| b.recovery_rate()).collect();
        let volume_series: Vec<f64> = buckets
            .iter()
            .map(|b| b.rejections_created as f64)
            .collect();

        let rejection_rate =
            self.fit_series(&rejection_series, history_range, |v| v.clamp(0.0, 1.0))?;
        let recovery_rate =
            self.fit_series(&recovery_series, history_range, |v| v.clamp(0.0, 1.0))?;
        let volume = self.fit_series(&volume_series, history_range, |v| v.max(0.0))?;

        let high_risk_periods =
            collect_high_risk(&rejection_rate.points, self.config.high_risk_threshold)?;

        let snapshot = ForecastSnapshot {
            id: SnapshotId::new_v7(),
            generated_at: Utc::now(),
            history_range,
            horizon_days: self.config.horizon_days,
            rejection_rate,
            recovery_rate,
            volume,
            high_risk_periods,
        };
        info!(
            snapshot_id = %snapshot.id,
            history_days = buckets.len(),
            high_risk_periods = snapshot.high_risk_periods.len(),
            "forecast snapshot generated"
        );
        Ok(snapshot)
    }

    fn fit_series(
        &self,
        series: &[f64],
        history_range: DateRange,
        clamp: impl Fn(f64) -> f64,
    ) -> Result<SeriesForecast, ForecastError> {
        let model = SeriesModel::fit(series, self.config.trend_window, self.config.seasonal_period);
        let points = model
            .forecast(self.config.horizon_days)
            .into_iter()
            .enumerate()
            .map(|(offset, (value, lower, upper))| {
                let date = add_calendar_days(history_range.end, offset as u32 + 1)?;
                Ok(ForecastPoint {
                    date,
                    value: clamp(value),
                    lower: clamp(lower),
                    upper: clamp(upper),
                })
            })
            .collect::<Result<Vec<_>, ForecastError>>()?;

        Ok(SeriesForecast {
            direction: model.direction(self.config.flat_tolerance),
            components: ModelComponents {
                slope: model.slope,
                seasonal: model.seasonal.clone(),
                residual_std: model.residual_std,
            },
            points,
        })
    }
}

/// Merges consecutive above-threshold days into ranges
fn collect_high_risk(
    points: &[ForecastPoint],
    threshold: f64,
) -> Result<Vec<DateRange>, ForecastError> {
    let mut periods = Vec::new();
    let mut current: Option<(chrono::NaiveDate, chrono::NaiveDate)> = None;

    for point in points {
        if point.value > threshold {
            current = match current {
                Some((start, _)) => Some((start, point.date)),
                None => Some((point.date, point.date)),
            };
        } else if let Some((start, end)) = current.take() {
            periods.push(DateRange::new(start, end)?);
        }
    }
    if let Some((start, end)) = current {
        periods.push(DateRange::new(start, end)?);
    }
    Ok(periods)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn point(day: u32, value: f64) -> ForecastPoint {
        ForecastPoint {
            date: date(2025, 2, day),
            value,
            lower: value,
            upper: value,
        }
    }

    #[test]
    fn test_high_risk_days_merge_into_ranges() {
        let points = vec![
            point(1, 0.1),
            point(2, 0.4),
            point(3, 0.5),
            point(4, 0.1),
            point(5, 0.6),
        ];

        let periods = collect_high_risk(&points, 0.25).unwrap();

        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].start, date(2025, 2, 2));
        assert_eq!(periods[0].end, date(2025, 2, 3));
        assert_eq!(periods[1].start, date(2025, 2, 5));
    }

    #[test]
    fn test_no_high_risk_when_below_threshold() {
        let points = vec![point(1, 0.1), point(2, 0.2)];
        assert!(collect_high_risk(&points, 0.25).unwrap().is_empty());
    }
}
