//! Forecast snapshots
//!
//! Immutable output of one forecaster run; superseded, never edited, by
//! the next run.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{DateRange, SnapshotId};

use crate::model::TrendDirection;

/// One forecast value with its confidence interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Fitted components kept alongside the numbers for auditability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelComponents {
    pub slope: f64,
    pub seasonal: Vec<f64>,
    pub residual_std: f64,
}

/// Forecast for one series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesForecast {
    pub points: Vec<ForecastPoint>,
    pub direction: TrendDirection,
    pub components: ModelComponents,
}

/// Complete output of one forecaster run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSnapshot {
    pub id: SnapshotId,
    pub generated_at: DateTime<Utc>,
    /// History the forecast was fitted on
    pub history_range: DateRange,
    pub horizon_days: usize,
    pub rejection_rate: SeriesForecast,
    pub recovery_rate: SeriesForecast,
    pub volume: SeriesForecast,
    /// Days where the forecast rejection rate crosses the alert threshold
    pub high_risk_periods: Vec<DateRange>,
}
