//! Explainable series decomposition
//!
//! Classical trend + seasonality + residual decomposition: a centred
//! moving-average trend with a least-squares linear extrapolation, mean
//! weekday seasonal offsets, and a residual standard deviation that
//! widths the symmetric confidence interval. Every component is exposed
//! so a forecast can be explained to an auditor term by term.

use serde::{Deserialize, Serialize};

/// Direction of the fitted trend line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Flat,
}

/// A fitted decomposition of one observed series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesModel {
    /// Smoothed trend, one value per observation
    pub trend: Vec<f64>,
    /// Least-squares slope of the trend per time step
    pub slope: f64,
    /// Trend line value at index 0
    pub intercept: f64,
    /// Mean seasonal offset per position in the period, centred on zero
    pub seasonal: Vec<f64>,
    /// Standard deviation of what trend and seasonality leave unexplained
    pub residual_std: f64,
    pub period: usize,
}

impl SeriesModel {
    /// Fits the decomposition to an observed series
    pub fn fit(series: &[f64], trend_window: usize, period: usize) -> Self {
        let n = series.len();
        if n == 0 {
            return Self {
                trend: Vec::new(),
                slope: 0.0,
                intercept: 0.0,
                seasonal: vec![0.0; period.max(1)],
                residual_std: 0.0,
                period: period.max(1),
            };
        }
        let period = period.max(1);

        // Centred moving average, clamped at the edges
        let half = (trend_window.max(1)) / 2;
        let trend: Vec<f64> = (0..n)
            .map(|i| {
                let lo = i.saturating_sub(half);
                let hi = (i + half).min(n - 1);
                let span = &series[lo..=hi];
                span.iter().sum::<f64>() / span.len() as f64
            })
            .collect();

        let (slope, intercept) = linear_fit(&trend);

        // Mean detrended value per seasonal position
        let mut sums = vec![0.0; period];
        let mut counts = vec![0usize; period];
        for (i, value) in series.iter().enumerate() {
            sums[i % period] += value - trend[i];
            counts[i % period] += 1;
        }
        let mut seasonal: Vec<f64> = sums
            .iter()
            .zip(&counts)
            .map(|(s, &c)| if c == 0 { 0.0 } else { s / c as f64 })
            .collect();
        // Centre so the seasonal component carries no trend of its own
        let seasonal_mean = seasonal.iter().sum::<f64>() / period as f64;
        for s in &mut seasonal {
            *s -= seasonal_mean;
        }

        let residuals: Vec<f64> = series
            .iter()
            .enumerate()
            .map(|(i, value)| value - trend[i] - seasonal[i % period])
            .collect();
        let residual_mean = residuals.iter().sum::<f64>() / n as f64;
        let residual_std = (residuals
            .iter()
            .map(|r| (r - residual_mean).powi(2))
            .sum::<f64>()
            / n as f64)
            .sqrt();

        Self {
            trend,
            slope,
            intercept,
            seasonal,
            residual_std,
            period,
        }
    }

    /// Forecasts `horizon` steps past the fitted history
    ///
    /// Returns `(point, lower, upper)` triples with a symmetric 95%
    /// interval from the residual standard deviation.
    pub fn forecast(&self, horizon: usize) -> Vec<(f64, f64, f64)> {
        let n = self.trend.len();
        (1..=horizon)
            .map(|step| {
                let index = n - 1 + step;
                let point =
                    self.intercept + self.slope * index as f64 + self.seasonal[index % self.period];
                let margin = 1.96 * self.residual_std;
                (point, point - margin, point + margin)
            })
            .collect()
    }

    /// Classifies the slope against a per-step tolerance
    pub fn direction(&self, tolerance: f64) -> TrendDirection {
        if self.slope > tolerance {
            TrendDirection::Increasing
        } else if self.slope < -tolerance {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Flat
        }
    }
}

/// Least-squares line through `values` indexed 0..n
fn linear_fit(values: &[f64]) -> (f64, f64) {
    let n = values.len();
    if n < 2 {
        return (0.0, values.first().copied().unwrap_or(0.0));
    }
    let n_f = n as f64;
    let x_mean = (n_f - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n_f;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx * dx;
    }
    let slope = if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    };
    (slope, y_mean - slope * x_mean)
}
