//! Predictive forecaster domain
//!
//! Aggregates lifecycle history into daily buckets and produces
//! explainable trend/seasonality forecasts for rejection rate, recovery
//! rate and claim volume, with confidence intervals and high-risk period
//! flags, plus frequency-table appeal outcome estimates. Refuses to
//! forecast from thin history.

pub mod appeal;
pub mod bucket;
pub mod error;
pub mod forecaster;
pub mod model;
pub mod snapshot;

pub use appeal::{
    filing_timing, AppealModelConfig, AppealOutcomeEstimate, AppealOutcomeModel,
    AppealRecommendation, EstimateBasis, EstimateConfidence, FilingTiming, OutcomeCell,
};
pub use bucket::{aggregate_daily, DailyBucket};
pub use error::ForecastError;
pub use forecaster::{ForecastConfig, Forecaster};
pub use model::{SeriesModel, TrendDirection};
pub use snapshot::{ForecastPoint, ForecastSnapshot, ModelComponents, SeriesForecast};
