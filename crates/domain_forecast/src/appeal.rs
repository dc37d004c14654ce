//! Appeal outcome estimation
//!
//! Estimates how likely an appeal is to recover payment from the
//! historical recovery rate of resolved in-window appeals, grouped by
//! denial category and by how early in the statutory window the appeal
//! was filed. Deliberately a frequency table rather than a fitted
//! model: every probability traces back to the cell that produced it,
//! and thin cells fall back to coarser ones instead of extrapolating.

use std::collections::HashMap;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use domain_lifecycle::{DenialCategory, RejectionRecord, RejectionStatus};

use crate::error::ForecastError;

/// Appeal outcome model parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppealModelConfig {
    /// Minimum resolved appeals before any estimate is produced
    pub min_observations: usize,
    /// Minimum observations in a cell before its rate is trusted
    pub min_cell_observations: u32,
    /// Probability at or above which pursuing the appeal is recommended
    pub proceed_threshold: f64,
    /// Resolved appeals above which estimates count as high confidence
    pub high_confidence_observations: u32,
}

impl Default for AppealModelConfig {
    fn default() -> Self {
        Self {
            min_observations: 20,
            min_cell_observations: 10,
            proceed_threshold: 0.5,
            high_confidence_observations: 50,
        }
    }
}

/// Which half of the statutory window the appeal was filed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingTiming {
    FirstHalf,
    SecondHalf,
}

/// Classifies a filing instant against the record's statutory window
pub fn filing_timing(record: &RejectionRecord, filed_at: DateTime<Utc>) -> FilingTiming {
    let start = record.received_date.and_time(NaiveTime::MIN).and_utc();
    let window = record.response_deadline - start;
    let elapsed = filed_at - start;
    if window.num_seconds() <= 0 || elapsed.num_seconds() * 2 <= window.num_seconds() {
        FilingTiming::FirstHalf
    } else {
        FilingTiming::SecondHalf
    }
}

/// Observed outcomes of one group of resolved appeals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCell {
    pub appeals: u32,
    pub recovered: u32,
}

impl OutcomeCell {
    fn add(&mut self, recovered: bool) {
        self.appeals += 1;
        if recovered {
            self.recovered += 1;
        }
    }

    /// Observed recovery rate; zero for an empty cell
    pub fn rate(&self) -> f64 {
        if self.appeals == 0 {
            0.0
        } else {
            self.recovered as f64 / self.appeals as f64
        }
    }
}

/// The grouping level that produced an estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateBasis {
    CategoryAndTiming,
    CategoryOnly,
    Overall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateConfidence {
    High,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppealRecommendation {
    /// Historical odds favour the appeal
    Proceed,
    /// Odds are against; review before committing effort
    Review,
}

/// One appeal success estimate with its provenance
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AppealOutcomeEstimate {
    pub probability: f64,
    /// The cell the probability was read from
    pub basis: EstimateBasis,
    /// Resolved appeals in that cell
    pub observations: u32,
    pub confidence: EstimateConfidence,
    pub recommendation: AppealRecommendation,
}

/// Historical appeal outcomes bucketed by denial category and timing
#[derive(Debug, Clone)]
pub struct AppealOutcomeModel {
    config: AppealModelConfig,
    cells: HashMap<(DenialCategory, FilingTiming), OutcomeCell>,
    categories: HashMap<DenialCategory, OutcomeCell>,
    overall: OutcomeCell,
}

impl AppealOutcomeModel {
    /// Fits the outcome table from resolved records
    ///
    /// Only in-window appeals that reached `Recovered` or
    /// `FinalRejection` contribute; out-of-window appeals never went to
    /// the payer and say nothing about appeal merit.
    pub fn fit(records: &[RejectionRecord], config: AppealModelConfig) -> Self {
        let mut model = Self {
            config,
            cells: HashMap::new(),
            categories: HashMap::new(),
            overall: OutcomeCell::default(),
        };

        for record in records {
            let Some(appeal) = record.appeal.as_ref() else {
                continue;
            };
            if appeal.out_of_window {
                continue;
            }
            let recovered = match record.status {
                RejectionStatus::Recovered => true,
                RejectionStatus::FinalRejection => false,
                _ => continue,
            };

            let category = primary_category(record);
            let timing = filing_timing(record, appeal.submitted_at);
            model
                .cells
                .entry((category, timing))
                .or_default()
                .add(recovered);
            model.categories.entry(category).or_default().add(recovered);
            model.overall.add(recovered);
        }
        model
    }

    /// Estimates the recovery probability for an appeal of `category`
    /// filed with `timing`
    ///
    /// Reads the most specific cell with enough observations, falling
    /// back from (category, timing) to category to the overall rate.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientData` when fewer resolved appeals than
    /// `min_observations` were fitted.
    pub fn estimate(
        &self,
        category: DenialCategory,
        timing: FilingTiming,
    ) -> Result<AppealOutcomeEstimate, ForecastError> {
        if (self.overall.appeals as usize) < self.config.min_observations {
            return Err(ForecastError::InsufficientData {
                required: self.config.min_observations,
                actual: self.overall.appeals as usize,
            });
        }

        let (cell, basis) = match self.cells.get(&(category, timing)) {
            Some(cell) if cell.appeals >= self.config.min_cell_observations => {
                (*cell, EstimateBasis::CategoryAndTiming)
            }
            _ => match self.categories.get(&category) {
                Some(cell) if cell.appeals >= self.config.min_cell_observations => {
                    (*cell, EstimateBasis::CategoryOnly)
                }
                _ => (self.overall, EstimateBasis::Overall),
            },
        };

        let probability = cell.rate();
        Ok(AppealOutcomeEstimate {
            probability,
            basis,
            observations: cell.appeals,
            confidence: if self.overall.appeals > self.config.high_confidence_observations {
                EstimateConfidence::High
            } else {
                EstimateConfidence::Medium
            },
            recommendation: if probability >= self.config.proceed_threshold {
                AppealRecommendation::Proceed
            } else {
                AppealRecommendation::Review
            },
        })
    }

    /// Estimates for a record's primary denial category and a planned
    /// filing instant
    pub fn estimate_for(
        &self,
        record: &RejectionRecord,
        filed_at: DateTime<Utc>,
    ) -> Result<AppealOutcomeEstimate, ForecastError> {
        self.estimate(primary_category(record), filing_timing(record, filed_at))
    }
}

fn primary_category(record: &RejectionRecord) -> DenialCategory {
    record
        .reason_codes
        .first()
        .map(|code| code.category())
        .unwrap_or(DenialCategory::Other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal_macros::dec;

    use core_kernel::{
        AmountBreakdown, ClaimId, Currency, Money, PayerId, PhysicianId, ProviderId, Rate,
    };
    use domain_lifecycle::{AppealRequest, ReasonCode, SubmissionChannel};

    // Window: received 2025-01-01, deadline end of Jan 31; the midpoint
    // falls around Jan 16
    fn resolved_record(code: &str, filed_day: u32, recovered: bool) -> RejectionRecord {
        let claim_id = ClaimId::new_v7();
        let amount = AmountBreakdown::from_net(
            Money::new(dec!(1000), Currency::SAR),
            Rate::from_percentage(dec!(15)),
        );
        let received = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let mut record = RejectionRecord::new(
            claim_id,
            PayerId::new_v7(),
            ProviderId::new_v7(),
            PhysicianId::new_v7(),
            amount,
            received - chrono::Days::new(5),
            received,
            SubmissionChannel::Exchange,
            Utc.with_ymd_and_hms(2025, 1, 31, 21, 0, 0).unwrap(),
            vec![ReasonCode::parse(code)],
        );
        record.appeal = Some(AppealRequest::new(
            claim_id,
            SubmissionChannel::Portal,
            Utc.with_ymd_and_hms(2025, 1, filed_day, 12, 0, 0).unwrap(),
            vec![],
        ));
        record.status = if recovered {
            RejectionStatus::Recovered
        } else {
            RejectionStatus::FinalRejection
        };
        record
    }

    fn documentation_history() -> Vec<RejectionRecord> {
        // 12 documentation appeals filed early, 9 recovered; 12 coding
        // appeals filed late, 3 recovered
        let mut records = Vec::new();
        for i in 0..12 {
            records.push(resolved_record("DOC-01", 5, i < 9));
            records.push(resolved_record("COD-01", 28, i < 3));
        }
        records
    }

    #[test]
    fn test_filing_timing_halves() {
        let record = resolved_record("DOC-01", 5, true);

        let early = Utc.with_ymd_and_hms(2025, 1, 5, 12, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2025, 1, 28, 12, 0, 0).unwrap();
        assert_eq!(filing_timing(&record, early), FilingTiming::FirstHalf);
        assert_eq!(filing_timing(&record, late), FilingTiming::SecondHalf);
    }

    #[test]
    fn test_thin_history_is_insufficient_data() {
        let records: Vec<_> = (0..5).map(|_| resolved_record("DOC-01", 5, true)).collect();
        let model = AppealOutcomeModel::fit(&records, AppealModelConfig::default());

        let result = model.estimate(DenialCategory::Documentation, FilingTiming::FirstHalf);
        assert!(matches!(
            result,
            Err(ForecastError::InsufficientData {
                required: 20,
                actual: 5
            })
        ));
    }

    #[test]
    fn test_cell_rate_drives_estimate() {
        let model =
            AppealOutcomeModel::fit(&documentation_history(), AppealModelConfig::default());

        let strong = model
            .estimate(DenialCategory::Documentation, FilingTiming::FirstHalf)
            .unwrap();
        assert!((strong.probability - 0.75).abs() < 1e-9);
        assert_eq!(strong.basis, EstimateBasis::CategoryAndTiming);
        assert_eq!(strong.observations, 12);
        assert_eq!(strong.recommendation, AppealRecommendation::Proceed);

        let weak = model
            .estimate(DenialCategory::Coding, FilingTiming::SecondHalf)
            .unwrap();
        assert!((weak.probability - 0.25).abs() < 1e-9);
        assert_eq!(weak.recommendation, AppealRecommendation::Review);
    }

    #[test]
    fn test_unseen_category_falls_back_to_overall() {
        let model =
            AppealOutcomeModel::fit(&documentation_history(), AppealModelConfig::default());

        let estimate = model
            .estimate(DenialCategory::MedicalNecessity, FilingTiming::FirstHalf)
            .unwrap();

        assert_eq!(estimate.basis, EstimateBasis::Overall);
        assert_eq!(estimate.observations, 24);
        // 12 of 24 recovered overall
        assert!((estimate.probability - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_window_appeals_excluded() {
        let mut records = documentation_history();
        for _ in 0..5 {
            let mut record = resolved_record("DOC-01", 5, true);
            if let Some(appeal) = record.appeal.as_mut() {
                appeal.out_of_window = true;
            }
            records.push(record);
        }

        let model = AppealOutcomeModel::fit(&records, AppealModelConfig::default());
        let estimate = model
            .estimate(DenialCategory::MedicalNecessity, FilingTiming::FirstHalf)
            .unwrap();

        assert_eq!(estimate.observations, 24);
    }

    #[test]
    fn test_estimate_for_uses_primary_reason() {
        let model =
            AppealOutcomeModel::fit(&documentation_history(), AppealModelConfig::default());
        let pending = resolved_record("DOC-02", 5, true);

        let estimate = model
            .estimate_for(&pending, Utc.with_ymd_and_hms(2025, 1, 5, 12, 0, 0).unwrap())
            .unwrap();

        assert_eq!(estimate.basis, EstimateBasis::CategoryAndTiming);
        assert!((estimate.probability - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_scales_with_history() {
        let mut records = documentation_history();
        let small_model =
            AppealOutcomeModel::fit(&records, AppealModelConfig::default());
        assert_eq!(
            small_model
                .estimate(DenialCategory::Documentation, FilingTiming::FirstHalf)
                .unwrap()
                .confidence,
            EstimateConfidence::Medium
        );

        for _ in 0..30 {
            records.push(resolved_record("ELG-01", 5, false));
        }
        let large_model =
            AppealOutcomeModel::fit(&records, AppealModelConfig::default());
        assert_eq!(
            large_model
                .estimate(DenialCategory::Documentation, FilingTiming::FirstHalf)
                .unwrap()
                .confidence,
            EstimateConfidence::High
        );
    }
}
